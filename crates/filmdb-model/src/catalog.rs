//! The catalog: the three collections and every operation that changes them.

use std::fmt;

use filmdb_types::{Isbn, PersonId};
use tracing::{debug, info, warn};

use crate::collection::{Movies, People, Publishers};
use crate::error::ModelResult;
use crate::movie::{Movie, MovieUpdate, NewMovie};
use crate::person::{NewPerson, Person, PersonUpdate};
use crate::publisher::{NewPublisher, Publisher, PublisherUpdate};
use crate::record::{MOVIES_KEY, PEOPLE_KEY, PUBLISHERS_KEY};
use crate::update::UpdateReport;

/// A reference removed from a surviving record during a destroy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrippedRef {
    pub collection: &'static str,
    pub id: String,
    pub field: &'static str,
}

/// Outcome of a successful destroy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestroyReport {
    pub collection: &'static str,
    pub id: String,
    /// Movies deleted along with the record.
    pub cascaded: Vec<Isbn>,
    /// References nulled or removed in surviving records.
    pub stripped: Vec<StrippedRef>,
}

impl DestroyReport {
    fn new(collection: &'static str, id: impl ToString) -> Self {
        Self {
            collection,
            id: id.to_string(),
            cascaded: Vec::new(),
            stripped: Vec::new(),
        }
    }
}

impl fmt::Display for DestroyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} deleted ({} movies cascaded, {} references stripped)",
            self.collection,
            self.id,
            self.cascaded.len(),
            self.stripped.len()
        )
    }
}

/// Owns all people, publishers and movies.
///
/// Every mutation is validated first and applied only when it passes, so a
/// rejected operation leaves the catalog exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) people: People,
    pub(crate) publishers: Publishers,
    pub(crate) movies: Movies,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            people: People::new(PEOPLE_KEY),
            publishers: Publishers::new(PUBLISHERS_KEY),
            movies: Movies::new(MOVIES_KEY),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// All people, whatever their category.
    pub fn people(&self) -> &People {
        &self.people
    }

    pub fn publishers(&self) -> &Publishers {
        &self.publishers
    }

    pub fn movies(&self) -> &Movies {
        &self.movies
    }

    pub fn actors(&self) -> impl Iterator<Item = &Person> {
        self.people.values().filter(|p| p.is_actor())
    }

    pub fn directors(&self) -> impl Iterator<Item = &Person> {
        self.people.values().filter(|p| p.is_director())
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    pub fn publisher(&self, name: &str) -> Option<&Publisher> {
        self.publishers.get(name)
    }

    pub fn movie(&self, isbn: &Isbn) -> Option<&Movie> {
        self.movies.get(isbn)
    }

    /// The people listed in `movie`, in identifier order.
    pub fn movie_people<'a>(&'a self, movie: &'a Movie) -> impl Iterator<Item = &'a Person> + 'a {
        movie.people().iter().filter_map(|id| self.people.get(id))
    }

    pub fn movie_publisher(&self, movie: &Movie) -> Option<&Publisher> {
        movie.publisher().and_then(|name| self.publishers.get(name))
    }

    pub fn movie_director(&self, movie: &Movie) -> Option<&Person> {
        movie.director().and_then(|id| self.people.get(&id))
    }

    pub fn actor_agent(&self, actor: &Person) -> Option<&Person> {
        actor.agent().and_then(|id| self.people.get(&id))
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    pub fn add_person(&mut self, slots: &NewPerson) -> ModelResult<PersonId> {
        match Person::from_slots(slots, &self.people) {
            Ok(person) => {
                let id = person.id();
                info!(person = %person, "person added");
                self.people.insert(id, person);
                Ok(id)
            }
            Err(violation) => {
                warn!(person_id = %slots.person_id, %violation, "person rejected");
                Err(violation.into())
            }
        }
    }

    pub fn update_person(&mut self, update: &PersonUpdate) -> ModelResult<UpdateReport> {
        let id = update.person_id;
        let mut person = self.people.require(&id)?.clone();
        let mut report = UpdateReport::new(self.people.name(), id);
        if let Err(violation) = person.apply_update(update, &self.people, &mut report.changed) {
            warn!(person_id = %id, %violation, "person update rejected");
            return Err(violation.into());
        }
        if !report.is_unchanged() {
            self.people.insert(id, person);
        }
        info!(%report, "person updated");
        Ok(report)
    }

    /// Delete a person.
    ///
    /// Movies the person directs are deleted with it, the person is removed
    /// from the people of every movie it plays in, and every actor it
    /// represents loses its agent.
    pub fn destroy_person(&mut self, id: PersonId) -> ModelResult<DestroyReport> {
        let directed: Vec<Isbn> = self.people.require(&id)?.directed_movies().iter().cloned().collect();
        let mut report = DestroyReport::new(self.people.name(), id);

        for isbn in directed {
            if self.remove_movie(&isbn).is_some() {
                debug!(person_id = %id, %isbn, "directed movie deleted");
                report.cascaded.push(isbn);
            }
        }

        let played: Vec<Isbn> = self
            .people
            .get(&id)
            .map(|p| p.played_movies().iter().cloned().collect())
            .unwrap_or_default();
        for isbn in played {
            if let Some(movie) = self.movies.get_mut(&isbn) {
                if movie.forget_person(id) {
                    debug!(person_id = %id, %isbn, "person removed from movie");
                    report.stripped.push(StrippedRef {
                        collection: MOVIES_KEY,
                        id: isbn.to_string(),
                        field: "people",
                    });
                }
            }
        }

        for actor in self.people.values_mut() {
            if actor.agent() == Some(id) && actor.forget_agent() {
                debug!(person_id = %id, actor = %actor.id(), "agent cleared");
                report.stripped.push(StrippedRef {
                    collection: PEOPLE_KEY,
                    id: actor.id().to_string(),
                    field: "agent",
                });
            }
        }

        self.people.remove(&id);
        info!(%report, "person destroyed");
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Publishers
    // -----------------------------------------------------------------------

    pub fn add_publisher(&mut self, slots: &NewPublisher) -> ModelResult<String> {
        match Publisher::from_slots(slots, &self.publishers) {
            Ok(publisher) => {
                let name = publisher.name().to_string();
                info!(publisher = %publisher, "publisher added");
                self.publishers.insert(name.clone(), publisher);
                Ok(name)
            }
            Err(violation) => {
                warn!(name = %slots.name, %violation, "publisher rejected");
                Err(violation.into())
            }
        }
    }

    pub fn update_publisher(&mut self, update: &PublisherUpdate) -> ModelResult<UpdateReport> {
        let publisher = self.publishers.require(update.name.as_str())?;
        let mut report = UpdateReport::new(self.publishers.name(), &update.name);
        if let Some(address) = &update.address {
            if address != publisher.address() {
                if let Some(publisher) = self.publishers.get_mut(update.name.as_str()) {
                    publisher.set_address(address);
                }
                report.changed.push("address");
            }
        }
        info!(%report, "publisher updated");
        Ok(report)
    }

    /// Delete a publisher. Movies it published keep existing without one.
    pub fn destroy_publisher(&mut self, name: &str) -> ModelResult<DestroyReport> {
        self.publishers.require(name)?;
        let mut report = DestroyReport::new(self.publishers.name(), name);
        for movie in self.movies.values_mut() {
            if movie.publisher() == Some(name) && movie.forget_publisher() {
                debug!(publisher = name, isbn = %movie.isbn(), "publisher cleared");
                report.stripped.push(StrippedRef {
                    collection: MOVIES_KEY,
                    id: movie.isbn().to_string(),
                    field: "publisher",
                });
            }
        }
        self.publishers.remove(name);
        info!(%report, "publisher destroyed");
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Movies
    // -----------------------------------------------------------------------

    pub fn add_movie(&mut self, slots: &NewMovie) -> ModelResult<Isbn> {
        match Movie::from_slots(slots, &self.movies, &self.people, &self.publishers) {
            Ok(movie) => {
                let isbn = movie.isbn().clone();
                info!(movie = %movie, "movie added");
                self.insert_movie(movie);
                Ok(isbn)
            }
            Err(violation) => {
                warn!(isbn = %slots.isbn, %violation, "movie rejected");
                Err(violation.into())
            }
        }
    }

    pub fn update_movie(&mut self, update: &MovieUpdate) -> ModelResult<UpdateReport> {
        let isbn = &update.isbn;
        let current = self.movies.require(isbn)?.clone();
        let mut movie = current.clone();
        let mut report = UpdateReport::new(self.movies.name(), isbn);
        if let Err(violation) =
            movie.apply_update(update, &self.people, &self.publishers, &mut report.changed)
        {
            warn!(%isbn, %violation, "movie update rejected");
            return Err(violation.into());
        }
        if !report.is_unchanged() {
            self.unlink_movie(&current);
            self.insert_movie(movie);
        }
        info!(%report, "movie updated");
        Ok(report)
    }

    pub fn destroy_movie(&mut self, isbn: &Isbn) -> ModelResult<DestroyReport> {
        self.movies.require(isbn)?;
        self.remove_movie(isbn);
        let report = DestroyReport::new(self.movies.name(), isbn);
        info!(%report, "movie destroyed");
        Ok(report)
    }

    /// Insert a validated movie and record it in the inverse sets of its
    /// people and director.
    pub(crate) fn insert_movie(&mut self, movie: Movie) {
        let isbn = movie.isbn().clone();
        for id in movie.people() {
            if let Some(person) = self.people.get_mut(id) {
                person.link_played(isbn.clone());
            }
        }
        if let Some(director) = movie.director().and_then(|id| self.people.get_mut(&id)) {
            director.link_directed(isbn.clone());
        }
        self.movies.insert(isbn, movie);
    }

    fn remove_movie(&mut self, isbn: &Isbn) -> Option<Movie> {
        let movie = self.movies.remove(isbn)?;
        self.unlink_movie(&movie);
        Some(movie)
    }

    fn unlink_movie(&mut self, movie: &Movie) {
        let isbn = movie.isbn();
        for id in movie.people() {
            if let Some(person) = self.people.get_mut(id) {
                person.unlink_played(isbn);
            }
        }
        if let Some(director) = movie.director().and_then(|id| self.people.get_mut(&id)) {
            director.unlink_directed(isbn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use filmdb_types::ViolationKind;

    fn pid(n: u32) -> PersonId {
        PersonId::new(n).unwrap()
    }

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).unwrap()
    }

    /// Dennett (1), Hofstadter (2), Kubrick (3, director), Reeves (4, actor
    /// represented by 1), Bantam Books, and two movies.
    fn catalog() -> Catalog {
        let mut c = Catalog::new();
        c.add_person(&NewPerson::new(1, "Daniel Dennett")).unwrap();
        c.add_person(&NewPerson::new(2, "Douglas Hofstadter")).unwrap();
        c.add_person(&NewPerson::director(3, "Stanley Kubrick")).unwrap();
        c.add_person(&NewPerson::actor(4, "Keanu Reeves").with_agent(1)).unwrap();
        c.add_publisher(&NewPublisher::new("Bantam Books", "New York, USA")).unwrap();
        c.add_movie(
            &NewMovie::new("0553345842", "The Mind's I", 1982)
                .with_publisher("Bantam Books")
                .with_people([1, 2]),
        )
        .unwrap();
        c.add_movie(
            &NewMovie::new("0465026567", "Gödel, Escher, Bach", 1979)
                .with_people([2, 4])
                .with_director(3),
        )
        .unwrap();
        c
    }

    // -----------------------------------------------------------------------
    // Add
    // -----------------------------------------------------------------------

    #[test]
    fn add_links_inverse_references() {
        let c = catalog();
        let hofstadter = c.person(pid(2)).unwrap();
        assert_eq!(hofstadter.played_movies().len(), 2);
        let kubrick = c.person(pid(3)).unwrap();
        assert!(kubrick.directed_movies().contains(&isbn("0465026567")));
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let mut c = catalog();
        let err = c.add_person(&NewPerson::new(1, "Impostor")).unwrap_err();
        assert_eq!(err.violation().map(|v| v.kind()), Some(ViolationKind::Uniqueness));
        assert_eq!(c.person(pid(1)).unwrap().name(), "Daniel Dennett");
    }

    #[test]
    fn rejected_movie_leaves_catalog_unchanged() {
        let mut c = catalog();
        let before = c.clone();
        assert!(c
            .add_movie(&NewMovie::new("0262540673", "Brainstorms", 1981).with_people([1, 9]))
            .is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn category_views() {
        let c = catalog();
        assert_eq!(c.actors().map(|p| p.id()).collect::<Vec<_>>(), vec![pid(4)]);
        assert_eq!(c.directors().map(|p| p.id()).collect::<Vec<_>>(), vec![pid(3)]);
        let actor = c.person(pid(4)).unwrap();
        assert_eq!(c.actor_agent(actor).map(|p| p.name()), Some("Daniel Dennett"));
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[test]
    fn update_movie_relinks_people() {
        let mut c = catalog();
        let report = c
            .update_movie(&MovieUpdate::new(isbn("0553345842")).remove_people([2]).add_people([4]))
            .unwrap();
        assert_eq!(report.changed, vec!["people(added)", "people(removed)"]);
        assert_eq!(c.person(pid(2)).unwrap().played_movies().len(), 1);
        assert_eq!(c.person(pid(4)).unwrap().played_movies().len(), 2);
    }

    #[test]
    fn failing_update_rolls_back_every_change() {
        let mut c = catalog();
        let before = c.clone();
        let err = c
            .update_movie(&MovieUpdate::new(isbn("0553345842")).title("Brainstorms").year(1800))
            .unwrap_err();
        assert_eq!(err.violation().map(|v| v.kind()), Some(ViolationKind::Interval));
        assert_eq!(c, before);
    }

    #[test]
    fn update_with_no_change_reports_empty() {
        let mut c = catalog();
        let report = c
            .update_movie(&MovieUpdate::new(isbn("0553345842")).title("The Mind's I"))
            .unwrap();
        assert!(report.is_unchanged());
    }

    #[test]
    fn update_missing_record_is_not_found() {
        let mut c = catalog();
        let err = c.update_person(&PersonUpdate::new(pid(99)).name("Nobody")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { collection: "people", .. }));
    }

    #[test]
    fn failing_person_update_keeps_new_name_out() {
        let mut c = catalog();
        let before = c.clone();
        let err = c
            .update_person(&PersonUpdate::new(pid(4)).name("Neo").agent(99))
            .unwrap_err();
        assert_eq!(
            err.violation().map(|v| v.kind()),
            Some(ViolationKind::ReferentialIntegrity)
        );
        assert_eq!(c.person(pid(4)).unwrap().name(), "Keanu Reeves");
        assert_eq!(c.person(pid(4)).unwrap().agent(), Some(pid(1)));
        assert_eq!(c, before);
    }

    #[test]
    fn agent_on_director_is_frozen() {
        let mut c = catalog();
        let err = c.update_person(&PersonUpdate::new(pid(3)).agent(1)).unwrap_err();
        assert_eq!(err.violation().map(|v| v.kind()), Some(ViolationKind::FrozenValue));
    }

    #[test]
    fn update_publisher_address() {
        let mut c = catalog();
        let report = c
            .update_publisher(&PublisherUpdate::new("Bantam Books").address("Toronto"))
            .unwrap();
        assert_eq!(report.changed, vec!["address"]);
        assert_eq!(c.publisher("Bantam Books").unwrap().address(), "Toronto");
    }

    // -----------------------------------------------------------------------
    // Destroy
    // -----------------------------------------------------------------------

    #[test]
    fn destroying_director_cascades_movies() {
        let mut c = catalog();
        let report = c.destroy_person(pid(3)).unwrap();
        assert_eq!(report.cascaded, vec![isbn("0465026567")]);
        assert!(c.movie(&isbn("0465026567")).is_none());
        assert_eq!(c.person(pid(2)).unwrap().played_movies().len(), 1);
    }

    #[test]
    fn destroying_agent_keeps_actor() {
        let mut c = catalog();
        let report = c.destroy_person(pid(1)).unwrap();
        let actor = c.person(pid(4)).unwrap();
        assert!(actor.agent().is_none());
        let movie = c.movie(&isbn("0553345842")).unwrap();
        assert!(!movie.people().contains(&pid(1)));
        assert_eq!(report.stripped.len(), 2);
        assert!(report.cascaded.is_empty());
    }

    #[test]
    fn destroying_publisher_nulls_references() {
        let mut c = catalog();
        c.destroy_publisher("Bantam Books").unwrap();
        assert!(c.movie(&isbn("0553345842")).unwrap().publisher().is_none());
        assert!(c.publishers().is_empty());
    }

    #[test]
    fn destroying_movie_unlinks_people() {
        let mut c = catalog();
        c.destroy_movie(&isbn("0465026567")).unwrap();
        assert!(c.person(pid(3)).unwrap().directed_movies().is_empty());
        assert_eq!(c.person(pid(4)).unwrap().played_movies().len(), 0);
    }

    #[test]
    fn destroy_missing_record_is_not_found() {
        let mut c = catalog();
        assert!(matches!(
            c.destroy_movie(&isbn("0262540673")),
            Err(ModelError::NotFound { collection: "movies", .. })
        ));
        assert!(c.destroy_publisher("Basic Books").is_err());
    }
}
