//! Movies and their references to publishers, people and directors.

use std::collections::BTreeSet;
use std::fmt;

use filmdb_types::{Checked, ConstraintViolation, Isbn, PersonId};

use crate::collection::{Movies, People, Publishers};
use crate::person::{person_ref, require_person};
use crate::publisher;
use crate::update::RefUpdate;

/// First year accepted for a movie.
pub const MIN_YEAR: i32 = 1895;
/// Last year accepted for a movie.
pub const MAX_YEAR: i32 = 2100;
/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 120;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Format check only; an empty ISBN passes.
pub fn check_isbn(raw: &str) -> Checked {
    if raw.is_empty() {
        return Ok(());
    }
    Isbn::parse(raw).map(drop)
}

/// Format, mandatory-value and uniqueness check for a new movie.
pub fn check_isbn_as_id(raw: &str, movies: &Movies) -> Checked {
    isbn_as_id(raw, movies).map(drop)
}

pub fn check_title(title: &str) -> Checked {
    if title.is_empty() {
        return Err(ConstraintViolation::MandatoryValueMissing(
            "A title must be provided!".into(),
        ));
    }
    if title.trim().is_empty() {
        return Err(ConstraintViolation::Range(
            "The title must be a non-empty string!".into(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ConstraintViolation::StringLength(format!(
            "The title must be at most {MAX_TITLE_LEN} characters long!"
        )));
    }
    Ok(())
}

pub fn check_year(raw: &str) -> Checked {
    parse_year(raw).map(drop)
}

/// Optional reference to a publisher, by name.
pub fn check_publisher(raw: &str, publishers: &Publishers) -> Checked {
    publisher::check_name_as_id_ref(raw, publishers)
}

/// Optional reference to any person.
pub fn check_person(raw: &str, people: &People) -> Checked {
    person_ref(raw, people).map(drop)
}

/// Optional reference to a person in the director category.
pub fn check_director(raw: &str, people: &People) -> Checked {
    director_ref(raw, people).map(drop)
}

pub(crate) fn isbn_as_id(raw: &str, movies: &Movies) -> Result<Isbn, ConstraintViolation> {
    let isbn = Isbn::parse(raw)?;
    if movies.contains(&isbn) {
        return Err(ConstraintViolation::Uniqueness(
            "There is already a movie record with this ISBN!".into(),
        ));
    }
    Ok(isbn)
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, ConstraintViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConstraintViolation::MandatoryValueMissing(
            "A value for the year must be provided!".into(),
        ));
    }
    let year: i32 = trimmed
        .parse()
        .map_err(|_| ConstraintViolation::Range("The year must be an integer!".into()))?;
    check_year_value(year)?;
    Ok(year)
}

fn check_year_value(year: i32) -> Checked {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ConstraintViolation::Interval(format!(
            "The year must be between {MIN_YEAR} and {MAX_YEAR}!"
        )));
    }
    Ok(())
}

pub(crate) fn director_ref(raw: &str, people: &People) -> Result<Option<PersonId>, ConstraintViolation> {
    let Some(id) = person_ref(raw, people)? else {
        return Ok(None);
    };
    require_director(id, people)?;
    Ok(Some(id))
}

fn require_director(id: PersonId, people: &People) -> Checked {
    let person = require_person(id, people)?;
    if !person.is_director() {
        return Err(ConstraintViolation::ReferentialIntegrity(format!(
            "Person {id} is a {}, not a director!",
            person.category().name()
        )));
    }
    Ok(())
}

fn publisher_ref(raw: &str, publishers: &Publishers) -> Result<Option<String>, ConstraintViolation> {
    check_publisher(raw, publishers)?;
    Ok((!raw.is_empty()).then(|| raw.to_string()))
}

/// Parse a list of raw person references, skipping empty entries.
fn people_refs(raw: &[String], people: &People) -> Result<Vec<PersonId>, ConstraintViolation> {
    raw.iter()
        .filter_map(|r| person_ref(r, people).transpose())
        .collect()
}

// ---------------------------------------------------------------------------
// Creation and update slots
// ---------------------------------------------------------------------------

/// Raw field values for creating a movie. Empty `publisher` / `director`
/// mean "no reference".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewMovie {
    pub isbn: String,
    pub title: String,
    pub year: String,
    pub publisher: String,
    pub people: Vec<String>,
    pub director: String,
}

impl NewMovie {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, year: impl ToString) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            year: year.to_string(),
            ..Self::default()
        }
    }

    pub fn with_publisher(mut self, name: impl Into<String>) -> Self {
        self.publisher = name.into();
        self
    }

    pub fn with_people<I, T>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.people = people.into_iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_director(mut self, director: impl ToString) -> Self {
        self.director = director.to_string();
        self
    }
}

/// Changes to an existing movie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieUpdate {
    pub isbn: Isbn,
    pub title: Option<String>,
    pub year: Option<String>,
    pub people_to_add: Vec<String>,
    pub people_to_remove: Vec<String>,
    pub publisher: RefUpdate,
    pub director: RefUpdate,
}

impl MovieUpdate {
    pub fn new(isbn: Isbn) -> Self {
        Self {
            isbn,
            title: None,
            year: None,
            people_to_add: Vec::new(),
            people_to_remove: Vec::new(),
            publisher: RefUpdate::Keep,
            director: RefUpdate::Keep,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn year(mut self, year: impl ToString) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn add_people<I, T>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.people_to_add
            .extend(people.into_iter().map(|p| p.to_string()));
        self
    }

    pub fn remove_people<I, T>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.people_to_remove
            .extend(people.into_iter().map(|p| p.to_string()));
        self
    }

    pub fn publisher(mut self, name: impl ToString) -> Self {
        self.publisher = RefUpdate::set(name);
        self
    }

    pub fn clear_publisher(mut self) -> Self {
        self.publisher = RefUpdate::Clear;
        self
    }

    pub fn director(mut self, director: impl ToString) -> Self {
        self.director = RefUpdate::set(director);
        self
    }

    pub fn clear_director(mut self) -> Self {
        self.director = RefUpdate::Clear;
        self
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A movie. References are held as identifiers and resolved through the
/// catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Movie {
    isbn: Isbn,
    title: String,
    year: i32,
    publisher: Option<String>,
    people: BTreeSet<PersonId>,
    director: Option<PersonId>,
}

impl Movie {
    /// Validate every field of `slots` and build the movie. Nothing is
    /// built unless all checks pass.
    pub fn from_slots(
        slots: &NewMovie,
        movies: &Movies,
        people: &People,
        publishers: &Publishers,
    ) -> Result<Self, ConstraintViolation> {
        let isbn = isbn_as_id(&slots.isbn, movies)?;
        check_title(&slots.title)?;
        let year = parse_year(&slots.year)?;
        let publisher = publisher_ref(&slots.publisher, publishers)?;
        let cast = people_refs(&slots.people, people)?;
        let director = director_ref(&slots.director, people)?;
        Ok(Self {
            isbn,
            title: slots.title.clone(),
            year,
            publisher,
            people: cast.into_iter().collect(),
            director,
        })
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Name of the publisher, if any.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn people(&self) -> &BTreeSet<PersonId> {
        &self.people
    }

    pub fn director(&self) -> Option<PersonId> {
        self.director
    }

    pub fn set_title(&mut self, title: &str) -> Checked {
        check_title(title)?;
        self.title = title.to_string();
        Ok(())
    }

    pub fn set_year(&mut self, year: i32) -> Checked {
        check_year_value(year)?;
        self.year = year;
        Ok(())
    }

    pub fn set_publisher(&mut self, name: Option<&str>, publishers: &Publishers) -> Checked {
        if let Some(name) = name {
            check_publisher(name, publishers)?;
        }
        self.publisher = name.filter(|n| !n.is_empty()).map(str::to_string);
        Ok(())
    }

    pub fn add_person(&mut self, id: PersonId, people: &People) -> Checked {
        require_person(id, people)?;
        self.people.insert(id);
        Ok(())
    }

    pub fn remove_person(&mut self, id: PersonId, people: &People) -> Checked {
        require_person(id, people)?;
        self.people.remove(&id);
        Ok(())
    }

    pub fn set_director(&mut self, director: Option<PersonId>, people: &People) -> Checked {
        if let Some(id) = director {
            require_director(id, people)?;
        }
        self.director = director;
        Ok(())
    }

    pub(crate) fn apply_update(
        &mut self,
        update: &MovieUpdate,
        people: &People,
        publishers: &Publishers,
        changed: &mut Vec<&'static str>,
    ) -> Checked {
        if let Some(title) = &update.title {
            if *title != self.title {
                self.set_title(title)?;
                changed.push("title");
            }
        }
        if let Some(raw) = &update.year {
            let year = parse_year(raw)?;
            if year != self.year {
                self.set_year(year)?;
                changed.push("year");
            }
        }
        let added = people_refs(&update.people_to_add, people)?;
        if !added.is_empty() {
            for id in added {
                self.add_person(id, people)?;
            }
            changed.push("people(added)");
        }
        let removed = people_refs(&update.people_to_remove, people)?;
        if !removed.is_empty() {
            for id in removed {
                self.remove_person(id, people)?;
            }
            changed.push("people(removed)");
        }
        let publisher = match &update.publisher {
            RefUpdate::Keep => None,
            RefUpdate::Set(raw) => Some(publisher_ref(raw, publishers)?),
            RefUpdate::Clear => Some(None),
        };
        if let Some(publisher) = publisher {
            if publisher != self.publisher {
                self.set_publisher(publisher.as_deref(), publishers)?;
                changed.push("publisher");
            }
        }
        let director = match &update.director {
            RefUpdate::Keep => None,
            RefUpdate::Set(raw) => Some(director_ref(raw, people)?),
            RefUpdate::Clear => Some(None),
        };
        if let Some(director) = director {
            if director != self.director {
                self.set_director(director, people)?;
                changed.push("director");
            }
        }
        Ok(())
    }

    /// Drop a person from `people` without validation.
    pub(crate) fn forget_person(&mut self, id: PersonId) -> bool {
        self.people.remove(&id)
    }

    /// Drop the publisher reference without validation.
    pub(crate) fn forget_publisher(&mut self) -> bool {
        self.publisher.take().is_some()
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Movie{{ ISBN: {}, title: {}, year: {}",
            self.isbn, self.title, self.year
        )?;
        if let Some(publisher) = &self.publisher {
            write!(f, ", publisher: {publisher}")?;
        }
        let people: Vec<String> = self.people.iter().map(ToString::to_string).collect();
        write!(f, ", people: {}", people.join(","))?;
        if let Some(director) = self.director {
            write!(f, ", director: {director}")?;
        }
        f.write_str(" }")
    }
}
