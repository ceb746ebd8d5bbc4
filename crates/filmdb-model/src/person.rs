//! People, and the Actor / Director categories of a person.

use std::collections::BTreeSet;
use std::fmt;

use filmdb_types::{Checked, ConstraintViolation, Isbn, PersonId};

use crate::collection::People;
use crate::update::RefUpdate;

/// Category of a person. A person belongs to exactly one category for its
/// whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Category {
    /// A plain person, neither actor nor director.
    Base,
    Actor { agent: Option<PersonId> },
    Director,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "Person",
            Self::Actor { .. } => "Actor",
            Self::Director => "Director",
        }
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Format check only. An empty value passes, since person IDs also appear as
/// optional references.
pub fn check_person_id(raw: &str) -> Checked {
    if raw.trim().is_empty() {
        return Ok(());
    }
    PersonId::parse(raw).map(drop)
}

/// Format, mandatory-value and uniqueness check for a new person.
pub fn check_person_id_as_id(raw: &str, people: &People) -> Checked {
    person_id_as_id(raw, people).map(drop)
}

/// Format and existence check for a reference to a person.
pub fn check_person_id_as_id_ref(raw: &str, people: &People) -> Checked {
    person_ref(raw, people).map(drop)
}

pub fn check_name(name: &str) -> Checked {
    if name.is_empty() {
        return Err(ConstraintViolation::MandatoryValueMissing(
            "A name must be provided!".into(),
        ));
    }
    if name.trim().is_empty() {
        return Err(ConstraintViolation::Range(
            "The name must be a non-empty string!".into(),
        ));
    }
    Ok(())
}

/// An actor's agent is an optional reference to any person.
pub fn check_agent(raw: &str, people: &People) -> Checked {
    check_person_id_as_id_ref(raw, people)
}

pub(crate) fn person_id_as_id(raw: &str, people: &People) -> Result<PersonId, ConstraintViolation> {
    let id = PersonId::parse(raw)?;
    if people.contains(&id) {
        return Err(ConstraintViolation::Uniqueness(format!(
            "There is already a person record with person ID {id}!"
        )));
    }
    Ok(id)
}

/// Parse an optional person reference; empty input means "no reference".
pub(crate) fn person_ref(raw: &str, people: &People) -> Result<Option<PersonId>, ConstraintViolation> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let id = PersonId::parse(raw)?;
    require_person(id, people)?;
    Ok(Some(id))
}

pub(crate) fn require_person(id: PersonId, people: &People) -> Result<&Person, ConstraintViolation> {
    people.get(&id).ok_or_else(|| {
        ConstraintViolation::ReferentialIntegrity(format!(
            "There is no person record with person ID {id}!"
        ))
    })
}

// ---------------------------------------------------------------------------
// Creation and update slots
// ---------------------------------------------------------------------------

/// Category requested for a new person. The agent is raw text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NewCategory {
    #[default]
    Base,
    Actor { agent: String },
    Director,
}

/// Raw field values for creating a person.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPerson {
    pub person_id: String,
    pub name: String,
    pub category: NewCategory,
}

impl NewPerson {
    pub fn new(person_id: impl ToString, name: impl Into<String>) -> Self {
        Self {
            person_id: person_id.to_string(),
            name: name.into(),
            category: NewCategory::Base,
        }
    }

    /// An actor without an agent.
    pub fn actor(person_id: impl ToString, name: impl Into<String>) -> Self {
        Self {
            category: NewCategory::Actor {
                agent: String::new(),
            },
            ..Self::new(person_id, name)
        }
    }

    pub fn director(person_id: impl ToString, name: impl Into<String>) -> Self {
        Self {
            category: NewCategory::Director,
            ..Self::new(person_id, name)
        }
    }

    /// Make this an actor represented by `agent`.
    pub fn with_agent(mut self, agent: impl ToString) -> Self {
        self.category = NewCategory::Actor {
            agent: agent.to_string(),
        };
        self
    }
}

/// Changes to an existing person. `None` / [`RefUpdate::Keep`] leave a
/// property untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonUpdate {
    pub person_id: PersonId,
    pub name: Option<String>,
    pub agent: RefUpdate,
}

impl PersonUpdate {
    pub fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            name: None,
            agent: RefUpdate::Keep,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn agent(mut self, agent: impl ToString) -> Self {
        self.agent = RefUpdate::set(agent);
        self
    }

    pub fn clear_agent(mut self) -> Self {
        self.agent = RefUpdate::Clear;
        self
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A person, possibly an actor or a director.
///
/// `played_movies` and `directed_movies` are inverse references maintained
/// by the catalog whenever a movie's people or director change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
    category: Category,
    played_movies: BTreeSet<Isbn>,
    directed_movies: BTreeSet<Isbn>,
}

impl Person {
    /// Validate every field of `slots` and build the person. Nothing is
    /// built unless all checks pass.
    pub fn from_slots(slots: &NewPerson, people: &People) -> Result<Self, ConstraintViolation> {
        let id = person_id_as_id(&slots.person_id, people)?;
        check_name(&slots.name)?;
        let category = match &slots.category {
            NewCategory::Base => Category::Base,
            NewCategory::Actor { agent } => Category::Actor {
                agent: person_ref(agent, people)?,
            },
            NewCategory::Director => Category::Director,
        };
        Ok(Self {
            id,
            name: slots.name.clone(),
            category,
            played_movies: BTreeSet::new(),
            directed_movies: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn is_actor(&self) -> bool {
        matches!(self.category, Category::Actor { .. })
    }

    pub fn is_director(&self) -> bool {
        self.category == Category::Director
    }

    /// The actor's agent, `None` for non-actors.
    pub fn agent(&self) -> Option<PersonId> {
        match self.category {
            Category::Actor { agent } => agent,
            _ => None,
        }
    }

    /// Movies listing this person among their people.
    pub fn played_movies(&self) -> &BTreeSet<Isbn> {
        &self.played_movies
    }

    /// Movies naming this person as director.
    pub fn directed_movies(&self) -> &BTreeSet<Isbn> {
        &self.directed_movies
    }

    pub fn set_name(&mut self, name: &str) -> Checked {
        check_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Set or clear the agent of an actor.
    ///
    /// The category of a person is frozen, so this fails for non-actors.
    pub fn set_agent(&mut self, agent: Option<PersonId>, people: &People) -> Checked {
        if !self.is_actor() {
            return Err(ConstraintViolation::FrozenValue(format!(
                "{} {} cannot be given an agent: only actors have one, and the category of a person is fixed",
                self.category.name(),
                self.id
            )));
        }
        if let Some(agent) = agent {
            if agent == self.id {
                return Err(ConstraintViolation::Range(
                    "An actor cannot be their own agent!".into(),
                ));
            }
            require_person(agent, people)?;
        }
        if let Category::Actor { agent: slot } = &mut self.category {
            *slot = agent;
        }
        Ok(())
    }

    pub(crate) fn apply_update(
        &mut self,
        update: &PersonUpdate,
        people: &People,
        changed: &mut Vec<&'static str>,
    ) -> Checked {
        if let Some(name) = &update.name {
            if *name != self.name {
                self.set_name(name)?;
                changed.push("name");
            }
        }
        let agent = match &update.agent {
            RefUpdate::Keep => None,
            RefUpdate::Set(raw) => Some(person_ref(raw, people)?),
            RefUpdate::Clear => Some(None),
        };
        if let Some(agent) = agent {
            if agent != self.agent() {
                self.set_agent(agent, people)?;
                changed.push("agent");
            }
        }
        Ok(())
    }

    /// Drop the agent reference without validation. Returns `true` if an
    /// agent was set.
    pub(crate) fn forget_agent(&mut self) -> bool {
        match &mut self.category {
            Category::Actor { agent } => agent.take().is_some(),
            _ => false,
        }
    }

    pub(crate) fn link_played(&mut self, isbn: Isbn) {
        self.played_movies.insert(isbn);
    }

    pub(crate) fn unlink_played(&mut self, isbn: &Isbn) {
        self.played_movies.remove(isbn);
    }

    pub(crate) fn link_directed(&mut self, isbn: Isbn) {
        self.directed_movies.insert(isbn);
    }

    pub(crate) fn unlink_directed(&mut self, isbn: &Isbn) {
        self.directed_movies.remove(isbn);
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{{ personId: {}, name: {}",
            self.category.name(),
            self.id,
            self.name
        )?;
        if let Some(agent) = self.agent() {
            write!(f, ", agent: {agent}")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmdb_types::ViolationKind;

    fn people_with(ids: &[(u32, &str)]) -> People {
        let mut people = People::new("people");
        for (id, name) in ids {
            let person = Person::from_slots(&NewPerson::new(id, *name), &people).unwrap();
            people.insert(person.id(), person);
        }
        people
    }

    fn kind(result: Checked) -> ViolationKind {
        result.map_or_else(|v| v.kind(), |()| ViolationKind::NoViolation)
    }

    // -----------------------------------------------------------------------
    // Validators
    // -----------------------------------------------------------------------

    #[test]
    fn person_id_check_allows_empty() {
        assert!(check_person_id("").is_ok());
        assert!(check_person_id("7").is_ok());
        assert_eq!(kind(check_person_id("seven")), ViolationKind::Range);
    }

    #[test]
    fn person_id_as_id_requires_value_and_uniqueness() {
        let people = people_with(&[(1, "Daniel Dennett")]);
        assert_eq!(
            kind(check_person_id_as_id("", &people)),
            ViolationKind::MandatoryValueMissing
        );
        assert_eq!(
            kind(check_person_id_as_id("1", &people)),
            ViolationKind::Uniqueness
        );
        assert!(check_person_id_as_id("2", &people).is_ok());
    }

    #[test]
    fn person_id_as_id_ref_requires_existence() {
        let people = people_with(&[(1, "Daniel Dennett")]);
        assert!(check_person_id_as_id_ref("", &people).is_ok());
        assert!(check_person_id_as_id_ref("1", &people).is_ok());
        assert_eq!(
            kind(check_person_id_as_id_ref("9", &people)),
            ViolationKind::ReferentialIntegrity
        );
        assert_eq!(kind(check_agent("-1", &people)), ViolationKind::Range);
    }

    #[test]
    fn name_check() {
        assert_eq!(kind(check_name("")), ViolationKind::MandatoryValueMissing);
        assert_eq!(kind(check_name("   ")), ViolationKind::Range);
        assert!(check_name("Immanuel Kant").is_ok());
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn from_slots_builds_each_category() {
        let people = people_with(&[(1, "Agent Smith")]);

        let base = Person::from_slots(&NewPerson::new(2, "Ann"), &people).unwrap();
        assert_eq!(base.category(), &Category::Base);

        let actor = Person::from_slots(&NewPerson::actor(3, "Bob").with_agent(1), &people).unwrap();
        assert!(actor.is_actor());
        assert_eq!(actor.agent(), PersonId::new(1).ok());

        let director = Person::from_slots(&NewPerson::director(4, "Cy"), &people).unwrap();
        assert!(director.is_director());
        assert!(director.agent().is_none());
    }

    #[test]
    fn from_slots_fails_on_first_invalid_field() {
        let people = people_with(&[(1, "Agent Smith")]);
        let err = Person::from_slots(&NewPerson::new(2, ""), &people).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::MandatoryValueMissing);

        let err = Person::from_slots(&NewPerson::actor(2, "Bob").with_agent(99), &people).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::ReferentialIntegrity);
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    #[test]
    fn set_agent_only_on_actors() {
        let people = people_with(&[(1, "Agent Smith")]);
        let mut director = Person::from_slots(&NewPerson::director(4, "Cy"), &people).unwrap();
        let err = director.set_agent(PersonId::new(1).ok(), &people).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::FrozenValue);
    }

    #[test]
    fn actor_cannot_be_own_agent() {
        let people = people_with(&[(1, "Agent Smith")]);
        let mut actor = Person::from_slots(&NewPerson::actor(3, "Bob"), &people).unwrap();
        let own = actor.id();
        assert_eq!(
            actor.set_agent(Some(own), &people).unwrap_err().kind(),
            ViolationKind::Range
        );
        assert!(actor.set_agent(PersonId::new(1).ok(), &people).is_ok());
        assert!(actor.forget_agent());
        assert!(actor.agent().is_none());
    }

    #[test]
    fn failed_name_change_keeps_old_name() {
        let people = people_with(&[]);
        let mut person = Person::from_slots(&NewPerson::new(1, "Ann"), &people).unwrap();
        assert!(person.set_name(" ").is_err());
        assert_eq!(person.name(), "Ann");
    }

    #[test]
    fn display_names_category() {
        let people = people_with(&[(1, "Agent Smith")]);
        let actor = Person::from_slots(&NewPerson::actor(3, "Bob").with_agent(1), &people).unwrap();
        assert_eq!(actor.to_string(), "Actor{ personId: 3, name: Bob, agent: 1 }");
    }
}
