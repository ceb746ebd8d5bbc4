//! Blob keys and the JSON record shapes stored under them.
//!
//! Each blob is one JSON object mapping identifier text to a record. Records
//! carry only stored properties: the inverse movie sets of a person are
//! rebuilt from the movies on load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::movie::{Movie, NewMovie};
use crate::person::{NewCategory, NewPerson, Person};
use crate::publisher::{NewPublisher, Publisher};

/// Base-category people.
pub const PEOPLE_KEY: &str = "people";
pub const PUBLISHERS_KEY: &str = "publishers";
pub const MOVIES_KEY: &str = "movies";
pub const ACTORS_KEY: &str = "actors";
pub const DIRECTORS_KEY: &str = "directors";

/// Every blob key, in load order.
pub const ALL_KEYS: [&str; 5] = [PUBLISHERS_KEY, PEOPLE_KEY, DIRECTORS_KEY, ACTORS_KEY, MOVIES_KEY];

/// A number or numeric text. Stored identifiers and years are numbers, but
/// hand-edited blobs often quote them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(serde_json::Number),
    Text(String),
}

impl From<u32> for RawScalar {
    fn from(n: u32) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for RawScalar {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn text_or_empty(raw: Option<RawScalar>) -> String {
    raw.map(|r| r.to_string()).unwrap_or_default()
}

/// Record under `people`, `directors` and `actors`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(rename = "personId")]
    pub person_id: RawScalar,
    pub name: String,
    /// Only meaningful under `actors`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<RawScalar>,
}

impl PersonRecord {
    pub fn from_person(person: &Person) -> Self {
        Self {
            person_id: person.id().get().into(),
            name: person.name().to_string(),
            agent_id: person.agent().map(|a| a.get().into()),
        }
    }

    /// Creation slots for a person of the category stored under `key`.
    pub fn into_slots(self, key: &str) -> NewPerson {
        let category = match key {
            ACTORS_KEY => NewCategory::Actor {
                agent: text_or_empty(self.agent_id),
            },
            DIRECTORS_KEY => NewCategory::Director,
            _ => NewCategory::Base,
        };
        NewPerson {
            person_id: self.person_id.to_string(),
            name: self.name,
            category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherRecord {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl PublisherRecord {
    pub fn from_publisher(publisher: &Publisher) -> Self {
        Self {
            name: publisher.name().to_string(),
            address: publisher.address().to_string(),
        }
    }

    pub fn into_slots(self) -> NewPublisher {
        NewPublisher {
            name: self.name,
            address: self.address,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub isbn: String,
    pub title: String,
    pub year: RawScalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<String>,
    #[serde(rename = "personIdRefs", alias = "actorIdRefs", default)]
    pub person_id_refs: Vec<RawScalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director_id: Option<RawScalar>,
}

impl MovieRecord {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            isbn: movie.isbn().to_string(),
            title: movie.title().to_string(),
            year: movie.year().into(),
            publisher_id: movie.publisher().map(str::to_string),
            person_id_refs: movie.people().iter().map(|p| p.get().into()).collect(),
            director_id: movie.director().map(|d| d.get().into()),
        }
    }

    pub fn into_slots(self) -> NewMovie {
        NewMovie {
            isbn: self.isbn,
            title: self.title,
            year: self.year.to_string(),
            publisher: self.publisher_id.unwrap_or_default(),
            people: self.person_id_refs.iter().map(ToString::to_string).collect(),
            director: text_or_empty(self.director_id),
        }
    }
}
