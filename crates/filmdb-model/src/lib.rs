//! The filmdb data layer.
//!
//! A [`Catalog`] owns one [`Collection`] per entity type (people, publishers,
//! movies) and is the only way to change them. Every change goes through the
//! per-attribute validators, so the collections always satisfy:
//!
//! - identifiers are unique and never change once assigned;
//! - every reference (movie publisher, movie people, movie director, actor
//!   agent) resolves to an existing instance;
//! - each person's `played_movies` / `directed_movies` mirror the movies that
//!   reference it.
//!
//! Actors and directors are people whose [`Category`] carries the
//! category-specific payload; they live in the people collection and are
//! persisted under their own blob keys.
//!
//! Persistence is whole-collection: [`Catalog::retrieve_all`] loads every
//! blob from a [`filmdb_store::BlobStore`] and [`Catalog::save_all`] writes
//! them back.

pub mod catalog;
pub mod collection;
pub mod error;
pub mod movie;
pub mod person;
pub mod persistence;
pub mod publisher;
pub mod record;
pub mod update;

pub use catalog::{Catalog, DestroyReport, StrippedRef};
pub use collection::{Collection, Movies, People, Publishers};
pub use error::{ModelError, ModelResult};
pub use movie::{Movie, MovieUpdate, NewMovie};
pub use person::{Category, NewCategory, NewPerson, Person, PersonUpdate};
pub use persistence::{CollectionLoad, LoadReport, SaveReport, SkippedRecord};
pub use publisher::{NewPublisher, Publisher, PublisherUpdate};
pub use update::{RefUpdate, UpdateReport};

pub use filmdb_types::{CheckOutcome, Checked, ConstraintViolation, Isbn, PersonId, ViolationKind};
