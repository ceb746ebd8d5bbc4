//! Loading the catalog from a blob store and saving it back.
//!
//! Loading re-validates every record through the same constructors as
//! [`Catalog::add_person`] and friends. A record that fails is skipped and
//! reported; a blob that is not a JSON object fails the whole load.

use std::collections::BTreeMap;
use std::fmt;

use filmdb_store::BlobStore;
use filmdb_types::{ConstraintViolation, PersonId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{ModelError, ModelResult};
use crate::movie::Movie;
use crate::person::{person_ref, NewPerson, Person};
use crate::publisher::Publisher;
use crate::record::{
    MovieRecord, PersonRecord, PublisherRecord, ACTORS_KEY, ALL_KEYS, DIRECTORS_KEY, MOVIES_KEY,
    PEOPLE_KEY, PUBLISHERS_KEY,
};

/// A record, or a reference inside one, that could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    pub key: &'static str,
    /// Identifier the record was stored under.
    pub id: String,
    pub reason: String,
}

/// Outcome of loading one blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionLoad {
    pub key: &'static str,
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
    /// Loaded records that lost a reference which did not resolve.
    pub dropped_refs: Vec<SkippedRecord>,
}

impl CollectionLoad {
    fn new(key: &'static str) -> Self {
        Self {
            key,
            loaded: 0,
            skipped: Vec::new(),
            dropped_refs: Vec::new(),
        }
    }

    fn skip(&mut self, id: String, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(key = self.key, id = %id, %reason, "record skipped");
        self.skipped.push(SkippedRecord {
            key: self.key,
            id,
            reason,
        });
    }

    fn drop_ref(&mut self, id: String, field: &'static str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(key = self.key, id = %id, field, %reason, "reference dropped");
        self.dropped_refs.push(SkippedRecord {
            key: self.key,
            id,
            reason,
        });
    }

    fn finish(self) -> Self {
        info!(
            key = self.key,
            loaded = self.loaded,
            skipped = self.skipped.len(),
            dropped_refs = self.dropped_refs.len(),
            "collection retrieved"
        );
        self
    }
}

/// Outcome of [`Catalog::retrieve_all`], one entry per blob in load order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub collections: Vec<CollectionLoad>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.collections.iter().map(|c| c.loaded).sum()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedRecord> {
        self.collections.iter().flat_map(|c| c.skipped.iter())
    }

    pub fn dropped_refs(&self) -> impl Iterator<Item = &SkippedRecord> {
        self.collections.iter().flat_map(|c| c.dropped_refs.iter())
    }

    /// `true` if every record loaded with all its references.
    pub fn is_clean(&self) -> bool {
        self.skipped().next().is_none() && self.dropped_refs().next().is_none()
    }

    pub fn collection(&self, key: &str) -> Option<&CollectionLoad> {
        self.collections.iter().find(|c| c.key == key)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records loaded, {} skipped, {} references dropped",
            self.loaded(),
            self.skipped().count(),
            self.dropped_refs().count()
        )
    }
}

/// Records written per blob key by [`Catalog::save_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: Vec<(&'static str, usize)>,
}

impl SaveReport {
    pub fn records(&self, key: &str) -> Option<usize> {
        self.written.iter().find(|(k, _)| *k == key).map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.written.iter().map(|(_, n)| n).sum()
    }
}

/// Decode the blob under `key` into `(id, record)` pairs. An absent blob is
/// empty; a record that does not decode is returned as its error text.
fn read_records<S, R>(store: &S, key: &'static str) -> ModelResult<Vec<(String, Result<R, String>)>>
where
    S: BlobStore + ?Sized,
    R: DeserializeOwned,
{
    let Some(blob) = store.read(key)? else {
        debug!(key, "blob absent, treated as empty");
        return Ok(Vec::new());
    };
    let value: serde_json::Value =
        serde_json::from_str(&blob).map_err(|e| ModelError::CorruptBlob {
            key,
            reason: e.to_string(),
        })?;
    let serde_json::Value::Object(map) = value else {
        return Err(ModelError::CorruptBlob {
            key,
            reason: "not a JSON object".into(),
        });
    };
    debug!(key, records = map.len(), bytes = blob.len(), "blob read");
    Ok(map
        .into_iter()
        .map(|(id, v)| (id, serde_json::from_value(v).map_err(|e| e.to_string())))
        .collect())
}

fn write_records<S, R>(store: &S, key: &'static str, records: &BTreeMap<String, R>) -> ModelResult<usize>
where
    S: BlobStore + ?Sized,
    R: Serialize,
{
    let blob = serde_json::to_string(records).map_err(|e| ModelError::Serialization(e.to_string()))?;
    store.write(key, &blob)?;
    debug!(key, records = records.len(), bytes = blob.len(), "blob written");
    Ok(records.len())
}

impl Catalog {
    /// Replace the catalog with the contents of `store`.
    ///
    /// Publishers and people load before movies, so every movie reference
    /// can be checked. On error the catalog is left unchanged.
    pub fn retrieve_all<S: BlobStore + ?Sized>(&mut self, store: &S) -> ModelResult<LoadReport> {
        let mut fresh = Catalog::new();
        let mut report = LoadReport::default();
        report.collections.push(fresh.retrieve_publishers(store)?);
        report.collections.extend(fresh.retrieve_people(store)?);
        report.collections.push(fresh.retrieve_movies(store)?);
        *self = fresh;
        info!(%report, "catalog retrieved");
        Ok(report)
    }

    /// Add the publishers stored in `store`.
    pub fn retrieve_publishers<S: BlobStore + ?Sized>(&mut self, store: &S) -> ModelResult<CollectionLoad> {
        let mut load = CollectionLoad::new(PUBLISHERS_KEY);
        for (id, record) in read_records::<_, PublisherRecord>(store, PUBLISHERS_KEY)? {
            let publisher = record.and_then(|r| {
                Publisher::from_slots(&r.into_slots(), &self.publishers).map_err(|v| v.to_string())
            });
            match publisher {
                Ok(publisher) => {
                    self.publishers.insert(publisher.name().to_string(), publisher);
                    load.loaded += 1;
                }
                Err(reason) => load.skip(id, reason),
            }
        }
        Ok(load.finish())
    }

    /// Add the people stored in `store`: base people, then directors, then
    /// actors.
    ///
    /// Actors load in two passes. Every actor is inserted without its agent
    /// first, then agents are linked, so agents stored later in the blob and
    /// agent cycles both resolve. An agent that does not resolve is dropped
    /// from its actor and reported; the actor itself still loads.
    pub fn retrieve_people<S: BlobStore + ?Sized>(&mut self, store: &S) -> ModelResult<Vec<CollectionLoad>> {
        let mut loads = Vec::with_capacity(3);
        for key in [PEOPLE_KEY, DIRECTORS_KEY] {
            let mut load = CollectionLoad::new(key);
            for (id, record) in read_records::<_, PersonRecord>(store, key)? {
                match record.and_then(|r| self.load_person(&r.into_slots(key)).map_err(|v| v.to_string())) {
                    Ok(_) => load.loaded += 1,
                    Err(reason) => load.skip(id, reason),
                }
            }
            loads.push(load.finish());
        }

        let mut load = CollectionLoad::new(ACTORS_KEY);
        let mut agents = Vec::new();
        for (id, record) in read_records::<_, PersonRecord>(store, ACTORS_KEY)? {
            let mut record = match record {
                Ok(record) => record,
                Err(reason) => {
                    load.skip(id, reason);
                    continue;
                }
            };
            let agent = record.agent_id.take();
            match self.load_person(&record.into_slots(ACTORS_KEY)) {
                Ok(actor) => {
                    load.loaded += 1;
                    if let Some(agent) = agent {
                        agents.push((id, actor, agent.to_string()));
                    }
                }
                Err(v) => load.skip(id, v.to_string()),
            }
        }
        for (id, actor, agent) in agents {
            if let Err(v) = self.link_agent(actor, &agent) {
                load.drop_ref(id, "agent", v.to_string());
            }
        }
        loads.push(load.finish());
        Ok(loads)
    }

    /// Add the movies stored in `store`, linking them into the inverse
    /// references of their people.
    pub fn retrieve_movies<S: BlobStore + ?Sized>(&mut self, store: &S) -> ModelResult<CollectionLoad> {
        let mut load = CollectionLoad::new(MOVIES_KEY);
        for (id, record) in read_records::<_, MovieRecord>(store, MOVIES_KEY)? {
            let movie = record.and_then(|r| {
                Movie::from_slots(&r.into_slots(), &self.movies, &self.people, &self.publishers)
                    .map_err(|v| v.to_string())
            });
            match movie {
                Ok(movie) => {
                    self.insert_movie(movie);
                    load.loaded += 1;
                }
                Err(reason) => load.skip(id, reason),
            }
        }
        Ok(load.finish())
    }

    fn load_person(&mut self, slots: &NewPerson) -> Result<PersonId, ConstraintViolation> {
        let person = Person::from_slots(slots, &self.people)?;
        let id = person.id();
        self.people.insert(id, person);
        Ok(id)
    }

    fn link_agent(&mut self, actor: PersonId, raw_agent: &str) -> Result<(), ConstraintViolation> {
        let agent = person_ref(raw_agent, &self.people)?;
        let Some(mut person) = self.people.get(&actor).cloned() else {
            return Ok(());
        };
        person.set_agent(agent, &self.people)?;
        self.people.insert(actor, person);
        debug!(actor = %actor, agent = raw_agent, "agent linked");
        Ok(())
    }

    /// Write every collection to `store`.
    pub fn save_all<S: BlobStore + ?Sized>(&self, store: &S) -> ModelResult<SaveReport> {
        let mut report = SaveReport::default();
        report.written.push((PUBLISHERS_KEY, self.save_publishers(store)?));
        report.written.extend(self.save_people(store)?);
        report.written.push((MOVIES_KEY, self.save_movies(store)?));
        info!(records = report.total(), blobs = report.written.len(), "catalog saved");
        Ok(report)
    }

    pub fn save_publishers<S: BlobStore + ?Sized>(&self, store: &S) -> ModelResult<usize> {
        let records: BTreeMap<String, PublisherRecord> = self
            .publishers
            .iter()
            .map(|(name, p)| (name.clone(), PublisherRecord::from_publisher(p)))
            .collect();
        write_records(store, PUBLISHERS_KEY, &records)
    }

    /// Write people split by category: base people under `people`, and each
    /// category under its own key.
    pub fn save_people<S: BlobStore + ?Sized>(&self, store: &S) -> ModelResult<Vec<(&'static str, usize)>> {
        let mut written = Vec::with_capacity(3);
        for key in [PEOPLE_KEY, DIRECTORS_KEY, ACTORS_KEY] {
            let records: BTreeMap<String, PersonRecord> = self
                .people
                .iter()
                .filter(|(_, p)| category_key(p) == key)
                .map(|(id, p)| (id.to_string(), PersonRecord::from_person(p)))
                .collect();
            written.push((key, write_records(store, key, &records)?));
        }
        Ok(written)
    }

    pub fn save_movies<S: BlobStore + ?Sized>(&self, store: &S) -> ModelResult<usize> {
        let records: BTreeMap<String, MovieRecord> = self
            .movies
            .iter()
            .map(|(isbn, m)| (isbn.to_string(), MovieRecord::from_movie(m)))
            .collect();
        write_records(store, MOVIES_KEY, &records)
    }

    /// Empty the catalog and reset every blob in `store` to `{}`.
    ///
    /// The catalog is emptied before any blob is written. Blobs are written
    /// one by one, so a failed write leaves the earlier keys reset and the
    /// later ones untouched; calling `clear` again finishes the job.
    pub fn clear<S: BlobStore + ?Sized>(&mut self, store: &S) -> ModelResult<()> {
        *self = Catalog::new();
        for key in ALL_KEYS {
            store.write(key, "{}")?;
        }
        info!("catalog cleared");
        Ok(())
    }
}

fn category_key(person: &Person) -> &'static str {
    if person.is_actor() {
        ACTORS_KEY
    } else if person.is_director() {
        DIRECTORS_KEY
    } else {
        PEOPLE_KEY
    }
}
