//! Keyed in-memory collections of live instances.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::Display;

use filmdb_types::{Isbn, PersonId};

use crate::error::{ModelError, ModelResult};
use crate::movie::Movie;
use crate::person::Person;
use crate::publisher::Publisher;

/// All people, including actors and directors.
pub type People = Collection<PersonId, Person>;
/// All publishers, keyed by name.
pub type Publishers = Collection<String, Publisher>;
/// All movies, keyed by ISBN.
pub type Movies = Collection<Isbn, Movie>;

/// A map from identifier to instance, named after the blob it persists to.
///
/// Reads are public; writes are reserved to the [`crate::Catalog`] so that
/// validation and inverse references cannot be bypassed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection<K: Ord, V> {
    name: &'static str,
    instances: BTreeMap<K, V>,
}

impl<K: Ord + Display, V> Collection<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            instances: BTreeMap::new(),
        }
    }

    /// Collection name, also the blob key of its base records.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.instances.get(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.instances.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.instances.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.instances.values()
    }

    /// Look up `id`, failing with [`ModelError::NotFound`].
    pub fn require<Q>(&self, id: &Q) -> ModelResult<&V>
    where
        K: Borrow<Q>,
        Q: Ord + Display + ?Sized,
    {
        self.instances.get(id).ok_or_else(|| ModelError::NotFound {
            collection: self.name,
            id: id.to_string(),
        })
    }

    pub(crate) fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.instances.get_mut(id)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.instances.values_mut()
    }

    pub(crate) fn insert(&mut self, id: K, value: V) -> Option<V> {
        self.instances.insert(id, value)
    }

    pub(crate) fn remove<Q>(&mut self, id: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.instances.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.instances.clear();
    }
}
