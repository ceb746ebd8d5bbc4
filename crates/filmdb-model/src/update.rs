//! Shared pieces of the update operations.

use std::fmt;

/// Requested change of an optional single-valued reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefUpdate {
    /// Leave the reference as it is.
    #[default]
    Keep,
    /// Point the reference at the given identifier (raw text).
    Set(String),
    /// Remove the reference.
    Clear,
}

impl RefUpdate {
    pub fn set(id: impl ToString) -> Self {
        Self::Set(id.to_string())
    }
}

/// Outcome of a successful update: which properties actually changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport {
    pub collection: &'static str,
    pub id: String,
    pub changed: Vec<&'static str>,
}

impl UpdateReport {
    pub(crate) fn new(collection: &'static str, id: impl ToString) -> Self {
        Self {
            collection,
            id: id.to_string(),
            changed: Vec::new(),
        }
    }

    /// `true` if no property value changed.
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.changed.len() {
            0 => write!(f, "No property value changed for {} {}!", self.collection, self.id),
            1 => write!(
                f,
                "Property {} modified for {} {}",
                self.changed[0], self.collection, self.id
            ),
            _ => write!(
                f,
                "Properties {} modified for {} {}",
                self.changed.join(","),
                self.collection,
                self.id
            ),
        }
    }
}
