//! Publishers, identified by name.

use std::fmt;

use filmdb_types::{Checked, ConstraintViolation};

use crate::collection::Publishers;

/// Format check for a publisher name. An empty name passes, since the name
/// also appears as an optional movie reference.
pub fn check_name(name: &str) -> Checked {
    if !name.is_empty() && name.trim().is_empty() {
        return Err(ConstraintViolation::Range(
            "The name must be a non-empty string!".into(),
        ));
    }
    Ok(())
}

pub fn check_name_as_id(name: &str, publishers: &Publishers) -> Checked {
    if name.is_empty() {
        return Err(ConstraintViolation::MandatoryValueMissing(
            "A publisher name is required!".into(),
        ));
    }
    check_name(name)?;
    if publishers.contains(name) {
        return Err(ConstraintViolation::Uniqueness(
            "There is already a publisher record with this name!".into(),
        ));
    }
    Ok(())
}

pub fn check_name_as_id_ref(name: &str, publishers: &Publishers) -> Checked {
    check_name(name)?;
    if !name.is_empty() && !publishers.contains(name) {
        return Err(ConstraintViolation::ReferentialIntegrity(
            "There is no publisher record with this name!".into(),
        ));
    }
    Ok(())
}

/// Raw field values for creating a publisher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPublisher {
    pub name: String,
    pub address: String,
}

impl NewPublisher {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Changes to an existing publisher. The name identifies it and is never
/// changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublisherUpdate {
    pub name: String,
    pub address: Option<String>,
}

impl PublisherUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// A publisher, identified by its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publisher {
    name: String,
    address: String,
}

impl Publisher {
    pub fn from_slots(slots: &NewPublisher, publishers: &Publishers) -> Result<Self, ConstraintViolation> {
        check_name_as_id(&slots.name, publishers)?;
        Ok(Self {
            name: slots.name.clone(),
            address: slots.address.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The address is free text and always accepted.
    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }
}

impl fmt::Display for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Publisher{{ name: {}, address: {} }}", self.name, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmdb_types::ViolationKind;

    fn publishers() -> Publishers {
        let mut publishers = Publishers::new("publishers");
        let bantam = Publisher::from_slots(&NewPublisher::new("Bantam Books", "New York, USA"), &publishers).unwrap();
        publishers.insert(bantam.name().to_string(), bantam);
        publishers
    }

    #[test]
    fn name_as_id_checks() {
        let p = publishers();
        assert_eq!(
            check_name_as_id("", &p).unwrap_err().kind(),
            ViolationKind::MandatoryValueMissing
        );
        assert_eq!(check_name_as_id("  ", &p).unwrap_err().kind(), ViolationKind::Range);
        assert_eq!(
            check_name_as_id("Bantam Books", &p).unwrap_err().message(),
            "There is already a publisher record with this name!"
        );
        assert!(check_name_as_id("Basic Books", &p).is_ok());
    }

    #[test]
    fn name_as_id_ref_checks() {
        let p = publishers();
        assert!(check_name_as_id_ref("", &p).is_ok());
        assert!(check_name_as_id_ref("Bantam Books", &p).is_ok());
        assert_eq!(
            check_name_as_id_ref("Basic Books", &p).unwrap_err().kind(),
            ViolationKind::ReferentialIntegrity
        );
    }

    #[test]
    fn address_is_free_text() {
        let mut p = Publisher::from_slots(&NewPublisher::new("Basic Books", ""), &publishers()).unwrap();
        p.set_address("New York, USA");
        assert_eq!(p.address(), "New York, USA");
        assert_eq!(
            p.to_string(),
            "Publisher{ name: Basic Books, address: New York, USA }"
        );
    }
}
