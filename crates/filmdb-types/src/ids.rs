//! Identifier value types.
//!
//! Raw identifiers arrive as text (form input, blob records). Parsing them
//! into [`PersonId`] or [`Isbn`] performs the format check once; everything
//! downstream works with the typed value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::violation::ConstraintViolation;

/// Positive integer identifier of a person.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PersonId(u32);

impl PersonId {
    /// Wrap an already-numeric identifier. Zero is rejected.
    pub fn new(raw: u32) -> Result<Self, ConstraintViolation> {
        if raw == 0 {
            return Err(Self::range_violation());
        }
        Ok(Self(raw))
    }

    /// Coerce raw text to a person ID.
    ///
    /// Surrounding whitespace is ignored. The remainder must be an integer
    /// of at least 1 that fits the identifier range.
    pub fn parse(raw: &str) -> Result<Self, ConstraintViolation> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConstraintViolation::MandatoryValueMissing(
                "A positive integer value for the person ID is required!".into(),
            ));
        }
        let value: i64 = trimmed.parse().map_err(|_| Self::range_violation())?;
        let value = u32::try_from(value).map_err(|_| Self::range_violation())?;
        Self::new(value)
    }

    /// The numeric value.
    pub fn get(self) -> u32 {
        self.0
    }

    fn range_violation() -> ConstraintViolation {
        ConstraintViolation::Range("The person ID must be a positive integer!".into())
    }
}

impl fmt::Debug for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonId({})", self.0)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = ConstraintViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for PersonId {
    type Error = ConstraintViolation;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonId> for u32 {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

/// Ten-character movie identifier: nine ASCII digits followed by a digit or
/// the letter `X`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Parse raw text as an ISBN. The value is taken verbatim (no trimming).
    pub fn parse(raw: &str) -> Result<Self, ConstraintViolation> {
        if raw.is_empty() {
            return Err(ConstraintViolation::MandatoryValueMissing(
                "A value for the ISBN must be provided!".into(),
            ));
        }
        if raw.trim().is_empty() {
            return Err(ConstraintViolation::Range(
                "The ISBN must be a non-empty string!".into(),
            ));
        }
        if !Self::matches_pattern(raw) {
            return Err(ConstraintViolation::Pattern(
                "The ISBN must be a 10-digit string or a 9-digit string followed by 'X'!".into(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// `true` iff `raw` is exactly 9 digits followed by a digit or `X`.
    pub fn matches_pattern(raw: &str) -> bool {
        let bytes = raw.as_bytes();
        bytes.len() == 10
            && bytes[..9].iter().all(u8::is_ascii_digit)
            && (bytes[9].is_ascii_digit() || bytes[9] == b'X')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Isbn({})", self.0)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = ConstraintViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Isbn {
    type Error = ConstraintViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}
