//! The constraint-violation taxonomy.
//!
//! Validators never panic and never throw: they return a [`Checked`] value.
//! `Ok(())` is the "no violation" outcome with an empty message; every other
//! outcome is one of the [`ConstraintViolation`] variants.

use std::fmt;

use thiserror::Error;

/// Outcome of a single constraint check.
pub type Checked = Result<(), ConstraintViolation>;

/// A violated property constraint, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    /// A required value was absent or empty.
    #[error("MandatoryValueConstraintViolation: {0}")]
    MandatoryValueMissing(String),

    /// The value has the wrong type or lies outside the admissible range.
    #[error("RangeConstraintViolation: {0}")]
    Range(String),

    /// The value does not match the required pattern.
    #[error("PatternConstraintViolation: {0}")]
    Pattern(String),

    /// A string value is too short or too long.
    #[error("StringLengthConstraintViolation: {0}")]
    StringLength(String),

    /// A numeric value lies outside the admissible interval.
    #[error("IntervalConstraintViolation: {0}")]
    Interval(String),

    /// An identifier is already taken in its collection.
    #[error("UniquenessConstraintViolation: {0}")]
    Uniqueness(String),

    /// A reference does not resolve to an existing instance.
    #[error("ReferentialIntegrityConstraintViolation: {0}")]
    ReferentialIntegrity(String),

    /// A value that is frozen after assignment was changed.
    #[error("FrozenValueConstraintViolation: {0}")]
    FrozenValue(String),
}

impl ConstraintViolation {
    /// The kind of this violation.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MandatoryValueMissing(_) => ViolationKind::MandatoryValueMissing,
            Self::Range(_) => ViolationKind::Range,
            Self::Pattern(_) => ViolationKind::Pattern,
            Self::StringLength(_) => ViolationKind::StringLength,
            Self::Interval(_) => ViolationKind::Interval,
            Self::Uniqueness(_) => ViolationKind::Uniqueness,
            Self::ReferentialIntegrity(_) => ViolationKind::ReferentialIntegrity,
            Self::FrozenValue(_) => ViolationKind::FrozenValue,
        }
    }

    /// The human-readable message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MandatoryValueMissing(m)
            | Self::Range(m)
            | Self::Pattern(m)
            | Self::StringLength(m)
            | Self::Interval(m)
            | Self::Uniqueness(m)
            | Self::ReferentialIntegrity(m)
            | Self::FrozenValue(m) => m,
        }
    }
}

/// The closed set of check outcomes, including the success sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    NoViolation,
    MandatoryValueMissing,
    Range,
    Pattern,
    StringLength,
    Interval,
    Uniqueness,
    ReferentialIntegrity,
    FrozenValue,
}

impl ViolationKind {
    /// Stable name of the kind, as used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoViolation => "NoConstraintViolation",
            Self::MandatoryValueMissing => "MandatoryValueConstraintViolation",
            Self::Range => "RangeConstraintViolation",
            Self::Pattern => "PatternConstraintViolation",
            Self::StringLength => "StringLengthConstraintViolation",
            Self::Interval => "IntervalConstraintViolation",
            Self::Uniqueness => "UniquenessConstraintViolation",
            Self::ReferentialIntegrity => "ReferentialIntegrityConstraintViolation",
            Self::FrozenValue => "FrozenValueConstraintViolation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform view over a [`Checked`] value, so a caller can read the kind and
/// message of a successful check the same way as a failed one.
pub trait CheckOutcome {
    /// `ViolationKind::NoViolation` for `Ok(())`.
    fn kind(&self) -> ViolationKind;

    /// Empty for `Ok(())`.
    fn message(&self) -> &str;
}

impl CheckOutcome for Checked {
    fn kind(&self) -> ViolationKind {
        match self {
            Ok(()) => ViolationKind::NoViolation,
            Err(v) => v.kind(),
        }
    }

    fn message(&self) -> &str {
        match self {
            Ok(()) => "",
            Err(v) => v.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind_name() {
        let v = ConstraintViolation::Uniqueness("There is already a movie record with ISBN 1".into());
        assert_eq!(
            v.to_string(),
            "UniquenessConstraintViolation: There is already a movie record with ISBN 1"
        );
    }

    #[test]
    fn kind_and_message_agree_with_variant() {
        let v = ConstraintViolation::Interval("year out of range".into());
        assert_eq!(v.kind(), ViolationKind::Interval);
        assert_eq!(v.message(), "year out of range");
        assert!(v.to_string().starts_with(v.kind().name()));
    }

    #[test]
    fn ok_is_no_violation_with_empty_message() {
        let ok: Checked = Ok(());
        assert_eq!(ok.kind(), ViolationKind::NoViolation);
        assert_eq!(ok.message(), "");
    }

    #[test]
    fn err_outcome_exposes_violation() {
        let err: Checked = Err(ConstraintViolation::FrozenValue("fixed".into()));
        assert_eq!(err.kind(), ViolationKind::FrozenValue);
        assert_eq!(err.message(), "fixed");
    }
}
