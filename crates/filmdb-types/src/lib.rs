//! Foundation types for filmdb.
//!
//! Every other filmdb crate depends on `filmdb-types`. It holds the closed
//! set of constraint violations returned by validators, and the identifier
//! value types whose format checks are shared by several entities.
//!
//! # Key Types
//!
//! - [`ConstraintViolation`] -- a failed check, tagged with its kind and message
//! - [`Checked`] -- the outcome of a single check; `Ok(())` is "no violation"
//! - [`PersonId`] -- positive integer identifier of a person
//! - [`Isbn`] -- ten-character movie identifier (9 digits + digit or `X`)

pub mod ids;
pub mod violation;

pub use ids::{Isbn, PersonId};
pub use violation::{CheckOutcome, Checked, ConstraintViolation, ViolationKind};
