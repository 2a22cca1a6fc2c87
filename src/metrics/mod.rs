//! Metric identifiers, the recording backend, and the fact translator.
//!
//! # INVARIANT
//! A fact turns into at most one recording. The translator never fails: a
//! fact it does not understand, or one with a malformed payload, is dropped.

pub mod types;
pub mod recorder;
pub mod translator;

pub use types::*;
pub use recorder::*;
pub use translator::*;
