//! Service lifecycle: which metrics backends run, gated by user consent.

pub mod types;
pub mod consent;
pub mod release;
pub mod debug;
pub mod factory;

pub use types::*;
pub use consent::*;
pub use release::*;
pub use debug::*;
pub use factory::*;
