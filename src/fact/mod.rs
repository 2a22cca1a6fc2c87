//! Facts: the loosely-typed interaction events features emit, and the bus
//! that carries them to whoever translates them.

pub mod types;
pub mod metadata;
pub mod bus;
pub mod pump;

pub use types::*;
pub use metadata::*;
pub use bus::*;
pub use pump::*;
