//! System wiring, startup, and shutdown logic.

pub mod pos_system;
pub mod tracing;

pub use pos_system::*;
pub use tracing::*;
