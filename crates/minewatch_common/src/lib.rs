//! Minewatch Common - Shared types for the mining telemetry daemon
//!
//! Everything the daemon publishes is built from these types: the readings
//! collected from each source and the reconciled status snapshot.

pub mod amount;
pub mod display;
pub mod snapshot;

pub use amount::*;
pub use snapshot::*;
