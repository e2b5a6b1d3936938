//! Local probes - process table, host resources, GPU classification.
//!
//! Probes fail softly: any enumeration error degrades to the zero-value
//! reading instead of surfacing an error to the aggregator.

pub mod gpu;
pub mod process;
pub mod system;
