//! Minewatch daemon library - exposes modules for testing.

pub mod aggregator;
pub mod bot;
pub mod cache;
pub mod config;
pub mod page;
pub mod pool;
pub mod probes;
pub mod routes;
pub mod server;
pub mod xmrig;
