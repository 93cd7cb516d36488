//! Hearth Harness
//!
//! In-memory implementation of the backend collaborator traits, used by the
//! runtime tests, the workspace integration tests and the CLI demo. Supports
//! simulated latency, forced failures, scripted count results and call
//! counting.

pub mod fixture;
pub mod memory_backend;

pub use fixture::{Fixture, FixtureUser};
pub use memory_backend::{MemoryBackend, Operation};
