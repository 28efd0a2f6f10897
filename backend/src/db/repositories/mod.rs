//! Repository implementations.
//!
//! - `local`: in-memory implementation for local development, seeded demos and tests
pub mod local;

pub use local::LocalRepository;
