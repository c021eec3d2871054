//! In-memory adapters for testing.
//!
//! Synchronous, deterministic implementations of the entity-store and
//! log-store ports. Testing only: lock poisoning panics rather than
//! propagating, and the readers serve preset data.

mod property_reader;
mod stores;
mod user_reader;

pub use property_reader::InMemoryPropertyReader;
pub use stores::{InMemoryIntegrationStore, InMemoryInteractionStore};
pub use user_reader::InMemoryUserReader;
