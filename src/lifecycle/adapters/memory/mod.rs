//! In-memory adapters for loop lifecycle persistence.

mod record;

pub use record::InMemoryLoopRepository;
