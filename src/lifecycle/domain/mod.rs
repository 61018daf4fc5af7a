//! Domain model for the loop lifecycle.
//!
//! The loop domain holds the lifecycle states, the fixed transition table,
//! and the loop record aggregate with its append-only history. Nothing here
//! performs I/O; timestamps and identifiers come from injected sources.

mod error;
mod ids;
mod record;
mod state;
mod transition;

pub use error::{LoopDomainError, ParseLoopStateError};
pub use ids::{
    LOOP_ID_PREFIX, LoopId, LoopIdGenerator, RandomLoopIdGenerator, SequentialLoopIdGenerator,
};
pub use record::{LoopRecord, NewLoopRecord, PersistedLoopData};
pub use state::LoopState;
pub use transition::{CREATED_TRIGGER, LoopTransition, TransitionMetadata};
