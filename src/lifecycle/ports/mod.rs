//! Port contracts for loop lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by loop services.

pub mod hook;
pub mod repository;

pub use hook::{HookError, TransitionHook};
pub use repository::{LoopRepository, LoopRepositoryError, LoopRepositoryResult};
