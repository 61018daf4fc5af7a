//! Adapter implementations of the loop lifecycle ports.
//!
//! Only the reference in-memory backend ships with the crate; production
//! backends implement [`crate::lifecycle::ports::LoopRepository`] elsewhere.

pub mod memory;
