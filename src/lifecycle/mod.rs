//! Loop lifecycle management for loopforge.
//!
//! A loop tracks one work item from issue to closed pull request. The
//! module enforces the fixed transition table, keeps an append-only history
//! of every move, and persists records through a swappable repository. It
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
