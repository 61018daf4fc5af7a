//! Loopforge: a typed state machine for the development closed loop.
//!
//! This crate tracks a work item from issue to pull request, through CI and
//! review, to merge and close. Every move is checked against a fixed
//! transition table and appended to the record's history before the record
//! is persisted through a swappable repository.
//!
//! # Architecture
//!
//! Loopforge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure lifecycle logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and hooks
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`lifecycle`]: Loop states, records, storage, and the transition service

pub mod lifecycle;
