//! Step definitions for loop state transition BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
