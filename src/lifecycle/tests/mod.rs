//! Unit tests for the loop lifecycle module.

mod support;
