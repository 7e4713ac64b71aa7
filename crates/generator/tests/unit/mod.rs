//! Unit tests, grouped by component.

pub mod isa;
