//! Reference model of the emitted program.
//!
//! A pure Rust rendition of what the generated C code computes, used to
//! cross-check the emitter and to inspect programs without a C toolchain.
//!
//! * `convertible`: Scratchpad cell with union-style member access.
//! * `alu`: Integer families.
//! * `fpu`: Floating-point families under rounding control and flush-to-zero.
//! * `dram`: Simulated DRAM cursor and read values.
//! * `machine`: Slot interpreter with registers, stack and budget.

/// Integer family semantics.
pub mod alu;

/// Scratchpad cell.
pub mod convertible;

/// Simulated DRAM cursor.
pub mod dram;

/// Floating-point semantics.
pub mod fpu;

/// Slot interpreter.
pub mod machine;

pub use convertible::Convertible;
pub use fpu::RoundingMode;
pub use machine::{Machine, Outcome};
