//! C Program Emission.
//!
//! Turns decoded instruction words into a standalone GNU C program.
//!
//! # Layers
//!
//! * `resolver`: Operand A/B read expressions and destination lvalues.
//! * `semantics`: One labeled block per slot, per operation family.
//! * `prelude`: Fixed text shared by every program.
//! * `assembler`: Orders the sections and streams them to a writer.

/// Section ordering and output streaming.
pub mod assembler;

/// Fixed preamble text.
pub mod prelude;

/// Operand and destination expressions.
pub mod resolver;

/// Per-family block bodies.
pub mod semantics;

pub use assembler::Assembler;
