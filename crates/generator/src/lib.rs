//! Reference program generator for a randomized register/memory virtual machine.
//!
//! This crate turns a stream of pseudo-random 128-bit instruction words into a
//! standalone C program that executes them. It provides the following:
//! 1. **ISA:** Word layout, decoding, operand types, location classes and the opcode table.
//! 2. **Emission:** Preamble, per-family block bodies and whole-program assembly.
//! 3. **Generation:** Seeded drawing of constants and instruction words.
//! 4. **Model:** A Rust interpreter with the same semantics as the emitted program.
//! 5. **Reporting:** Configuration, statistics and program listings.

/// Common types and constants (program shape, memory windows, errors).
pub mod common;
/// Generator configuration (defaults, enums, validation).
pub mod config;
/// C program emission (resolver, block semantics, preamble, assembler).
pub mod emit;
/// Seeded program drawing and the generation entry point.
pub mod generator;
/// Instruction set (layout, decode, operand types, locations, opcodes, disassembly).
pub mod isa;
/// Reference model of the emitted program.
pub mod model;
/// Generation statistics collection and reporting.
pub mod stats;

/// Crate error type and result alias.
pub use crate::common::{GenError, Result};
/// Root configuration type; use `GeneratorConfig::default()` or parse from JSON.
pub use crate::config::GeneratorConfig;
/// Entry point: validates a configuration and emits programs.
pub use crate::generator::{Generator, Program};
/// Per-program statistics returned by every generation.
pub use crate::stats::GenStats;
