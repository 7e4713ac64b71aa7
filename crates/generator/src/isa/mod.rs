//! Instruction Set Definitions.
//!
//! Contains the packed word layout, the decoder, the operand type system,
//! location classes and the opcode table.
//!
//! # Pipeline
//!
//! * `instruction`: Bit offsets, masks and the `Decoded` record.
//! * `decode`: Word to record (and back).
//! * `opcodes`: Opcode to operation family, with per-family operand types.
//! * `operand`: Per-type declaration, immediate, register and union rules.
//! * `location`: Location classes of operands A, B and the destination.
//! * `disasm`: One-line rendering for comments, logs and listings.

/// Instruction decoding (and re-encoding) of packed words.
pub mod decode;

/// Instruction disassembler for block comments, tracing and listings.
pub mod disasm;

/// Instruction word layout and field extraction.
pub mod instruction;

/// Location classes of operands and destination.
pub mod location;

/// Opcode to operation family table.
pub mod opcodes;

/// Operand type system.
pub mod operand;

pub use decode::{decode, encode};
pub use instruction::{Decoded, InstructionBits};
pub use opcodes::Family;
pub use operand::OperandType;
