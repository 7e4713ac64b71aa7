//! Generator error definitions.
//!
//! Generation itself cannot fail on any input word: every 128-bit pattern
//! decodes and every opcode maps to a family. The failure paths that remain are:
//! 1. **Configuration:** Parameters that would produce an ill-formed program.
//! 2. **Output:** I/O errors raised by the sink the program is written to.
//! 3. **Table Lookup:** Raw operand type tags outside the six defined types.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors raised while configuring the generator or writing its output.
#[derive(Debug, Error)]
pub enum GenError {
    /// The configuration violates a structural requirement of the program.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    #[error("malformed configuration document: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A raw value does not name an operand type (valid range 0-5).
    #[error("operand type tag {0} is out of range")]
    OperandType(u8),

    /// A scratchpad image handed to the model has the wrong number of cells.
    #[error("scratchpad image holds {actual} cells, expected {expected}")]
    ScratchpadSize {
        /// Required number of cells.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// The output sink failed.
    #[error("failed to write generated program: {0}")]
    Io(#[from] std::io::Error),
}
