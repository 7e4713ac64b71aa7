//! Common utilities and types used throughout the generator.
//!
//! This module provides the building blocks shared by the decoder, the
//! emitter and the reference model. It includes:
//! 1. **Constants:** Program shape, memory windows, DRAM LCG parameters and register counts.
//! 2. **Error Handling:** The crate-wide error type and result alias.

/// Common constants used throughout the generator.
pub mod constants;

/// Error types for configuration, table lookup and output failures.
pub mod error;

pub use error::{GenError, Result};
