//! Configuration system for the program generator.
//!
//! This module defines the parameters that shape a generated program. It provides:
//! 1. **Defaults:** Program size, instruction budget and call stack capacity.
//! 2. **Structures:** `GeneratorConfig`, deserializable from JSON with every field optional.
//! 3. **Enums:** DRAM backing and call stack overflow policies.
//! 4. **Validation:** Structural checks run before any output is produced.
//!
//! The CLI loads a JSON document (if given) and then applies command line overrides.

use serde::Deserialize;

use crate::common::{GenError, Result};

/// Default configuration constants for the generator.
mod defaults {
    use crate::common::constants;

    /// Number of program slots.
    pub const PROGRAM_SIZE: usize = constants::PROGRAM_SIZE;

    /// Instruction budget of the emitted program.
    pub const INSTRUCTION_COUNT: u64 = constants::INSTRUCTION_COUNT;

    /// Call stack capacity in entries.
    pub const STACK_LENGTH: usize = constants::STACK_LENGTH;

    /// Smallest supported program size.
    ///
    /// CALL offsets are masked with `program_size / 4 - 1`, which needs at
    /// least four slots to be meaningful.
    pub const MIN_PROGRAM_SIZE: usize = 4;
}

/// Source of the values returned by DRAM reads in the emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DramMode {
    /// Deterministic LCG step over the 32-bit DRAM cursor.
    #[default]
    Simulated,
    /// A 4 GiB buffer filled from the key/seed constants (`#define RAM`).
    #[serde(alias = "RAM")]
    Buffer,
}

/// Behavior of the emitted program when a CALL would overflow the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StackOverflowPolicy {
    /// No bound check; pushes beyond capacity are the program's problem.
    #[default]
    Unchecked,
    /// CALL checks capacity and terminates the program with exit code 2.
    Fault,
}

/// Root configuration of one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of instruction slots; a power of two of at least 4.
    pub program_size: usize,

    /// Instruction budget; the emitted program halts when it runs out.
    pub instruction_count: u64,

    /// Seed of the instruction and constant generator. `None` draws one from
    /// OS entropy; the chosen seed is logged so the run can be repeated.
    pub seed: Option<u64>,

    /// DRAM backing of the emitted program.
    pub dram: DramMode,

    /// Call stack capacity in entries (each taken CALL uses two).
    pub stack_length: usize,

    /// Overflow handling of the emitted call stack.
    pub stack_overflow: StackOverflowPolicy,

    /// Emit the wall-clock runtime line in the termination block.
    pub report_runtime: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program_size: defaults::PROGRAM_SIZE,
            instruction_count: defaults::INSTRUCTION_COUNT,
            seed: None,
            dram: DramMode::default(),
            stack_length: defaults::STACK_LENGTH,
            stack_overflow: StackOverflowPolicy::default(),
            report_runtime: true,
        }
    }
}

impl GeneratorConfig {
    /// Parses a JSON configuration document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::ConfigParse`] for malformed JSON or unknown fields,
    /// and [`GenError::InvalidConfig`] if the parsed values fail validation.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the structural requirements of the generated program.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if !self.program_size.is_power_of_two() || self.program_size < defaults::MIN_PROGRAM_SIZE {
            return Err(GenError::InvalidConfig(format!(
                "program_size must be a power of two >= {}, got {}",
                defaults::MIN_PROGRAM_SIZE,
                self.program_size
            )));
        }
        if self.instruction_count == 0 {
            return Err(GenError::InvalidConfig(
                "instruction_count must be non-zero".to_string(),
            ));
        }
        if self.stack_length < 2 || self.stack_length % 2 != 0 {
            return Err(GenError::InvalidConfig(format!(
                "stack_length must be an even number >= 2, got {}",
                self.stack_length
            )));
        }
        Ok(())
    }

    /// Mask applied to `imm0` to form a CALL offset (`program_size / 4 - 1`).
    #[inline]
    pub const fn call_offset_mask(&self) -> usize {
        (self.program_size >> 2) - 1
    }

    /// Slot a CALL at `index` jumps to.
    ///
    /// `(index + 1 + (imm0 & (program_size / 4 - 1))) mod program_size`.
    #[inline]
    pub const fn call_target(&self, index: usize, imm0: u8) -> usize {
        (index + 1 + (imm0 as usize & self.call_offset_mask())) & (self.program_size - 1)
    }

    /// Slot following `index`, wrapping at the end of the program.
    #[inline]
    pub const fn next_slot(&self, index: usize) -> usize {
        (index + 1) & (self.program_size - 1)
    }

    /// Returns true when the emitted DRAM reads come from a real buffer.
    #[inline]
    pub const fn uses_dram_buffer(&self) -> bool {
        matches!(self.dram, DramMode::Buffer)
    }
}
