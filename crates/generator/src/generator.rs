//! Program generator.
//!
//! Draws the key/seed constants and one 128-bit word per slot from a
//! seeded ChaCha8 stream, then hands the decoded program to the
//! [`Assembler`]. The same seed and configuration always produce the same
//! output bytes.
//!
//! # Draw order
//!
//! 1. 32 key bytes.
//! 2. 128 seed bytes.
//! 3. Per slot, two 64-bit draws: low half first, then high half.

use std::io::Write;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::common::Result;
use crate::common::constants::{KEY_LENGTH, SEED_LENGTH};
use crate::config::GeneratorConfig;
use crate::emit::Assembler;
use crate::isa::decode::decode;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::Decoded;
use crate::stats::GenStats;

/// A drawn program: constants plus one decoded instruction per slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    /// Seed of the random stream the program was drawn from.
    pub rng_seed: u64,
    /// AES key constant (also seeds the DRAM cursor).
    pub key: [u8; KEY_LENGTH],
    /// AES seed constant (also seeds the register files).
    pub aes_seed: [u8; SEED_LENGTH],
    /// Decoded instruction of every slot, in slot order.
    pub instructions: Vec<Decoded>,
}

impl Program {
    /// Renders one `i_N: <disassembly>` line per slot.
    pub fn listing(&self) -> String {
        self.instructions
            .iter()
            .enumerate()
            .map(|(index, inst)| format!("i_{index}: {}\n", disassemble(inst)))
            .collect()
    }
}

/// Deterministic program generator.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    seed: u64,
}

impl Generator {
    /// Validates `config` and fixes the seed.
    ///
    /// Without a configured seed one is drawn from OS entropy and logged, so
    /// any run can be reproduced.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenError::InvalidConfig`] if validation fails.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::rngs::OsRng.next_u64();
                info!(seed, "no seed configured, drew one from OS entropy");
                seed
            }
        };
        Ok(Self { config, seed })
    }

    /// Seed of the random stream.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration in effect.
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draws the constants and instruction words.
    pub fn draw_program(&self) -> Program {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut key = [0u8; KEY_LENGTH];
        let mut aes_seed = [0u8; SEED_LENGTH];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut aes_seed);
        let instructions = (0..self.config.program_size)
            .map(|_| {
                let lo = rng.next_u64();
                let hi = rng.next_u64();
                decode((u128::from(hi) << 64) | u128::from(lo))
            })
            .collect();
        Program {
            rng_seed: self.seed,
            key,
            aes_seed,
            instructions,
        }
    }

    /// Draws a program and writes it as C source to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenError::Io`] if writing fails.
    pub fn generate<W: Write>(&self, out: W) -> Result<GenStats> {
        let program = self.draw_program();
        self.emit(&program, out)
    }

    /// Writes an already drawn program as C source to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenError::Io`] if writing fails.
    pub fn emit<W: Write>(&self, program: &Program, out: W) -> Result<GenStats> {
        let mut assembler = Assembler::new(out, &self.config);
        let stats = assembler.assemble(program)?;
        info!(
            seed = self.seed,
            slots = stats.slots,
            budget = self.config.instruction_count,
            "program generated"
        );
        Ok(stats)
    }
}
