//! Simulated DRAM cursor.
//!
//! Mirrors the emitted `readDram`: the value is an LCG step of the cursor
//! `m0`, which advances by 8 bytes per read. Every read address is XORed
//! into `mx`; halfway through a 256-byte block the next block `m1` is
//! latched from `mx`, and at the block boundary the cursor jumps there.

use crate::common::constants::{
    DRAM_BLOCK_MASK, DRAM_LATCH_OFFSET, DRAM_LCG_INCREMENT, DRAM_LCG_MULTIPLIER,
    DRAM_READ_STRIDE, KEY_LENGTH,
};

/// Value a simulated DRAM read at cursor `m0` returns.
#[inline]
pub const fn lcg_value(m0: u32) -> u64 {
    DRAM_LCG_MULTIPLIER
        .wrapping_mul(m0 as u64)
        .wrapping_add(DRAM_LCG_INCREMENT)
        .rotate_left(32)
}

/// DRAM cursor state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mmu {
    /// Current read cursor.
    pub m0: u32,
    /// Next block, latched mid-block.
    pub m1: u32,
    /// XOR of every read address.
    pub mx: u32,
}

impl Mmu {
    /// Initial state derived from the key: bytes 9-11 form bits 8-31 of `m0`.
    pub fn from_key(key: &[u8; KEY_LENGTH]) -> Self {
        Self {
            m0: (u32::from(key[9]) << 8) | (u32::from(key[10]) << 16) | (u32::from(key[11]) << 24),
            m1: 0,
            mx: 0,
        }
    }

    /// Performs one read for operand address `addr`.
    pub fn read(&mut self, addr: u32) -> u64 {
        let data = lcg_value(self.m0);
        self.m0 = self.m0.wrapping_add(DRAM_READ_STRIDE);
        self.mx ^= addr;
        if self.m0 & 255 == DRAM_LATCH_OFFSET {
            self.m1 = self.mx & DRAM_BLOCK_MASK;
        }
        if self.m0 & 255 == 0 {
            self.m0 = self.m1;
        }
        data
    }
}
