//! Global Virtual Machine Constants.
//!
//! This module defines constants shared by the emitted program and the
//! reference model. It includes:
//! 1. **Program Constants:** Default slot count and instruction budget.
//! 2. **Memory Constants:** Scratchpad size, window masks and DRAM size.
//! 3. **DRAM Simulation Constants:** The LCG step and cursor thresholds.
//! 4. **Register Constants:** Register file sizes and key/seed lengths.

/// Default number of instruction slots in a generated program.
pub const PROGRAM_SIZE: usize = 512;

/// Default instruction budget of the emitted program (1 Mi instructions).
pub const INSTRUCTION_COUNT: u64 = 1024 * 1024;

/// Number of integer registers (`r0`-`r7`).
pub const INT_REGISTER_COUNT: usize = 8;

/// Number of floating-point registers (`f0`-`f7`).
pub const FLOAT_REGISTER_COUNT: usize = 8;

/// Size of one convertible cell in bytes.
pub const CELL_SIZE: usize = 8;

/// Scratchpad size in bytes (256 KiB).
pub const SCRATCHPAD_SIZE: usize = 256 * 1024;

/// Number of convertible cells in the scratchpad.
pub const SCRATCHPAD_LENGTH: usize = SCRATCHPAD_SIZE / CELL_SIZE;

/// Cell mask of the 16 KiB scratchpad window.
pub const SCRATCHPAD_MASK14: u32 = (16 * 1024 / CELL_SIZE - 1) as u32;

/// Cell mask of the full 256 KiB scratchpad window.
pub const SCRATCHPAD_MASK18: u32 = (SCRATCHPAD_LENGTH - 1) as u32;

/// Size of the backing DRAM buffer when real memory content is used (4 GiB).
pub const DRAM_SIZE: u64 = 1 << 32;

/// Default capacity of the call stack, in entries.
///
/// Every taken CALL pushes two entries (value and return address).
pub const STACK_LENGTH: usize = 32 * 1024;

/// Multiplier of the DRAM simulation LCG step.
pub const DRAM_LCG_MULTIPLIER: u64 = 6364136223846793005;

/// Increment of the DRAM simulation LCG step.
pub const DRAM_LCG_INCREMENT: u64 = 1442695040888963407;

/// Bytes the DRAM cursor advances per read.
pub const DRAM_READ_STRIDE: u32 = 8;

/// Cursor offset within a 256-byte block at which the next block is latched.
pub const DRAM_LATCH_OFFSET: u32 = 128;

/// Mask applied to the mixed address when latching the next DRAM block.
pub const DRAM_BLOCK_MASK: u32 = 0xFFFF_FF00;

/// Length of the AES key constant in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of the AES seed constant in bytes.
pub const SEED_LENGTH: usize = 128;

/// Bit position of the rounding control field in MXCSR.
pub const MXCSR_ROUND_SHIFT: u32 = 13;
