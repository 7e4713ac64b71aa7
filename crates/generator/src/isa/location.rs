//! Operand location classes.
//!
//! Each operand slot carries a 3-bit location class. The classes collapse
//! onto a handful of storage kinds:
//!
//! | Slot | Values | Storage                              |
//! |------|--------|--------------------------------------|
//! | A    | 0-3    | DRAM read primitive                  |
//! | A    | 4      | scratchpad, 256 KiB window           |
//! | A    | 5-7    | scratchpad, 16 KiB window            |
//! | B    | 0-5    | register `regB`                      |
//! | B    | 6-7    | immediate                            |
//! | C    | 0      | scratchpad, 256 KiB window           |
//! | C    | 1-3    | scratchpad, 16 KiB window            |
//! | C    | 4-7    | register `regC`                      |

use crate::common::constants::{SCRATCHPAD_MASK14, SCRATCHPAD_MASK18};
use crate::isa::instruction::Decoded;

/// Lowest operand B location class that selects the immediate.
pub const LOC_B_IMMEDIATE: u8 = 6;

/// Masked scratchpad window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Window {
    /// 16 KiB window (2048 cells).
    L1,
    /// Full 256 KiB scratchpad (32768 cells).
    L2,
}

impl Window {
    /// Cell index mask of the window.
    #[inline]
    pub const fn mask(self) -> u32 {
        match self {
            Self::L1 => SCRATCHPAD_MASK14,
            Self::L2 => SCRATCHPAD_MASK18,
        }
    }

    /// Name of the emitted accessor macro.
    pub const fn macro_name(self) -> &'static str {
        match self {
            Self::L1 => "SCRATCHPAD_16K",
            Self::L2 => "SCRATCHPAD_256K",
        }
    }

    /// Cell index selected by `addr` inside this window.
    #[inline]
    pub const fn index(self, addr: u32) -> usize {
        (addr & self.mask()) as usize
    }
}

/// Where operand A is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceA {
    /// Simulated external memory; every read advances the DRAM cursor.
    Dram,
    /// Scratchpad cell inside a window.
    Scratchpad(Window),
}

impl SourceA {
    /// Classifies a `locA` value.
    pub const fn from_loc(loc: u8) -> Self {
        match loc & 7 {
            0..=3 => Self::Dram,
            4 => Self::Scratchpad(Window::L2),
            _ => Self::Scratchpad(Window::L1),
        }
    }
}

/// Where operand B comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceB {
    /// Register `regB`, read according to the operand type.
    Register(u8),
    /// The embedded immediate, coerced according to the operand type.
    Immediate,
}

impl SourceB {
    /// Classifies operand B of an instruction.
    pub const fn of(inst: &Decoded) -> Self {
        if inst.loc_b < LOC_B_IMMEDIATE {
            Self::Register(inst.reg_b)
        } else {
            Self::Immediate
        }
    }
}

/// Where the result is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Register `regC` (float register file for FLOAT results).
    Register(u8),
    /// Scratchpad cell at `(r[reg] ^ addr1) & window`.
    Scratchpad {
        /// Window the address is masked into.
        window: Window,
        /// Register supplying the base address.
        reg: u8,
        /// Address immediate XORed into the base.
        addr1: u32,
    },
}

impl Destination {
    /// Classifies the destination of an instruction.
    pub const fn of(inst: &Decoded) -> Self {
        match inst.loc_c & 7 {
            0 => Self::Scratchpad {
                window: Window::L2,
                reg: inst.reg_c,
                addr1: inst.addr1(),
            },
            1..=3 => Self::Scratchpad {
                window: Window::L1,
                reg: inst.reg_c,
                addr1: inst.addr1(),
            },
            _ => Self::Register(inst.reg_c),
        }
    }

    /// Returns true when the result lands in the scratchpad.
    #[inline]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Scratchpad { .. })
    }
}
