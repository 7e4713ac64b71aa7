//! Instruction word layout and field extraction.
//!
//! An instruction is one opaque 128-bit word. Every field sits at a fixed
//! byte-aligned offset; location and register fields use only the low
//! three bits of their byte.
//!
//! | Field   | Offset | Width |
//! |---------|--------|-------|
//! | opcode  | 0      | 8     |
//! | locA    | 8      | 3     |
//! | regA    | 16     | 3     |
//! | locB    | 24     | 3     |
//! | regB    | 32     | 3     |
//! | locC    | 40     | 3     |
//! | regC    | 48     | 3     |
//! | imm0    | 56     | 8     |
//! | addr0   | 64     | 32    |
//! | imm1    | 96     | 32    |

/// Bit offset of the opcode field.
pub const OPCODE_SHIFT: u32 = 0;
/// Bit offset of the operand A location field.
pub const LOC_A_SHIFT: u32 = 8;
/// Bit offset of the operand A register field.
pub const REG_A_SHIFT: u32 = 16;
/// Bit offset of the operand B location field.
pub const LOC_B_SHIFT: u32 = 24;
/// Bit offset of the operand B register field.
pub const REG_B_SHIFT: u32 = 32;
/// Bit offset of the destination location field.
pub const LOC_C_SHIFT: u32 = 40;
/// Bit offset of the destination register field.
pub const REG_C_SHIFT: u32 = 48;
/// Bit offset of the small immediate.
pub const IMM0_SHIFT: u32 = 56;
/// Bit offset of the operand A address immediate.
pub const ADDR0_SHIFT: u32 = 64;
/// Bit offset of the large immediate / destination address immediate.
pub const IMM1_SHIFT: u32 = 96;

/// Mask of the 8-bit opcode field.
pub const OPCODE_MASK: u128 = 0xFF;
/// Mask of a 3-bit location field.
pub const LOC_MASK: u128 = 0x7;
/// Mask of a 3-bit register field.
pub const REG_MASK: u128 = 0x7;
/// Mask of the 8-bit small immediate.
pub const IMM0_MASK: u128 = 0xFF;
/// Mask of a 32-bit address immediate.
pub const ADDR_MASK: u128 = 0xFFFF_FFFF;

/// Every bit of the word consumed by at least one field.
///
/// Bits 11-15, 19-23, 27-31, 35-39, 43-47 and 51-55 are never read.
pub const FIELD_MASK: u128 = (OPCODE_MASK << OPCODE_SHIFT)
    | (LOC_MASK << LOC_A_SHIFT)
    | (REG_MASK << REG_A_SHIFT)
    | (LOC_MASK << LOC_B_SHIFT)
    | (REG_MASK << REG_B_SHIFT)
    | (LOC_MASK << LOC_C_SHIFT)
    | (REG_MASK << REG_C_SHIFT)
    | (IMM0_MASK << IMM0_SHIFT)
    | (ADDR_MASK << ADDR0_SHIFT)
    | (ADDR_MASK << IMM1_SHIFT);

/// Trait for extracting instruction fields from a packed word.
///
/// Each accessor is a single shift-and-mask and is total over the
/// whole 128-bit domain.
pub trait InstructionBits {
    /// Extracts the opcode (bits 0-7).
    fn opcode(&self) -> u8;

    /// Extracts the operand A location class (bits 8-10).
    fn loc_a(&self) -> u8;

    /// Extracts the operand A register index (bits 16-18).
    fn reg_a(&self) -> u8;

    /// Extracts the operand B location class (bits 24-26).
    fn loc_b(&self) -> u8;

    /// Extracts the operand B register index (bits 32-34).
    fn reg_b(&self) -> u8;

    /// Extracts the destination location class (bits 40-42).
    fn loc_c(&self) -> u8;

    /// Extracts the destination register index (bits 48-50).
    fn reg_c(&self) -> u8;

    /// Extracts the small immediate (bits 56-63).
    ///
    /// Used as the CALL offset selector and as the SHIFT immediate.
    fn imm0(&self) -> u8;

    /// Extracts the operand A address immediate (bits 64-95).
    fn addr0(&self) -> u32;

    /// Extracts the large immediate (bits 96-127).
    ///
    /// Doubles as the destination address immediate (`addr1`).
    fn imm1(&self) -> u32;
}

impl InstructionBits for u128 {
    #[inline(always)]
    fn opcode(&self) -> u8 {
        ((self >> OPCODE_SHIFT) & OPCODE_MASK) as u8
    }

    #[inline(always)]
    fn loc_a(&self) -> u8 {
        ((self >> LOC_A_SHIFT) & LOC_MASK) as u8
    }

    #[inline(always)]
    fn reg_a(&self) -> u8 {
        ((self >> REG_A_SHIFT) & REG_MASK) as u8
    }

    #[inline(always)]
    fn loc_b(&self) -> u8 {
        ((self >> LOC_B_SHIFT) & LOC_MASK) as u8
    }

    #[inline(always)]
    fn reg_b(&self) -> u8 {
        ((self >> REG_B_SHIFT) & REG_MASK) as u8
    }

    #[inline(always)]
    fn loc_c(&self) -> u8 {
        ((self >> LOC_C_SHIFT) & LOC_MASK) as u8
    }

    #[inline(always)]
    fn reg_c(&self) -> u8 {
        ((self >> REG_C_SHIFT) & REG_MASK) as u8
    }

    #[inline(always)]
    fn imm0(&self) -> u8 {
        ((self >> IMM0_SHIFT) & IMM0_MASK) as u8
    }

    #[inline(always)]
    fn addr0(&self) -> u32 {
        ((self >> ADDR0_SHIFT) & ADDR_MASK) as u32
    }

    #[inline(always)]
    fn imm1(&self) -> u32 {
        ((self >> IMM1_SHIFT) & ADDR_MASK) as u32
    }
}

/// Decoded instruction containing every extracted field.
///
/// Produced fresh for each program slot and discarded once the slot is
/// emitted. Field values are always within their width; `decode` never
/// produces anything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decoded {
    /// Raw 128-bit instruction word.
    pub raw: u128,
    /// Operation selector (0-255).
    pub opcode: u8,
    /// Operand A location class (0-7).
    pub loc_a: u8,
    /// Operand A register index (0-7).
    pub reg_a: u8,
    /// Operand B location class (0-7).
    pub loc_b: u8,
    /// Operand B register index (0-7).
    pub reg_b: u8,
    /// Destination location class (0-7).
    pub loc_c: u8,
    /// Destination register index (0-7).
    pub reg_c: u8,
    /// Small immediate.
    pub imm0: u8,
    /// Address immediate XORed into operand A's register.
    pub addr0: u32,
    /// Large immediate; also the destination address immediate.
    pub imm1: u32,
}

impl Decoded {
    /// Returns the destination address immediate.
    ///
    /// Alias of [`Decoded::imm1`]: the same bits serve both roles.
    #[inline]
    pub const fn addr1(&self) -> u32 {
        self.imm1
    }
}
