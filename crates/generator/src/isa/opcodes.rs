//! Opcode Semantics Table.
//!
//! Maps every 8-bit opcode to one operation family. The table is built at
//! compile time from contiguous opcode ranges whose lengths set the relative
//! frequency of each family; a const assertion rejects any gap or overlap,
//! so an unmapped opcode cannot survive the build.

use std::fmt;

use crate::isa::operand::OperandType;

/// Operation family selected by an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// 64-bit wrapping addition.
    Add64,
    /// 32-bit wrapping addition.
    Add32,
    /// 64-bit wrapping subtraction.
    Sub64,
    /// 32-bit wrapping subtraction.
    Sub32,
    /// 64-bit multiply, low half.
    Mul64,
    /// Unsigned 64x64 multiply, high half.
    Mulh64,
    /// Unsigned 32x32 multiply widened to 64 bits.
    Mul32,
    /// Signed 32x32 multiply widened to 64 bits.
    Imul32,
    /// Signed 64x64 multiply, high half.
    Imulh64,
    /// Unsigned 64/32 division; a zero divisor is coerced to 1.
    Div64,
    /// Signed 64/32 division; a zero divisor is coerced to 1.
    Idiv64,
    /// 64-bit bitwise AND.
    And64,
    /// 32-bit bitwise AND.
    And32,
    /// 64-bit bitwise OR.
    Or64,
    /// 32-bit bitwise OR.
    Or32,
    /// 64-bit bitwise XOR.
    Xor64,
    /// 32-bit bitwise XOR.
    Xor32,
    /// Logical shift left.
    Shl64,
    /// Logical shift right.
    Shr64,
    /// Arithmetic shift right.
    Sar64,
    /// Rotate left.
    Rol64,
    /// Rotate right.
    Ror64,
    /// Double addition.
    Fadd,
    /// Double subtraction.
    Fsub,
    /// Double multiplication.
    Fmul,
    /// Double division.
    Fdiv,
    /// Square root of the absolute value of A.
    Fsqrt,
    /// Sets the rounding mode from A and stores A unchanged.
    Fround,
    /// Conditional subroutine call.
    Call,
    /// Conditional subroutine return.
    Ret,
}

/// Coarse grouping of families, used for statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FamilyClass {
    /// Add, subtract and bitwise logic.
    IntegerAlu,
    /// Multiplications of every width.
    Multiply,
    /// Divisions.
    Divide,
    /// Shifts and rotates.
    Shift,
    /// Floating-point arithmetic and rounding control.
    Float,
    /// CALL and RET.
    Control,
}

/// Operand types consumed and produced by a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Type operand A is read as.
    pub a: OperandType,
    /// Type operand B is read as; `None` when B is not a data operand.
    pub b: Option<OperandType>,
    /// Type the result is written as.
    pub c: OperandType,
}

impl Signature {
    const fn new(a: OperandType, b: Option<OperandType>, c: OperandType) -> Self {
        Self { a, b, c }
    }

    const fn uniform(ty: OperandType) -> Self {
        Self::new(ty, Some(ty), ty)
    }
}

/// Contiguous block of opcodes assigned to one family.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeRange {
    /// Family the block maps to.
    pub family: Family,
    /// First opcode of the block.
    pub first: u8,
    /// Last opcode of the block (inclusive).
    pub last: u8,
}

const fn range(family: Family, first: u8, last: u8) -> OpcodeRange {
    OpcodeRange {
        family,
        first,
        last,
    }
}

/// Opcode blocks in ascending order. Must tile 0-255 exactly.
pub const OPCODE_RANGES: [OpcodeRange; 30] = [
    range(Family::Add64, 0, 13),
    range(Family::Add32, 14, 20),
    range(Family::Sub64, 21, 34),
    range(Family::Sub32, 35, 41),
    range(Family::Mul64, 42, 45),
    range(Family::Mulh64, 46, 49),
    range(Family::Mul32, 50, 53),
    range(Family::Imul32, 54, 57),
    range(Family::Imulh64, 58, 61),
    range(Family::Div64, 62, 62),
    range(Family::Idiv64, 63, 63),
    range(Family::And64, 64, 76),
    range(Family::And32, 77, 82),
    range(Family::Or64, 83, 95),
    range(Family::Or32, 96, 101),
    range(Family::Xor64, 102, 115),
    range(Family::Xor32, 116, 121),
    range(Family::Shl64, 122, 128),
    range(Family::Shr64, 129, 132),
    range(Family::Sar64, 133, 135),
    range(Family::Rol64, 136, 146),
    range(Family::Ror64, 147, 157),
    range(Family::Fadd, 158, 175),
    range(Family::Fsub, 176, 193),
    range(Family::Fmul, 194, 211),
    range(Family::Fdiv, 212, 214),
    range(Family::Fsqrt, 215, 221),
    range(Family::Fround, 222, 223),
    range(Family::Call, 224, 240),
    range(Family::Ret, 241, 255),
];

const fn build_table(ranges: &[OpcodeRange]) -> [Family; 256] {
    let mut table = [Family::Add64; 256];
    let mut next = 0usize;
    let mut i = 0;
    while i < ranges.len() {
        let r = ranges[i];
        assert!(r.first as usize == next, "opcode ranges leave a gap or overlap");
        assert!(r.last >= r.first, "opcode range is reversed");
        let mut op = r.first as usize;
        while op <= r.last as usize {
            table[op] = r.family;
            op += 1;
        }
        next = r.last as usize + 1;
        i += 1;
    }
    assert!(next == 256, "opcode ranges do not reach 255");
    table
}

/// Opcode to family lookup table, total over 0-255.
pub const OPCODE_TABLE: [Family; 256] = build_table(&OPCODE_RANGES);

impl Family {
    /// Every family, in table order.
    pub const ALL: [Self; 30] = {
        let mut all = [Self::Add64; 30];
        let mut i = 0;
        while i < OPCODE_RANGES.len() {
            all[i] = OPCODE_RANGES[i].family;
            i += 1;
        }
        all
    };

    /// Family of an opcode. Total: every 8-bit value is mapped.
    #[inline]
    pub const fn from_opcode(opcode: u8) -> Self {
        OPCODE_TABLE[opcode as usize]
    }

    /// Mnemonic used in block comments and listings.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add64 => "ADD_64",
            Self::Add32 => "ADD_32",
            Self::Sub64 => "SUB_64",
            Self::Sub32 => "SUB_32",
            Self::Mul64 => "MUL_64",
            Self::Mulh64 => "MULH_64",
            Self::Mul32 => "MUL_32",
            Self::Imul32 => "IMUL_32",
            Self::Imulh64 => "IMULH_64",
            Self::Div64 => "DIV_64",
            Self::Idiv64 => "IDIV_64",
            Self::And64 => "AND_64",
            Self::And32 => "AND_32",
            Self::Or64 => "OR_64",
            Self::Or32 => "OR_32",
            Self::Xor64 => "XOR_64",
            Self::Xor32 => "XOR_32",
            Self::Shl64 => "SHL_64",
            Self::Shr64 => "SHR_64",
            Self::Sar64 => "SAR_64",
            Self::Rol64 => "ROL_64",
            Self::Ror64 => "ROR_64",
            Self::Fadd => "FADD",
            Self::Fsub => "FSUB",
            Self::Fmul => "FMUL",
            Self::Fdiv => "FDIV",
            Self::Fsqrt => "FSQRT",
            Self::Fround => "FROUND",
            Self::Call => "CALL",
            Self::Ret => "RET",
        }
    }

    /// Statistics class of the family.
    pub const fn class(self) -> FamilyClass {
        match self {
            Self::Add64
            | Self::Add32
            | Self::Sub64
            | Self::Sub32
            | Self::And64
            | Self::And32
            | Self::Or64
            | Self::Or32
            | Self::Xor64
            | Self::Xor32 => FamilyClass::IntegerAlu,
            Self::Mul64 | Self::Mulh64 | Self::Mul32 | Self::Imul32 | Self::Imulh64 => {
                FamilyClass::Multiply
            }
            Self::Div64 | Self::Idiv64 => FamilyClass::Divide,
            Self::Shl64 | Self::Shr64 | Self::Sar64 | Self::Rol64 | Self::Ror64 => {
                FamilyClass::Shift
            }
            Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv | Self::Fsqrt | Self::Fround => {
                FamilyClass::Float
            }
            Self::Call | Self::Ret => FamilyClass::Control,
        }
    }

    /// Operand types of A, B and the result.
    pub const fn signature(self) -> Signature {
        use OperandType::{Float, Int32, Int64, Shift, Uint32, Uint64};
        match self {
            Self::Add64
            | Self::Sub64
            | Self::Mul64
            | Self::Mulh64
            | Self::And64
            | Self::Or64
            | Self::Xor64 => Signature::uniform(Uint64),
            Self::Add32 | Self::Sub32 | Self::And32 | Self::Or32 | Self::Xor32 => {
                Signature::uniform(Uint32)
            }
            Self::Mul32 => Signature::new(Uint32, Some(Uint32), Uint64),
            Self::Imul32 => Signature::new(Int32, Some(Int32), Int64),
            Self::Imulh64 => Signature::uniform(Int64),
            Self::Div64 => Signature::new(Uint64, Some(Uint32), Uint64),
            Self::Idiv64 => Signature::new(Int64, Some(Int32), Int64),
            Self::Shl64 | Self::Shr64 | Self::Rol64 | Self::Ror64 => {
                Signature::new(Uint64, Some(Shift), Uint64)
            }
            Self::Sar64 => Signature::new(Int64, Some(Shift), Int64),
            Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv => Signature::uniform(Float),
            Self::Fsqrt => Signature::new(Float, None, Float),
            Self::Fround => Signature::new(Int64, None, Float),
            Self::Call | Self::Ret => Signature::new(Uint64, None, Uint64),
        }
    }

    /// Opcode range assigned to the family.
    pub fn opcodes(self) -> std::ops::RangeInclusive<u8> {
        OPCODE_RANGES
            .iter()
            .find(|r| r.family == self)
            .map_or(1..=0, |r| r.first..=r.last)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
