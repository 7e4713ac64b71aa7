//! Operand Type System.
//!
//! Six operand types govern how a value is declared, how the raw immediate
//! fields are coerced, how registers are named and read, and which member of
//! the convertible union is selected when a value passes through scratchpad
//! or DRAM storage. It provides:
//! 1. **Declaration:** The C storage type of a freshly computed value.
//! 2. **Immediates:** Literal text and typed value of `imm0`/`imm1` per type.
//! 3. **Registers:** Read-side expressions and destination lvalues.
//! 4. **Convertible Union:** Member selection on memory read and write.

use std::fmt;

use crate::common::GenError;
use crate::isa::instruction::Decoded;

/// Mask applied to every SHIFT operand (rotate/shift amount 0-63).
pub const SHIFT_MASK: u64 = 63;

/// Operand type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperandType {
    /// Signed 32-bit integer.
    Int32 = 0,
    /// Unsigned 32-bit integer.
    Uint32 = 1,
    /// Signed 64-bit integer.
    Int64 = 2,
    /// Unsigned 64-bit integer.
    Uint64 = 3,
    /// 64-bit IEEE-754 double.
    Float = 4,
    /// Shift/rotate amount, masked to 6 bits on use.
    Shift = 5,
}

/// A value typed the way the emitted program would hold it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// `int32_t`
    I32(i32),
    /// `uint32_t`
    U32(u32),
    /// `int64_t`
    I64(i64),
    /// `uint64_t`
    U64(u64),
    /// `double`
    F64(f64),
    /// `int32_t` holding a shift amount in 0-63.
    Shift(i32),
}

impl Scalar {
    /// Converts to `uint64_t` the way a C assignment would.
    ///
    /// Signed values sign-extend; doubles truncate toward zero (saturating,
    /// where C leaves out-of-range conversions undefined).
    pub fn to_u64(self) -> u64 {
        match self {
            Self::I32(v) | Self::Shift(v) => v as i64 as u64,
            Self::U32(v) => u64::from(v),
            Self::I64(v) => v as u64,
            Self::U64(v) => v,
            Self::F64(v) => v as i64 as u64,
        }
    }
}

/// Sign-extends the low 32 bits of a value to 64 bits.
#[inline]
pub const fn sign_extend32(value: u32) -> i64 {
    value as i32 as i64
}

/// Bit pattern of a FLOAT immediate: the sign-extended `imm1` shifted into
/// the high 32 bits.
#[inline]
pub const fn float_immediate_bits(imm1: u32) -> u64 {
    (sign_extend32(imm1) as u64) << 32
}

impl OperandType {
    /// All operand types in tag order.
    pub const ALL: [Self; 6] = [
        Self::Int32,
        Self::Uint32,
        Self::Int64,
        Self::Uint64,
        Self::Float,
        Self::Shift,
    ];

    /// Returns true for the FLOAT type, which lives in the float register file.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float)
    }

    /// C storage type for a value of this type.
    pub const fn declare(self) -> &'static str {
        match self {
            Self::Int32 | Self::Shift => "int32_t",
            Self::Uint32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::Uint64 => "uint64_t",
            Self::Float => "double",
        }
    }

    /// Typed value of the immediate operand.
    ///
    /// INT32/INT64 sign-extend `imm1`, UINT32/UINT64 zero-extend it, FLOAT
    /// reinterprets [`float_immediate_bits`] and SHIFT takes `imm0 & 63`.
    pub fn immediate_value(self, inst: &Decoded) -> Scalar {
        match self {
            Self::Int32 => Scalar::I32(inst.imm1 as i32),
            Self::Uint32 => Scalar::U32(inst.imm1),
            Self::Int64 => Scalar::I64(sign_extend32(inst.imm1)),
            Self::Uint64 => Scalar::U64(u64::from(inst.imm1)),
            Self::Float => Scalar::F64(f64::from_bits(float_immediate_bits(inst.imm1))),
            Self::Shift => Scalar::Shift(i32::from(inst.imm0) & SHIFT_MASK as i32),
        }
    }

    /// C literal text of the immediate operand.
    ///
    /// FLOAT literals go through a union compound literal so that every bit
    /// pattern, NaN and infinity included, is reproduced exactly.
    pub fn from_immediate(self, inst: &Decoded) -> String {
        match self.immediate_value(inst) {
            Scalar::I32(v) | Scalar::Shift(v) => v.to_string(),
            Scalar::I64(v) => format!("{v}LL"),
            Scalar::U32(v) => format!("{v}U"),
            Scalar::U64(v) => format!("{v}ULL"),
            Scalar::F64(v) => format!("((convertible_t){{ .u64 = {:#018x}ULL }}).f64", v.to_bits()),
        }
    }

    /// Destination lvalue naming register `n` for this type.
    pub fn register_name(self, n: u8) -> String {
        if self.is_float() {
            format!("f{n}.f64")
        } else {
            format!("r{n}")
        }
    }

    /// Read-side expression of register `n` for this type.
    ///
    /// Integer registers are `uint64_t`; the signed types read them through a
    /// signed cast. FLOAT reads the double member of the float register's
    /// convertible union. SHIFT masks the integer register to 6 bits.
    pub fn from_register(self, n: u8) -> String {
        match self {
            Self::Int32 | Self::Int64 => format!("(int64_t)r{n}"),
            Self::Uint32 | Self::Uint64 => format!("r{n}"),
            Self::Float => format!("f{n}.f64"),
            Self::Shift => format!("(r{n} & 63)"),
        }
    }

    /// Reads a convertible cell `expr` as this type.
    ///
    /// FLOAT converts the stored signed 64-bit integer to double rather than
    /// reinterpreting its bits, so random memory never yields NaN operands.
    pub fn convertible_read(self, expr: &str) -> String {
        match self {
            Self::Int32 => format!("{expr}.i32"),
            Self::Uint32 => format!("{expr}.u32"),
            Self::Int64 => format!("{expr}.i64"),
            Self::Uint64 => format!("{expr}.u64"),
            Self::Float => format!("(double){expr}.i64"),
            Self::Shift => format!("({expr}.u64 & 63)"),
        }
    }

    /// Selects the member of convertible cell `expr` written as this type.
    pub fn convertible_write(self, expr: &str) -> String {
        match self {
            Self::Int32 => format!("{expr}.i32"),
            Self::Uint32 => format!("{expr}.u32"),
            Self::Int64 => format!("{expr}.i64"),
            Self::Uint64 | Self::Shift => format!("{expr}.u64"),
            Self::Float => format!("{expr}.f64"),
        }
    }

    /// Short name used in listings and block comments.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "INT32",
            Self::Uint32 => "UINT32",
            Self::Int64 => "INT64",
            Self::Uint64 => "UINT64",
            Self::Float => "FLOAT",
            Self::Shift => "SHIFT",
        }
    }
}

impl TryFrom<u8> for OperandType {
    type Error = GenError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(GenError::OperandType(tag))
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
