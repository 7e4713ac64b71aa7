//! Scratchpad cell.
//!
//! A cell is 64 bits of storage viewed through the members of the emitted
//! program's `convertible_t` union. 32-bit stores touch only the low half.

use crate::isa::operand::Scalar;

/// One 64-bit scratchpad cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Convertible(pub u64);

impl Convertible {
    /// `.u64` member.
    #[inline]
    pub const fn u64(self) -> u64 {
        self.0
    }

    /// `.i64` member.
    #[inline]
    pub const fn i64(self) -> i64 {
        self.0 as i64
    }

    /// `.u32` member (low half).
    #[inline]
    pub const fn u32(self) -> u32 {
        self.0 as u32
    }

    /// `.i32` member (low half).
    #[inline]
    pub const fn i32(self) -> i32 {
        self.0 as i32
    }

    /// `.f64` member.
    #[inline]
    pub fn f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Stores `value` through the union member matching its type.
    pub fn store(&mut self, value: Scalar) {
        match value {
            Scalar::I32(v) | Scalar::Shift(v) => self.set_low(v as u32),
            Scalar::U32(v) => self.set_low(v),
            Scalar::I64(v) => self.0 = v as u64,
            Scalar::U64(v) => self.0 = v,
            Scalar::F64(v) => self.0 = v.to_bits(),
        }
    }

    #[inline]
    fn set_low(&mut self, low: u32) {
        self.0 = (self.0 & !u64::from(u32::MAX)) | u64::from(low);
    }
}

impl From<u64> for Convertible {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}
