//! Integer family semantics.
//!
//! Operands arrive as raw 64-bit values (register contents, cell bits or
//! the sign/zero-extended immediate) and are narrowed to the family's
//! operand types exactly like the C declarations of `A` and `B`. The result
//! is returned as the value a `uint64_t` register would hold after the
//! assignment; 32-bit unsigned results are therefore zero-extended.

use crate::isa::opcodes::Family;
use crate::isa::operand::SHIFT_MASK;

/// Executes an integer family on `a` and `b`.
///
/// Returns `None` for floating-point and control families.
pub fn execute(family: Family, a: u64, b: u64) -> Option<u64> {
    let a32 = a as u32;
    let b32 = b as u32;
    let sh = (b & SHIFT_MASK) as u32;
    let value = match family {
        Family::Add64 => a.wrapping_add(b),
        Family::Sub64 => a.wrapping_sub(b),
        Family::Mul64 => a.wrapping_mul(b),
        Family::And64 => a & b,
        Family::Or64 => a | b,
        Family::Xor64 => a ^ b,
        Family::Add32 => u64::from(a32.wrapping_add(b32)),
        Family::Sub32 => u64::from(a32.wrapping_sub(b32)),
        Family::And32 => u64::from(a32 & b32),
        Family::Or32 => u64::from(a32 | b32),
        Family::Xor32 => u64::from(a32 ^ b32),
        Family::Mulh64 => ((u128::from(a) * u128::from(b)) >> 64) as u64,
        Family::Mul32 => u64::from(a32) * u64::from(b32),
        Family::Imul32 => (i64::from(a32 as i32) * i64::from(b32 as i32)) as u64,
        Family::Imulh64 => ((i128::from(a as i64) * i128::from(b as i64)) >> 64) as u64,
        Family::Div64 => a / u64::from(if b32 == 0 { 1 } else { b32 }),
        Family::Idiv64 => {
            let divisor = match b32 as i32 {
                0 => 1,
                d => i64::from(d),
            };
            (a as i64).wrapping_div(divisor) as u64
        }
        Family::Shl64 => a << sh,
        Family::Shr64 => a >> sh,
        Family::Sar64 => ((a as i64) >> sh) as u64,
        Family::Rol64 => a.rotate_left(sh),
        Family::Ror64 => a.rotate_right(sh),
        Family::Fadd
        | Family::Fsub
        | Family::Fmul
        | Family::Fdiv
        | Family::Fsqrt
        | Family::Fround
        | Family::Call
        | Family::Ret => return None,
    };
    Some(value)
}
