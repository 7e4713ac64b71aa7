//! Integer Family Semantics Tests.

use proptest::prelude::*;
use rstest::rstest;

use rxgen_core::isa::Family;
use rxgen_core::model::alu::execute;

#[rstest]
#[case(Family::Add64, 5, 3, 8)]
#[case(Family::Add64, u64::MAX, 1, 0)]
#[case(Family::Add32, 0x1_0000_0005, 3, 8)]
#[case(Family::Add32, 0xFFFF_FFFF, 1, 0)]
#[case(Family::Sub64, 3, 5, (-2i64) as u64)]
#[case(Family::Sub32, 3, 5, 0xFFFF_FFFE)]
#[case(Family::Mul64, 1 << 63, 2, 0)]
#[case(Family::Mulh64, 1 << 63, 2, 1)]
#[case(Family::Mul32, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFE_0000_0001)]
#[case(Family::Imul32, (-2i64) as u64, 3, (-6i64) as u64)]
#[case(Family::Imulh64, u64::MAX, 1, u64::MAX)]
#[case(Family::Div64, 42, 0, 42)]
#[case(Family::Div64, 42, 0x1_0000_0000, 42)]
#[case(Family::Div64, 100, 7, 14)]
#[case(Family::Idiv64, (-7i64) as u64, 2, (-3i64) as u64)]
#[case(Family::Idiv64, 7, 0xFFFF_FFFF, (-7i64) as u64)]
#[case(Family::Idiv64, i64::MIN as u64, u64::MAX, i64::MIN as u64)]
#[case(Family::And32, u64::MAX, u64::MAX, 0xFFFF_FFFF)]
#[case(Family::Xor64, 0b1100, 0b1010, 0b0110)]
#[case(Family::Shl64, 1, 65, 2)]
#[case(Family::Shr64, 1 << 63, 63, 1)]
#[case(Family::Sar64, (-8i64) as u64, 1, (-4i64) as u64)]
#[case(Family::Rol64, 1, 64, 1)]
#[case(Family::Ror64, 1, 1, 1 << 63)]
fn integer_families(#[case] family: Family, #[case] a: u64, #[case] b: u64, #[case] c: u64) {
    assert_eq!(execute(family, a, b), Some(c), "{family}");
}

#[test]
fn non_integer_families_are_not_alu() {
    for family in [Family::Fadd, Family::Fsqrt, Family::Fround, Family::Call, Family::Ret] {
        assert_eq!(execute(family, 1, 1), None);
    }
}

proptest! {
    #[test]
    fn narrow_results_are_zero_extended(a in any::<u64>(), b in any::<u64>()) {
        for family in [Family::Add32, Family::Sub32, Family::And32, Family::Or32, Family::Xor32] {
            let c = execute(family, a, b).unwrap_or(u64::MAX);
            prop_assert!(c <= u64::from(u32::MAX));
        }
    }

    #[test]
    fn division_never_traps_on_zero(a in any::<u64>()) {
        prop_assert_eq!(execute(Family::Div64, a, 0), Some(a));
        prop_assert_eq!(execute(Family::Idiv64, a, 0), Some(a));
    }

    #[test]
    fn shift_amount_uses_low_six_bits(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(execute(Family::Rol64, a, b), execute(Family::Rol64, a, b & 63));
        prop_assert_eq!(execute(Family::Shl64, a, b), execute(Family::Shl64, a, b & 63));
    }
}
