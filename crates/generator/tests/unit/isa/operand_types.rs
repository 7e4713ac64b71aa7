//! Operand Type Tests.
//!
//! Immediate coercion per type, register read expressions and convertible
//! union member selection.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rxgen_core::isa::OperandType;
use rxgen_core::isa::operand::{Scalar, float_immediate_bits, sign_extend32};

use crate::common::builder::WordBuilder;

#[rstest]
#[case(OperandType::Int32, "-1")]
#[case(OperandType::Uint32, "4294967295U")]
#[case(OperandType::Int64, "-1LL")]
#[case(OperandType::Uint64, "4294967295ULL")]
#[case(OperandType::Float, "((convertible_t){ .u64 = 0xffffffff00000000ULL }).f64")]
#[case(OperandType::Shift, "8")]
fn immediate_literals(#[case] ty: OperandType, #[case] text: &str) {
    let inst = WordBuilder::new().imm1(u32::MAX).imm0(200).build();
    assert_eq!(ty.from_immediate(&inst), text);
}

#[test]
fn immediate_values_extend_by_signedness() {
    let inst = WordBuilder::new().imm1(0x8000_0000).imm0(0x7F).build();
    assert_eq!(
        OperandType::Int64.immediate_value(&inst),
        Scalar::I64(-0x8000_0000)
    );
    assert_eq!(
        OperandType::Uint64.immediate_value(&inst),
        Scalar::U64(0x8000_0000)
    );
    assert_eq!(OperandType::Shift.immediate_value(&inst), Scalar::Shift(63));
    assert_eq!(Scalar::I64(-1).to_u64(), u64::MAX);
    assert_eq!(Scalar::U32(u32::MAX).to_u64(), 0xFFFF_FFFF);
}

#[test]
fn float_immediate_uses_high_half_only() {
    assert_eq!(sign_extend32(0xFFFF_FFFE), -2);
    assert_eq!(float_immediate_bits(0x4000_0000), 0x4000_0000_0000_0000);
    let inst = WordBuilder::new().imm1(0x4000_0000).build();
    assert_eq!(OperandType::Float.immediate_value(&inst), Scalar::F64(2.0));
}

#[rstest]
#[case(OperandType::Int32, "(int64_t)r4")]
#[case(OperandType::Uint32, "r4")]
#[case(OperandType::Int64, "(int64_t)r4")]
#[case(OperandType::Uint64, "r4")]
#[case(OperandType::Float, "f4.f64")]
#[case(OperandType::Shift, "(r4 & 63)")]
fn register_reads(#[case] ty: OperandType, #[case] text: &str) {
    assert_eq!(ty.from_register(4), text);
}

#[test]
fn convertible_members() {
    assert_eq!(OperandType::Float.convertible_read("x"), "(double)x.i64");
    assert_eq!(OperandType::Float.convertible_write("x"), "x.f64");
    assert_eq!(OperandType::Int32.convertible_read("x"), "x.i32");
    assert_eq!(OperandType::Uint32.convertible_write("x"), "x.u32");
    assert_eq!(OperandType::Uint64.convertible_read("x"), "x.u64");
}

#[test]
fn declarations() {
    let decls: Vec<_> = OperandType::ALL.iter().map(|t| t.declare()).collect();
    assert_eq!(
        decls,
        vec!["int32_t", "uint32_t", "int64_t", "uint64_t", "double", "int32_t"]
    );
    assert_eq!(OperandType::Float.register_name(2), "f2.f64");
    assert_eq!(OperandType::Int64.register_name(2), "r2");
    assert_eq!(OperandType::Shift.to_string(), "SHIFT");
}
