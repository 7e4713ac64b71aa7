//! Block Emission Tests.
//!
//! Compares whole emitted blocks for representative families, including
//! the CALL/RET stack protocol and its wraparound targets.

use pretty_assertions::assert_eq;

use rxgen_core::config::{GeneratorConfig, StackOverflowPolicy};
use rxgen_core::isa::{Family, decode};

use crate::common::builder::WordBuilder;
use crate::common::harness::render_block;

fn config() -> GeneratorConfig {
    GeneratorConfig::default()
}

#[test]
fn add_64_register_operands() {
    let inst = WordBuilder::family(Family::Add64)
        .reg_a(1)
        .addr0(16)
        .reg_b(2)
        .reg_c(3)
        .build();
    let expected = "\ti_9: { //ADD_64 r3, [L2 r1^0x10], r2
\t\tif(0 == ic--) goto end;
\t\tr1 ^= 16U;
\t\taddr_t addr = r1;
\t\tuint64_t A = SCRATCHPAD_256K(addr).u64;
\t\tuint64_t B = r2;
\t\tr3 = A + B; }
";
    assert_eq!(render_block(9, &inst, &config()), expected);
}

#[test]
fn all_zero_word_is_a_register_neutral_add() {
    // Opcode 0 is ADD_64; locA 0 reads DRAM, locB 0 reads r0, locC 0 writes
    // the 256 KiB window at r0 ^ 0.
    let expected = "\ti_0: { //ADD_64 [L2 r0^0x0], [DRAM r0^0x0], r0
\t\tif(0 == ic--) goto end;
\t\tr0 ^= 0U;
\t\taddr_t addr = r0;
\t\tuint64_t A = readDram(&mmu, addr).u64;
\t\tuint64_t B = r0;
\t\tSCRATCHPAD_256K(r0 ^ 0U).u64 = A + B; }
";
    assert_eq!(render_block(0, &decode(0), &config()), expected);
}

#[test]
fn imul_32_widens_to_int64() {
    let inst = WordBuilder::family(Family::Imul32)
        .loc_a(6)
        .imm_b()
        .imm1(0xFFFF_FFFB)
        .reg_c(3)
        .build();
    let text = render_block(0, &inst, &config());
    assert!(text.contains("\t\tint32_t A = SCRATCHPAD_16K(addr).i32;\n"));
    assert!(text.contains("\t\tint32_t B = -5;\n"));
    assert!(text.ends_with("\t\tr3 = (int64_t)A * B; }\n"));
}

#[test]
fn mulh_uses_128_bit_product() {
    let inst = WordBuilder::family(Family::Mulh64).build();
    assert!(render_block(0, &inst, &config()).contains("r0 = ((uint128_t)A * B) >> 64; }"));
    let inst = WordBuilder::family(Family::Imulh64).build();
    assert!(render_block(0, &inst, &config()).contains("r0 = ((int128_t)A * B) >> 64; }"));
}

#[test]
fn idiv_reads_signed_32_bit_divisor() {
    let inst = WordBuilder::family(Family::Idiv64).reg_b(5).build();
    let text = render_block(0, &inst, &config());
    assert!(text.contains("\t\tint64_t A = SCRATCHPAD_256K(addr).i64;\n"));
    assert!(text.contains("\t\tint32_t B = (int64_t)r5;\n"));
    assert!(text.contains("\t\tif(B == 0) B = 1;\n"));
}

#[test]
fn rotate_and_shift_mask_b() {
    let inst = WordBuilder::family(Family::Ror64).reg_b(6).build();
    let text = render_block(0, &inst, &config());
    assert!(text.contains("\t\tint32_t B = (r6 & 63);\n"));
    assert!(text.contains("r0 = __rorq(A, B); }"));
    let inst = WordBuilder::family(Family::Sar64).build();
    assert!(render_block(0, &inst, &config()).contains("\t\tint64_t A ="));
}

#[test]
fn float_add_converts_memory_operand() {
    let inst = WordBuilder::family(Family::Fadd)
        .loc_a(0)
        .reg_b(2)
        .loc_c(2)
        .reg_c(5)
        .imm1(3)
        .build();
    let text = render_block(0, &inst, &config());
    assert!(text.contains("\t\tdouble A = (double)readDram(&mmu, addr).i64;\n"));
    assert!(text.contains("\t\tdouble B = f2.f64;\n"));
    assert!(text.ends_with("\t\tSCRATCHPAD_16K(r5 ^ 3U).f64 = A + B; }\n"));
}

#[test]
fn fsqrt_takes_absolute_value() {
    let inst = WordBuilder::family(Family::Fsqrt).build();
    let expected = "\ti_1: { //FSQRT f0, [L2 r0^0x0]
\t\tif(0 == ic--) goto end;
\t\tr0 ^= 0U;
\t\taddr_t addr = r0;
\t\tdouble A = fabs((double)SCRATCHPAD_256K(addr).i64);
\t\tf0.f64 = _mm_cvtsd_f64(_mm_sqrt_sd(_mm_setzero_pd(), _mm_set_sd(A))); }
";
    assert_eq!(render_block(1, &inst, &config()), expected);
}

#[test]
fn fround_stores_then_sets_rounding_mode() {
    let inst = WordBuilder::family(Family::Fround).loc_a(5).reg_c(2).build();
    let text = render_block(0, &inst, &config());
    let lines: Vec<&str> = text.lines().skip(4).collect();
    assert_eq!(
        lines,
        vec![
            "\t\tint64_t A = SCRATCHPAD_16K(addr).i64;",
            "\t\tf2.f64 = A;",
            "\t\t_mm_setcsr(mxcsr | (((uint32_t)A << 13) & _MM_ROUND_MASK)); }",
        ]
    );
}

#[test]
fn conditional_call() {
    let inst = WordBuilder::family(Family::Call)
        .loc_a(0)
        .reg_a(1)
        .reg_b(2)
        .imm1(100)
        .imm0(0x85)
        .reg_c(3)
        .build();
    let expected = "\ti_10: { //CALL r3, [DRAM r1^0x0], +133, if r2 <= 0x64
\t\tif(0 == ic--) goto end;
\t\tr1 ^= 0U;
\t\taddr_t addr = r1;
\t\tuint64_t A = readDram(&mmu, addr).u64;
\t\tif((uint32_t)r2 <= 100U) {
\t\t\tPUSH_VALUE(A);
\t\t\tPUSH_ADDRESS(&&i_11);
\t\t\tgoto i_16;
\t\t}
\t\tr3 = A; }
";
    assert_eq!(render_block(10, &inst, &config()), expected);
}

#[test]
fn unconditional_call_wraps_and_skips_destination() {
    let inst = WordBuilder::family(Family::Call).imm_b().imm0(0).build();
    let text = render_block(511, &inst, &config());
    assert!(text.contains("\t\t\tPUSH_ADDRESS(&&i_0);\n"));
    assert!(text.contains("\t\t\tgoto i_0;\n"));
    assert!(!text.contains("r0 = A"));
    assert!(!text.contains("if((uint32_t)"));
}

#[test]
fn call_offset_is_masked_to_a_quarter_of_the_program() {
    let config = GeneratorConfig {
        program_size: 16,
        ..GeneratorConfig::default()
    };
    // 16 / 4 - 1 = 3, so imm0 = 0xFF gives an offset of 3.
    let inst = WordBuilder::family(Family::Call).imm_b().imm0(0xFF).build();
    let text = render_block(14, &inst, &config);
    assert!(text.contains("PUSH_ADDRESS(&&i_15);"));
    assert!(text.contains("goto i_2;"));
}

#[test]
fn unconditional_ret_to_memory() {
    let inst = WordBuilder::family(Family::Ret)
        .imm_b()
        .loc_c(0)
        .reg_c(4)
        .imm1(8)
        .build();
    let expected = "\ti_3: { //RET [L2 r4^0x8], [L2 r0^0x0]
\t\tif(0 == ic--) goto end;
\t\tr0 ^= 0U;
\t\taddr_t addr = r0;
\t\tuint64_t A = SCRATCHPAD_256K(addr).u64;
\t\tif(!STACK_IS_EMPTY()) {
\t\t\tvoid* target = POP_ADDRESS();
\t\t\tuint64_t C = POP_VALUE();
\t\t\tSCRATCHPAD_256K(r4 ^ 8U).u64 = A ^ C;
\t\t\tgoto *target;
\t\t}
\t\tSCRATCHPAD_256K(r4 ^ 8U).u64 = A; }
";
    assert_eq!(render_block(3, &inst, &config()), expected);
}

#[test]
fn conditional_ret_checks_stack_first() {
    let inst = WordBuilder::family(Family::Ret).reg_b(1).imm1(7).build();
    let text = render_block(0, &inst, &config());
    assert!(text.contains("\t\tif(!STACK_IS_EMPTY() && (uint32_t)r1 <= 7U) {\n"));
}

#[test]
fn checked_stack_guards_every_push() {
    let config = GeneratorConfig {
        stack_overflow: StackOverflowPolicy::Fault,
        ..GeneratorConfig::default()
    };
    let inst = WordBuilder::family(Family::Call).reg_b(1).build();
    let text = render_block(0, &inst, &config);
    let guard = text
        .find("if(sp + 2 > STACK_LENGTH) goto overflow;")
        .expect("guard present");
    let push = text.find("PUSH_VALUE(A);").expect("push present");
    assert!(guard < push);
}
