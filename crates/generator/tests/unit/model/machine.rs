//! Reference Interpreter Tests.
//!
//! Small hand-built programs with zeroed constants: the budget, operand
//! addressing, the call stack protocol and union-style stores.

use proptest::prelude::*;

use rxgen_core::GenError;
use rxgen_core::common::constants::SCRATCHPAD_LENGTH;
use rxgen_core::config::{DramMode, GeneratorConfig};
use rxgen_core::isa::Family;
use rxgen_core::model::{Machine, Outcome, RoundingMode};
use rxgen_core::model::machine::Step;
use rxgen_core::Generator;

use crate::common::builder::WordBuilder;
use crate::common::harness::{ZERO_KEY, ZERO_SEED, pad_program, small_config, zero_machine};

#[test]
fn budget_halts_after_exactly_n_instructions() {
    let program = pad_program(Vec::new(), 4);
    let config = small_config(4, 10);
    let mut m = zero_machine(&program, &config);
    assert_eq!(m.run(), Outcome::Halted { executed: 10 });
    assert_eq!(m.ic, 0);
    // 10 steps over 4 slots wrap around twice and land on slot 2.
    assert_eq!(m.pc, 2);
}

#[test]
fn add_reads_scratchpad_and_immediate() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Add64).imm_b().imm1(3).reg_c(3).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 5;
    let _ = m.run();
    assert_eq!(m.r[3], 8);
}

#[test]
fn operand_a_register_is_mutated_before_use() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Or64).reg_a(1).addr0(0x10).imm_b().reg_c(2).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0x10].0 = 0xF0;
    let _ = m.step();
    assert_eq!(m.r[1], 0x10);
    assert_eq!(m.r[2], 0xF0);
}

#[test]
fn divide_by_zero_yields_dividend() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Div64).reg_b(2).reg_c(3).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 42;
    let _ = m.step();
    assert_eq!(m.r[3], 42);
}

#[test]
fn narrow_store_keeps_high_half_of_cell() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Add32).reg_b(2).loc_c(0).imm1(5).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 0xFFFF_FFFF_0000_0001;
    m.scratchpad[5].0 = 0xAAAA_AAAA_0000_0000;
    let _ = m.step();
    assert_eq!(m.scratchpad[5].0, 0xAAAA_AAAA_0000_0001);
}

#[test]
fn float_add_with_immediate() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Fadd).imm_b().imm1(0x4000_0000).reg_c(3).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 3;
    let _ = m.step();
    assert_eq!(m.f[3], 5.0);
}

#[test]
fn float_sub_stores_nan_operand_unchanged() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Fsub).reg_b(2).loc_c(0).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.f[2] = f64::from_bits(0xFFF8_0000_0000_0000);
    let _ = m.step();
    assert_eq!(m.scratchpad[0].0, 0xFFF8_0000_0000_0000);
}

#[test]
fn fround_converts_then_switches_mode() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Fround).reg_c(1).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 7;
    let _ = m.step();
    assert_eq!(m.f[1], 7.0);
    assert_eq!(m.mode, RoundingMode::TowardZero);
}

#[test]
fn call_jumps_to_masked_offset_and_pushes_frame() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Call).imm_b().imm0(0xFF).build()],
        16,
    );
    let config = small_config(16, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 0x99;
    assert_eq!(m.step(), Step::Continue(4));
    assert_eq!(m.stack.len(), 1);
    assert_eq!(m.stack[0].value, 0x99);
    assert_eq!(m.stack[0].return_slot, 1);
}

#[test]
fn untaken_call_writes_destination() {
    // r1 = 10 exceeds imm1 = 5, so the branch is not taken.
    let program = pad_program(
        vec![WordBuilder::family(Family::Call).reg_b(1).imm1(5).reg_c(4).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.r[1] = 10;
    m.scratchpad[0].0 = 0x77;
    assert_eq!(m.step(), Step::Continue(1));
    assert!(m.stack.is_empty());
    assert_eq!(m.r[4], 0x77);
}

#[test]
fn ret_on_empty_stack_falls_through() {
    let program = pad_program(
        vec![WordBuilder::family(Family::Ret).imm_b().reg_c(3).build()],
        4,
    );
    let config = small_config(4, 1);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 9;
    assert_eq!(m.step(), Step::Continue(1));
    assert_eq!(m.r[3], 9);
}

#[test]
fn ret_pops_frame_and_returns() {
    let call = WordBuilder::family(Family::Call).imm_b().imm0(1).build();
    let ret = WordBuilder::family(Family::Ret)
        .loc_a(5)
        .reg_a(1)
        .addr0(1)
        .imm_b()
        .reg_c(5)
        .build();
    // Eight slots give a CALL offset mask of 1, so imm0 = 1 targets slot 2.
    let mut program = pad_program(vec![call], 8);
    program[2] = ret;
    let config = small_config(8, 2);
    let mut m = zero_machine(&program, &config);
    m.scratchpad[0].0 = 0x55;
    m.scratchpad[1].0 = 0x0F;
    assert_eq!(m.step(), Step::Continue(2));
    assert_eq!(m.step(), Step::Continue(1));
    assert!(m.stack.is_empty());
    assert_eq!(m.r[5], 0x5A);
}

#[test]
fn stack_overflow_is_reported() {
    let call = WordBuilder::family(Family::Call).imm_b().imm0(0).build();
    let program = pad_program(vec![call, call], 4);
    let config = GeneratorConfig {
        stack_length: 2,
        ..small_config(4, 100)
    };
    let mut m = zero_machine(&program, &config);
    assert_eq!(
        m.run(),
        Outcome::StackOverflow {
            slot: 1,
            executed: 2
        }
    );
}

#[test]
fn initial_state_comes_from_constants() {
    let mut seed = ZERO_SEED;
    seed[0] = 0x01;
    seed[7] = 0x80;
    seed[64..72].copy_from_slice(&(-3i64).to_le_bytes());
    let mut key = ZERO_KEY;
    key[10] = 0x12;
    let program = pad_program(Vec::new(), 4);
    let config = small_config(4, 1);
    let m = Machine::new(&program, &config, &key, &seed, vec![1; SCRATCHPAD_LENGTH])
        .expect("valid machine");
    assert_eq!(m.r[0], 0x8000_0000_0000_0001);
    assert_eq!(m.f[0], -3.0);
    assert_eq!(m.mmu.m0, 0x0012_0000);
    assert_eq!(m.checksum(), SCRATCHPAD_LENGTH as u64);
}

#[test]
fn rejects_mismatched_inputs() {
    let program = pad_program(Vec::new(), 4);
    let config = small_config(4, 1);
    let err = Machine::new(&program, &config, &ZERO_KEY, &ZERO_SEED, vec![0; 3]).unwrap_err();
    assert!(matches!(
        err,
        GenError::ScratchpadSize {
            expected: SCRATCHPAD_LENGTH,
            actual: 3
        }
    ));
    let config = small_config(8, 1);
    assert!(matches!(
        Machine::new(&program, &config, &ZERO_KEY, &ZERO_SEED, vec![0; SCRATCHPAD_LENGTH]),
        Err(GenError::InvalidConfig(_))
    ));
}

#[test]
fn rejects_dram_buffer_mode() {
    let program = pad_program(Vec::new(), 4);
    let config = GeneratorConfig {
        dram: DramMode::Buffer,
        ..small_config(4, 1)
    };
    let err = Machine::new(&program, &config, &ZERO_KEY, &ZERO_SEED, vec![0; SCRATCHPAD_LENGTH])
        .unwrap_err();
    assert!(matches!(err, GenError::InvalidConfig(_)));
    assert!(err.to_string().contains("simulated DRAM"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn drawn_programs_run_to_completion(seed in any::<u64>()) {
        let mut config = small_config(64, 5_000);
        config.seed = Some(seed);
        let generator = Generator::new(config.clone()).expect("valid configuration");
        let program = generator.draw_program();
        let mut m = Machine::from_program(&program, &config, vec![0; SCRATCHPAD_LENGTH])
            .expect("valid machine");
        match m.run() {
            Outcome::Halted { executed } => prop_assert_eq!(executed, 5_000),
            Outcome::StackOverflow { executed, .. } => prop_assert!(executed <= 5_000),
        }
        prop_assert!(m.pc < 64);
    }
}
