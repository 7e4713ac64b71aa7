//! Slot interpreter.
//!
//! Executes a decoded program the way the emitted C program does: same
//! register initialization, same DRAM cursor, same call stack protocol and
//! the same instruction budget. It is the oracle the emitter is checked
//! against and a cheap way to inspect a program without a C compiler.
//!
//! The scratchpad content is supplied by the caller; the AES fill of the
//! emitted program is not reproduced here.

use tracing::{debug, trace};

use super::alu;
use super::convertible::Convertible;
use super::dram::Mmu;
use super::fpu::{self, RoundingMode};
use crate::common::constants::{
    FLOAT_REGISTER_COUNT, INT_REGISTER_COUNT, KEY_LENGTH, SCRATCHPAD_LENGTH, SEED_LENGTH,
};
use crate::common::{GenError, Result};
use crate::config::GeneratorConfig;
use crate::generator::Program;
use crate::isa::instruction::Decoded;
use crate::isa::location::{Destination, SourceA, SourceB};
use crate::isa::opcodes::Family;
use crate::isa::operand::{OperandType, Scalar, sign_extend32};

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The instruction budget ran out.
    Halted {
        /// Instructions executed.
        executed: u64,
    },
    /// A CALL would have pushed past the stack capacity.
    StackOverflow {
        /// Slot of the offending CALL.
        slot: usize,
        /// Instructions executed, the faulting CALL included.
        executed: u64,
    },
}

/// Result of executing one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Execution continues at the given slot.
    Continue(usize),
    /// The run is over.
    Done(Outcome),
}

/// One call stack frame: the pushed value and the return slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Value pushed by CALL (operand A).
    pub value: u64,
    /// Slot following the CALL.
    pub return_slot: usize,
}

/// Interpreter state.
#[derive(Clone, Debug)]
pub struct Machine<'p> {
    program: &'p [Decoded],
    config: GeneratorConfig,
    /// Integer registers `r0`-`r7`.
    pub r: [u64; INT_REGISTER_COUNT],
    /// Float registers `f0`-`f7`.
    pub f: [f64; FLOAT_REGISTER_COUNT],
    /// Scratchpad cells.
    pub scratchpad: Vec<Convertible>,
    /// Call stack, one frame per taken CALL.
    pub stack: Vec<Frame>,
    /// DRAM cursor.
    pub mmu: Mmu,
    /// Current rounding mode.
    pub mode: RoundingMode,
    /// Remaining instruction budget.
    pub ic: u64,
    /// Slot executed next.
    pub pc: usize,
    executed: u64,
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

impl<'p> Machine<'p> {
    /// Builds the initial state from the constants and a scratchpad image.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::ScratchpadSize`] if `scratchpad` does not hold
    /// exactly one value per cell, and [`GenError::InvalidConfig`] if the
    /// program length disagrees with `config` or `config` selects the DRAM
    /// buffer, whose AES-filled content is not modeled.
    pub fn new(
        program: &'p [Decoded],
        config: &GeneratorConfig,
        key: &[u8; KEY_LENGTH],
        aes_seed: &[u8; SEED_LENGTH],
        scratchpad: Vec<u64>,
    ) -> Result<Self> {
        config.validate()?;
        if config.uses_dram_buffer() {
            return Err(GenError::InvalidConfig(
                "the model only supports simulated DRAM reads".to_string(),
            ));
        }
        if program.len() != config.program_size {
            return Err(GenError::InvalidConfig(format!(
                "program has {} slots, configuration expects {}",
                program.len(),
                config.program_size
            )));
        }
        if scratchpad.len() != SCRATCHPAD_LENGTH {
            return Err(GenError::ScratchpadSize {
                expected: SCRATCHPAD_LENGTH,
                actual: scratchpad.len(),
            });
        }

        let mut r = [0u64; INT_REGISTER_COUNT];
        for (i, reg) in r.iter_mut().enumerate() {
            *reg = le_u64(&aes_seed[i * 8..]);
        }
        let mut f = [0f64; FLOAT_REGISTER_COUNT];
        for (i, reg) in f.iter_mut().enumerate() {
            *reg = fpu::from_i64(RoundingMode::Nearest, le_u64(&aes_seed[64 + i * 8..]) as i64);
        }

        Ok(Self {
            program,
            config: config.clone(),
            r,
            f,
            scratchpad: scratchpad.into_iter().map(Convertible).collect(),
            stack: Vec::with_capacity(config.stack_length / 2),
            mmu: Mmu::from_key(key),
            mode: RoundingMode::Nearest,
            ic: config.instruction_count,
            pc: 0,
            executed: 0,
        })
    }

    /// Builds the initial state of a drawn program.
    ///
    /// # Errors
    ///
    /// See [`Machine::new`].
    pub fn from_program(
        program: &'p Program,
        config: &GeneratorConfig,
        scratchpad: Vec<u64>,
    ) -> Result<Self> {
        Self::new(
            &program.instructions,
            config,
            &program.key,
            &program.aes_seed,
            scratchpad,
        )
    }

    /// Instructions executed so far.
    pub const fn executed(&self) -> u64 {
        self.executed
    }

    /// Wrapping sum of all scratchpad cells, as printed by the program.
    pub fn checksum(&self) -> u64 {
        self.scratchpad
            .iter()
            .fold(0u64, |acc, cell| acc.wrapping_add(cell.u64()))
    }

    /// Runs until the budget is exhausted or the stack overflows.
    pub fn run(&mut self) -> Outcome {
        loop {
            if let Step::Done(outcome) = self.step() {
                debug!(?outcome, checksum = self.checksum(), "model run finished");
                return outcome;
            }
        }
    }

    /// Executes the slot at `pc`.
    pub fn step(&mut self) -> Step {
        if self.ic == 0 {
            return Step::Done(Outcome::Halted {
                executed: self.executed,
            });
        }
        self.ic -= 1;
        self.executed += 1;

        let index = self.pc;
        let inst = self.program[index];
        let family = Family::from_opcode(inst.opcode);
        trace!(slot = index, %family, "step");

        let reg_a = usize::from(inst.reg_a);
        self.r[reg_a] ^= u64::from(inst.addr0);
        let addr = self.r[reg_a] as u32;
        let next = self.config.next_slot(index);

        let sig = family.signature();
        match family {
            Family::Fadd | Family::Fsub | Family::Fmul | Family::Fdiv => {
                let a = self.read_float_a(&inst, addr);
                let b = self.float_b(&inst);
                let c = match family {
                    Family::Fadd => fpu::add(self.mode, a, b),
                    Family::Fsub => fpu::sub(self.mode, a, b),
                    Family::Fmul => fpu::mul(self.mode, a, b),
                    _ => fpu::div(self.mode, a, b),
                };
                self.store(&inst, Scalar::F64(c));
            }
            Family::Fsqrt => {
                let a = self.read_float_a(&inst, addr);
                self.store(&inst, Scalar::F64(fpu::sqrt_abs(self.mode, a)));
            }
            Family::Fround => {
                let a = self.read_a(&inst, addr).i64();
                self.store(&inst, Scalar::F64(fpu::from_i64(self.mode, a)));
                self.mode = RoundingMode::from_bits(a as u64);
            }
            Family::Call => {
                let a = self.read_a(&inst, addr).u64();
                if self.condition(&inst) {
                    if (self.stack.len() + 1) * 2 > self.config.stack_length {
                        return Step::Done(Outcome::StackOverflow {
                            slot: index,
                            executed: self.executed,
                        });
                    }
                    self.stack.push(Frame {
                        value: a,
                        return_slot: next,
                    });
                    self.pc = self.config.call_target(index, inst.imm0);
                    return Step::Continue(self.pc);
                }
                self.store(&inst, Scalar::U64(a));
            }
            Family::Ret => {
                let a = self.read_a(&inst, addr).u64();
                let frame = if self.condition(&inst) {
                    self.stack.pop()
                } else {
                    None
                };
                if let Some(frame) = frame {
                    self.store(&inst, Scalar::U64(a ^ frame.value));
                    self.pc = frame.return_slot;
                    return Step::Continue(self.pc);
                }
                self.store(&inst, Scalar::U64(a));
            }
            _ => {
                let cell = self.read_a(&inst, addr);
                let a = Self::read_int(cell, sig.a);
                let b = sig.b.map_or(0, |ty| self.int_b(&inst, ty));
                if let Some(value) = alu::execute(family, a, b) {
                    let result = match sig.c {
                        OperandType::Uint32 => Scalar::U32(value as u32),
                        OperandType::Int64 => Scalar::I64(value as i64),
                        _ => Scalar::U64(value),
                    };
                    self.store(&inst, result);
                }
            }
        }
        self.pc = next;
        Step::Continue(next)
    }

    fn read_a(&mut self, inst: &Decoded, addr: u32) -> Convertible {
        match SourceA::from_loc(inst.loc_a) {
            SourceA::Dram => Convertible(self.mmu.read(addr)),
            SourceA::Scratchpad(window) => self.scratchpad[window.index(addr)],
        }
    }

    fn read_float_a(&mut self, inst: &Decoded, addr: u32) -> f64 {
        let cell = self.read_a(inst, addr);
        fpu::from_i64(self.mode, cell.i64())
    }

    /// Raw 64-bit value of an integer operand after its C declaration.
    fn read_int(cell: Convertible, ty: OperandType) -> u64 {
        match ty {
            OperandType::Int32 => i64::from(cell.i32()) as u64,
            OperandType::Uint32 => u64::from(cell.u32()),
            _ => cell.u64(),
        }
    }

    fn int_b(&self, inst: &Decoded, ty: OperandType) -> u64 {
        match SourceB::of(inst) {
            SourceB::Register(n) => {
                let value = self.r[usize::from(n)];
                match ty {
                    OperandType::Int32 => sign_extend32(value as u32) as u64,
                    OperandType::Uint32 => value & u64::from(u32::MAX),
                    _ => value,
                }
            }
            SourceB::Immediate => ty.immediate_value(inst).to_u64(),
        }
    }

    fn float_b(&self, inst: &Decoded) -> f64 {
        match SourceB::of(inst) {
            SourceB::Register(n) => self.f[usize::from(n)],
            SourceB::Immediate => match OperandType::Float.immediate_value(inst) {
                Scalar::F64(v) => v,
                other => other.to_u64() as f64,
            },
        }
    }

    fn condition(&self, inst: &Decoded) -> bool {
        match SourceB::of(inst) {
            SourceB::Register(n) => (self.r[usize::from(n)] as u32) <= inst.imm1,
            SourceB::Immediate => true,
        }
    }

    fn store(&mut self, inst: &Decoded, value: Scalar) {
        match Destination::of(inst) {
            Destination::Register(n) => {
                let n = usize::from(n);
                match value {
                    Scalar::F64(v) => self.f[n] = v,
                    other => self.r[n] = other.to_u64(),
                }
            }
            Destination::Scratchpad { window, reg, addr1 } => {
                let addr = (self.r[usize::from(reg)] ^ u64::from(addr1)) as u32;
                self.scratchpad[window.index(addr)].store(value);
            }
        }
    }
}
