//! Instruction Disassembler.
//!
//! Renders a decoded instruction as a one-line mnemonic for block comments,
//! trace logging and program listings.
//!
//! # Format
//!
//! `MNEMONIC dst, srcA, srcB` where memory operands are written as
//! `[window rN^addr]`:
//!
//! ```
//! use rxgen_core::isa::disasm::disassemble;
//! use rxgen_core::isa::decode::decode;
//! let text = disassemble(&decode(0));
//! assert_eq!(text, "ADD_64 [L2 r0^0x0], [DRAM r0^0x0], r0");
//! ```

use crate::isa::instruction::Decoded;
use crate::isa::location::{Destination, SourceA, SourceB, Window};
use crate::isa::opcodes::Family;
use crate::isa::operand::{OperandType, Scalar};

const fn window_name(window: Window) -> &'static str {
    match window {
        Window::L1 => "L1",
        Window::L2 => "L2",
    }
}

fn operand_a(inst: &Decoded) -> String {
    let area = match SourceA::from_loc(inst.loc_a) {
        SourceA::Dram => "DRAM",
        SourceA::Scratchpad(w) => window_name(w),
    };
    format!("[{area} r{}^{:#x}]", inst.reg_a, inst.addr0)
}

fn destination(inst: &Decoded, ty: OperandType) -> String {
    match Destination::of(inst) {
        Destination::Register(n) if ty.is_float() => format!("f{n}"),
        Destination::Register(n) => format!("r{n}"),
        Destination::Scratchpad { window, reg, addr1 } => {
            format!("[{} r{reg}^{addr1:#x}]", window_name(window))
        }
    }
}

fn operand_b(inst: &Decoded, ty: OperandType) -> String {
    match SourceB::of(inst) {
        SourceB::Register(n) if ty.is_float() => format!("f{n}"),
        SourceB::Register(n) => format!("r{n}"),
        SourceB::Immediate => match ty.immediate_value(inst) {
            Scalar::I32(v) => v.to_string(),
            Scalar::I64(v) => v.to_string(),
            Scalar::U32(v) => format!("{v:#x}"),
            Scalar::U64(v) => format!("{v:#x}"),
            Scalar::F64(v) => format!("{v:e}"),
            Scalar::Shift(v) => format!("#{v}"),
        },
    }
}

fn condition(inst: &Decoded) -> Option<String> {
    match SourceB::of(inst) {
        SourceB::Register(n) => Some(format!("if r{n} <= {:#x}", inst.imm1)),
        SourceB::Immediate => None,
    }
}

/// Disassembles a decoded instruction into a human-readable string.
pub fn disassemble(inst: &Decoded) -> String {
    let family = Family::from_opcode(inst.opcode);
    let sig = family.signature();
    let dst = destination(inst, sig.c);
    let a = operand_a(inst);
    match family {
        Family::Call => {
            let cond = condition(inst).map_or_else(String::new, |c| format!(", {c}"));
            format!("CALL {dst}, {a}, +{}{cond}", inst.imm0)
        }
        Family::Ret => {
            let cond = condition(inst).map_or_else(String::new, |c| format!(", {c}"));
            format!("RET {dst}, {a}{cond}")
        }
        _ => match sig.b {
            Some(ty) => format!("{} {dst}, {a}, {}", family.mnemonic(), operand_b(inst, ty)),
            None => format!("{} {dst}, {a}", family.mnemonic()),
        },
    }
}
