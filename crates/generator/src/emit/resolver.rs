//! Operand Resolver.
//!
//! Turns the location class and operand type of A, B and the destination
//! into C expressions. Operand A always reads through the address held in
//! `addr`, which the block header derives from `regA` after XORing `addr0`
//! into it.

use crate::isa::instruction::Decoded;
use crate::isa::location::{Destination, SourceA, SourceB};
use crate::isa::operand::OperandType;

/// Name of the local holding operand A's address inside a block.
pub const ADDRESS_LOCAL: &str = "addr";

/// Storage expression (a convertible cell) operand A reads from.
pub fn source_a_cell(inst: &Decoded) -> String {
    match SourceA::from_loc(inst.loc_a) {
        SourceA::Dram => format!("readDram(&mmu, {ADDRESS_LOCAL})"),
        SourceA::Scratchpad(window) => format!("{}({ADDRESS_LOCAL})", window.macro_name()),
    }
}

/// Read expression of operand A as `ty`.
pub fn operand_a(inst: &Decoded, ty: OperandType) -> String {
    ty.convertible_read(&source_a_cell(inst))
}

/// Read expression of operand B as `ty`.
pub fn operand_b(inst: &Decoded, ty: OperandType) -> String {
    match SourceB::of(inst) {
        SourceB::Register(n) => ty.from_register(n),
        SourceB::Immediate => ty.from_immediate(inst),
    }
}

/// Lvalue of the destination written as `ty`.
pub fn destination(inst: &Decoded, ty: OperandType) -> String {
    match Destination::of(inst) {
        Destination::Register(n) => ty.register_name(n),
        Destination::Scratchpad { window, reg, addr1 } => {
            let cell = format!("{}(r{reg} ^ {addr1}U)", window.macro_name());
            ty.convertible_write(&cell)
        }
    }
}

/// Condition guarding CALL/RET when operand B is a register, else `None`.
///
/// Compares the low 32 bits of register B with the large immediate.
pub fn branch_condition(inst: &Decoded) -> Option<String> {
    match SourceB::of(inst) {
        SourceB::Register(n) => Some(format!("(uint32_t)r{n} <= {}U", inst.imm1)),
        SourceB::Immediate => None,
    }
}
