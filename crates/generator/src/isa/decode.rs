//! Instruction Decoder.
//!
//! Splits a 128-bit instruction word into a [`Decoded`] record and packs a
//! record back into a word. Decoding is total: any bit pattern yields some
//! record, and whether that record is meaningful is decided downstream.

use crate::isa::instruction::{
    ADDR_MASK, ADDR0_SHIFT, Decoded, IMM0_MASK, IMM0_SHIFT, IMM1_SHIFT, InstructionBits,
    LOC_A_SHIFT, LOC_B_SHIFT, LOC_C_SHIFT, LOC_MASK, OPCODE_MASK, OPCODE_SHIFT, REG_A_SHIFT,
    REG_B_SHIFT, REG_C_SHIFT, REG_MASK,
};

/// Decodes an instruction word into its component fields.
///
/// # Arguments
///
/// * `word` - The packed 128-bit instruction.
///
/// # Returns
///
/// A `Decoded` record with every field extracted at its fixed offset.
pub fn decode(word: u128) -> Decoded {
    Decoded {
        raw: word,
        opcode: word.opcode(),
        loc_a: word.loc_a(),
        reg_a: word.reg_a(),
        loc_b: word.loc_b(),
        reg_b: word.reg_b(),
        loc_c: word.loc_c(),
        reg_c: word.reg_c(),
        imm0: word.imm0(),
        addr0: word.addr0(),
        imm1: word.imm1(),
    }
}

/// Packs the fields of a record back into an instruction word.
///
/// Fields wider than their slot are truncated to the slot width, so
/// `encode(&decode(w)) == w & FIELD_MASK` for every word `w`. The `raw`
/// member of the record is ignored.
///
/// [`FIELD_MASK`]: crate::isa::instruction::FIELD_MASK
pub fn encode(inst: &Decoded) -> u128 {
    ((u128::from(inst.opcode) & OPCODE_MASK) << OPCODE_SHIFT)
        | ((u128::from(inst.loc_a) & LOC_MASK) << LOC_A_SHIFT)
        | ((u128::from(inst.reg_a) & REG_MASK) << REG_A_SHIFT)
        | ((u128::from(inst.loc_b) & LOC_MASK) << LOC_B_SHIFT)
        | ((u128::from(inst.reg_b) & REG_MASK) << REG_B_SHIFT)
        | ((u128::from(inst.loc_c) & LOC_MASK) << LOC_C_SHIFT)
        | ((u128::from(inst.reg_c) & REG_MASK) << REG_C_SHIFT)
        | ((u128::from(inst.imm0) & IMM0_MASK) << IMM0_SHIFT)
        | ((u128::from(inst.addr0) & ADDR_MASK) << ADDR0_SHIFT)
        | ((u128::from(inst.imm1) & ADDR_MASK) << IMM1_SHIFT)
}
