//! Fluent construction of instruction records.

use rxgen_core::isa::{Decoded, Family, decode, encode};

/// Builds a [`Decoded`] whose `raw` word matches its fields.
///
/// Defaults: operand A from the 256 KiB window through `r0`, operand B from
/// register `r0`, result to register `r0`, all immediates zero.
#[derive(Clone, Copy, Debug)]
pub struct WordBuilder {
    inst: Decoded,
}

impl Default for WordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WordBuilder {
    pub fn new() -> Self {
        Self {
            inst: Decoded {
                loc_a: 4,
                loc_c: 4,
                ..Decoded::default()
            },
        }
    }

    /// Starts from the first opcode of `family`.
    pub fn family(family: Family) -> Self {
        Self::new().opcode(*family.opcodes().start())
    }

    pub fn opcode(mut self, op: u8) -> Self {
        self.inst.opcode = op;
        self
    }

    pub fn loc_a(mut self, loc: u8) -> Self {
        self.inst.loc_a = loc;
        self
    }

    pub fn reg_a(mut self, reg: u8) -> Self {
        self.inst.reg_a = reg;
        self
    }

    pub fn loc_b(mut self, loc: u8) -> Self {
        self.inst.loc_b = loc;
        self
    }

    pub fn reg_b(mut self, reg: u8) -> Self {
        self.inst.reg_b = reg;
        self
    }

    /// Operand B from the immediate.
    pub fn imm_b(self) -> Self {
        self.loc_b(6)
    }

    pub fn loc_c(mut self, loc: u8) -> Self {
        self.inst.loc_c = loc;
        self
    }

    pub fn reg_c(mut self, reg: u8) -> Self {
        self.inst.reg_c = reg;
        self
    }

    pub fn imm0(mut self, imm: u8) -> Self {
        self.inst.imm0 = imm;
        self
    }

    pub fn addr0(mut self, addr: u32) -> Self {
        self.inst.addr0 = addr;
        self
    }

    pub fn imm1(mut self, imm: u32) -> Self {
        self.inst.imm1 = imm;
        self
    }

    pub fn word(self) -> u128 {
        encode(&self.inst)
    }

    pub fn build(self) -> Decoded {
        decode(self.word())
    }
}
