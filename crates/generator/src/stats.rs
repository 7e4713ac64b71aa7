//! Generation statistics collection and reporting.
//!
//! This module tracks the shape of a generated program. It provides:
//! 1. **Summary:** Slot count, seed and instruction budget of the run.
//! 2. **Instruction mix:** Counts per opcode family and per family class.
//! 3. **Control flow:** Conditional vs unconditional CALL and RET slots.
//! 4. **Memory:** DRAM reads, scratchpad reads and memory vs register destinations.

use std::fmt;

use crate::isa::instruction::Decoded;
use crate::isa::location::{Destination, SourceA, SourceB};
use crate::isa::opcodes::{Family, FamilyClass};

/// Section names for selective stats output.
///
/// Pass an empty slice to [`GenStats::render_sections`] to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "control", "memory"];

/// Statistics of one generated program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenStats {
    /// Seed the program was drawn from.
    pub seed: u64,
    /// Instruction budget of the emitted program.
    pub instruction_count: u64,
    /// Number of emitted slots.
    pub slots: u64,

    /// Slots per family, indexed in [`Family::ALL`] order.
    pub per_family: [u64; 30],

    /// Integer add/sub/logic slots.
    pub class_integer: u64,
    /// Multiply slots.
    pub class_multiply: u64,
    /// Divide slots.
    pub class_divide: u64,
    /// Shift and rotate slots.
    pub class_shift: u64,
    /// Floating-point slots.
    pub class_float: u64,
    /// CALL and RET slots.
    pub class_control: u64,

    /// CALL slots guarded by a register comparison.
    pub call_conditional: u64,
    /// CALL slots that always branch.
    pub call_unconditional: u64,
    /// RET slots guarded by a register comparison.
    pub ret_conditional: u64,
    /// RET slots taken whenever the stack is non-empty.
    pub ret_unconditional: u64,

    /// Slots whose operand A goes through the DRAM read primitive.
    pub dram_reads: u64,
    /// Slots whose operand A reads the scratchpad.
    pub scratchpad_reads: u64,
    /// Slots writing their result to the scratchpad.
    pub memory_destinations: u64,
    /// Slots writing their result to a register.
    pub register_destinations: u64,
}

impl GenStats {
    /// Creates empty statistics for a run.
    pub fn new(seed: u64, instruction_count: u64) -> Self {
        Self {
            seed,
            instruction_count,
            ..Self::default()
        }
    }

    /// Accounts for one emitted slot.
    pub fn record(&mut self, inst: &Decoded) {
        let family = Family::from_opcode(inst.opcode);
        self.slots += 1;
        if let Some(i) = Family::ALL.iter().position(|&f| f == family) {
            self.per_family[i] += 1;
        }

        match family.class() {
            FamilyClass::IntegerAlu => self.class_integer += 1,
            FamilyClass::Multiply => self.class_multiply += 1,
            FamilyClass::Divide => self.class_divide += 1,
            FamilyClass::Shift => self.class_shift += 1,
            FamilyClass::Float => self.class_float += 1,
            FamilyClass::Control => self.class_control += 1,
        }

        let conditional = matches!(SourceB::of(inst), SourceB::Register(_));
        match (family, conditional) {
            (Family::Call, true) => self.call_conditional += 1,
            (Family::Call, false) => self.call_unconditional += 1,
            (Family::Ret, true) => self.ret_conditional += 1,
            (Family::Ret, false) => self.ret_unconditional += 1,
            _ => {}
        }

        match SourceA::from_loc(inst.loc_a) {
            SourceA::Dram => self.dram_reads += 1,
            SourceA::Scratchpad(_) => self.scratchpad_reads += 1,
        }

        // An unconditional CALL never reaches its destination write.
        if family == Family::Call && !conditional {
            return;
        }
        if Destination::of(inst).is_memory() {
            self.memory_destinations += 1;
        } else {
            self.register_destinations += 1;
        }
    }

    /// Number of slots assigned to `family`.
    pub fn family_count(&self, family: Family) -> u64 {
        Family::ALL
            .iter()
            .position(|&f| f == family)
            .map_or(0, |i| self.per_family[i])
    }

    /// Renders the requested sections; an empty slice renders all of them.
    ///
    /// Unknown section names are ignored.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let slots = self.slots.max(1) as f64;
        let pct = |n: u64| n as f64 / slots * 100.0;
        let mut out = String::new();

        if want("summary") {
            out.push_str("==========================================================\n");
            out.push_str("GENERATED PROGRAM STATISTICS\n");
            out.push_str("==========================================================\n");
            out.push_str(&format!("gen_seed                 {}\n", self.seed));
            out.push_str(&format!("gen_slots                {}\n", self.slots));
            out.push_str(&format!("gen_budget               {}\n", self.instruction_count));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("instruction_mix") {
            out.push_str("INSTRUCTION MIX\n");
            for (label, n) in [
                ("integer", self.class_integer),
                ("multiply", self.class_multiply),
                ("divide", self.class_divide),
                ("shift", self.class_shift),
                ("float", self.class_float),
                ("control", self.class_control),
            ] {
                out.push_str(&format!("  class.{label:<17}{n} ({:.2}%)\n", pct(n)));
            }
            for (family, &n) in Family::ALL.iter().zip(self.per_family.iter()) {
                if n > 0 {
                    out.push_str(&format!("  op.{:<20}{n}\n", family.mnemonic()));
                }
            }
            out.push_str("----------------------------------------------------------\n");
        }
        if want("control") {
            out.push_str("CONTROL FLOW\n");
            out.push_str(&format!("  call.conditional       {}\n", self.call_conditional));
            out.push_str(&format!("  call.unconditional     {}\n", self.call_unconditional));
            out.push_str(&format!("  ret.conditional        {}\n", self.ret_conditional));
            out.push_str(&format!("  ret.unconditional      {}\n", self.ret_unconditional));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("memory") {
            out.push_str("MEMORY\n");
            out.push_str(&format!(
                "  read.dram              {} ({:.2}%)\n",
                self.dram_reads,
                pct(self.dram_reads)
            ));
            out.push_str(&format!(
                "  read.scratchpad        {} ({:.2}%)\n",
                self.scratchpad_reads,
                pct(self.scratchpad_reads)
            ));
            out.push_str(&format!("  write.scratchpad       {}\n", self.memory_destinations));
            out.push_str(&format!("  write.register         {}\n", self.register_destinations));
            out.push_str("==========================================================\n");
        }
        out
    }
}

impl fmt::Display for GenStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_sections(&[]))
    }
}
