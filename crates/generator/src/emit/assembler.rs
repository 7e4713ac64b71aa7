//! Program Assembler.
//!
//! Writes a complete C translation unit for one drawn program, in order:
//! 1. **Preamble:** Headers, types, memory and stack macros, DRAM read and AES fill.
//! 2. **Constants:** The 32-byte key and 128-byte seed arrays.
//! 3. **Main:** Register file, scratchpad, call stack and MMU declarations.
//! 4. **Initialization:** Registers from the seed, DRAM cursor from the key,
//!    scratchpad fill, budget and MXCSR setup.
//! 5. **Blocks:** One labeled block per slot, then a jump back to `i_0`.
//! 6. **Termination:** Register dump, scratchpad checksum and cleanup.

use std::io::Write;

use tracing::{debug, trace};

use super::prelude::write_preamble;
use super::semantics::{END_LABEL, OVERFLOW_LABEL, slot_label, write_block};
use crate::common::Result;
use crate::common::constants::{
    FLOAT_REGISTER_COUNT, INT_REGISTER_COUNT, KEY_LENGTH, SEED_LENGTH,
};
use crate::config::{GeneratorConfig, StackOverflowPolicy};
use crate::generator::Program;
use crate::isa::disasm::disassemble;
use crate::stats::GenStats;

/// Streams a [`Program`] as C source into a writer.
#[derive(Debug)]
pub struct Assembler<'a, W: Write> {
    out: W,
    config: &'a GeneratorConfig,
}

fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a, W: Write> Assembler<'a, W> {
    /// Creates an assembler writing into `out`.
    pub const fn new(out: W, config: &'a GeneratorConfig) -> Self {
        Self { out, config }
    }

    /// Consumes the assembler, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the whole program and returns its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenError::Io`] if the writer fails.
    pub fn assemble(&mut self, program: &Program) -> Result<GenStats> {
        let mut stats = GenStats::new(program.rng_seed, self.config.instruction_count);

        debug!("emitting preamble");
        write_preamble(&mut self.out, self.config)?;
        self.write_constants(program)?;
        self.write_main()?;
        debug!("emitting initialization");
        self.write_init()?;

        debug!(slots = program.instructions.len(), "emitting blocks");
        for (index, inst) in program.instructions.iter().enumerate() {
            trace!(slot = index, "{}", disassemble(inst));
            write_block(&mut self.out, index, inst, self.config)?;
            stats.record(inst);
        }
        writeln!(self.out, "\tgoto {};", slot_label(0))?;

        debug!("emitting termination");
        self.write_epilogue()?;
        self.out.flush()?;
        Ok(stats)
    }

    fn write_constants(&mut self, program: &Program) -> Result<()> {
        writeln!(
            self.out,
            "const byte aesKey[{KEY_LENGTH}] __attribute__((aligned(16))) = {{ {} }};",
            byte_list(&program.key)
        )?;
        writeln!(
            self.out,
            "const byte aesSeed[{SEED_LENGTH}] __attribute__((aligned(16))) = {{ {} }};",
            byte_list(&program.aes_seed)
        )?;
        Ok(())
    }

    fn write_main(&mut self) -> Result<()> {
        let ints = (0..INT_REGISTER_COUNT)
            .map(|i| format!("r{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let floats = (0..FLOAT_REGISTER_COUNT)
            .map(|i| format!("f{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "__attribute__((optimize(\"Os\"))) int main() {{")?;
        writeln!(self.out, "\tregister uint64_t {ints};")?;
        writeln!(self.out, "\tconvertible_t {floats};")?;
        writeln!(self.out, "\tregister uint64_t ic, sp;")?;
        writeln!(
            self.out,
            "\tstatic convertible_t scratchpad[SCRATCHPAD_LENGTH] __attribute__((aligned(16)));"
        )?;
        writeln!(self.out, "\tstatic stack_entry_t stack[STACK_LENGTH];")?;
        writeln!(self.out, "\tmmu_t mmu;")?;
        writeln!(self.out, "\tuint32_t mxcsr;")?;
        Ok(())
    }

    fn write_init(&mut self) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "#ifdef RAM")?;
        writeln!(out, "\tmmu.buffer = (char*)_mm_malloc(DRAM_SIZE, 16);")?;
        writeln!(out, "\tif(!mmu.buffer) {{")?;
        writeln!(out, "\t\tfprintf(stderr, \"DRAM buffer allocation failed\\n\");")?;
        writeln!(out, "\t\treturn 1;")?;
        writeln!(out, "\t}}")?;
        writeln!(out, "\tfprintf(stderr, \"Initializing DRAM buffer...\\n\");")?;
        writeln!(
            out,
            "\taesInitialize((const __m128i*)aesKey, (const __m128i*)aesSeed, (__m128i*)mmu.buffer, DRAM_SIZE);"
        )?;
        writeln!(out, "#endif")?;
        writeln!(out, "\tclock_t clockStart = clock(), clockEnd;")?;
        for i in 0..INT_REGISTER_COUNT {
            writeln!(out, "\tr{i} = *(const uint64_t*)(aesSeed + {});", i * 8)?;
        }
        for i in 0..FLOAT_REGISTER_COUNT {
            writeln!(
                out,
                "\tf{i}.f64 = *(const int64_t*)(aesSeed + {});",
                64 + i * 8
            )?;
        }
        writeln!(
            out,
            "\tmmu.m0 = ((addr_t)aesKey[9] << 8) | ((addr_t)aesKey[10] << 16) | ((addr_t)aesKey[11] << 24);"
        )?;
        writeln!(out, "\tmmu.m1 = 0;")?;
        writeln!(
            out,
            "\taesInitialize((const __m128i*)aesKey, (const __m128i*)aesSeed, (__m128i*)scratchpad, SCRATCHPAD_SIZE);"
        )?;
        writeln!(out, "\tmmu.mx = 0;")?;
        writeln!(out, "\tsp = 0;")?;
        writeln!(out, "\tic = {}ULL;", self.config.instruction_count)?;
        writeln!(
            out,
            "\tmxcsr = (_mm_getcsr() | _MM_FLUSH_ZERO_ON) & ~_MM_ROUND_MASK;"
        )?;
        writeln!(out, "\t_mm_setcsr(mxcsr);")?;
        Ok(())
    }

    fn write_cleanup(&mut self) -> Result<()> {
        writeln!(self.out, "#ifdef RAM")?;
        writeln!(self.out, "\t\t_mm_free((void*)mmu.buffer);")?;
        writeln!(self.out, "#endif")?;
        Ok(())
    }

    fn write_epilogue(&mut self) -> Result<()> {
        writeln!(self.out, "\t{END_LABEL}:")?;
        writeln!(self.out, "\t\tclockEnd = clock();")?;
        for i in 0..INT_REGISTER_COUNT.max(FLOAT_REGISTER_COUNT) {
            writeln!(
                self.out,
                "\t\tprintf(\"r{i} = %-20\" PRIu64 \" f{i} = %-24.17g (0x%016\" PRIx64 \")\\n\", r{i}, f{i}.f64, f{i}.u64);"
            )?;
        }
        writeln!(self.out, "\t\tuint64_t spadsum = 0;")?;
        writeln!(self.out, "\t\tfor(size_t i = 0; i < SCRATCHPAD_LENGTH; ++i) {{")?;
        writeln!(self.out, "\t\t\tspadsum += scratchpad[i].u64;")?;
        writeln!(self.out, "\t\t}}")?;
        writeln!(
            self.out,
            "\t\tprintf(\"scratchpad sum = %\" PRIu64 \"\\n\", spadsum);"
        )?;
        if self.config.report_runtime {
            writeln!(
                self.out,
                "\t\tprintf(\"runtime: %f\\n\", (clockEnd - clockStart) / (double)CLOCKS_PER_SEC);"
            )?;
        }
        self.write_cleanup()?;
        writeln!(self.out, "\t\treturn 0;")?;

        if self.config.stack_overflow == StackOverflowPolicy::Fault {
            writeln!(self.out, "\t{OVERFLOW_LABEL}:")?;
            writeln!(
                self.out,
                "\t\tfprintf(stderr, \"call stack overflow (sp = %\" PRIu64 \")\\n\", sp);"
            )?;
            self.write_cleanup()?;
            writeln!(self.out, "\t\treturn 2;")?;
        }
        writeln!(self.out, "}}")?;
        Ok(())
    }
}
