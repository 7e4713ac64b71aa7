//! Fixed text of the emitted program.
//!
//! Everything here is independent of the drawn instruction words: headers,
//! the convertible union, scratchpad window macros, the DRAM read primitive,
//! call stack macros and the AES fill used to initialize the scratchpad
//! (and the DRAM buffer when real memory content is requested).

use std::io::{self, Write};

use crate::common::constants::{
    CELL_SIZE, DRAM_BLOCK_MASK, DRAM_LATCH_OFFSET, DRAM_LCG_INCREMENT, DRAM_LCG_MULTIPLIER,
    DRAM_READ_STRIDE, SCRATCHPAD_SIZE,
};
use crate::config::GeneratorConfig;

const HEADERS: &str = "\
#include <stdint.h>
#include <inttypes.h>
#include <time.h>
#include <stdio.h>
#include <x86intrin.h>
#include <emmintrin.h>
#include <wmmintrin.h>
#include <math.h>
typedef uint32_t addr_t;
typedef unsigned __int128 uint128_t;
typedef __int128 int128_t;
typedef unsigned char byte;
typedef union {
\tdouble f64;
\tint64_t i64;
\tuint64_t u64;
\tint32_t i32;
\tuint32_t u32;
} convertible_t;
typedef union {
\tuint64_t value;
\tvoid* address;
} stack_entry_t;
typedef struct {
\taddr_t m0;
\taddr_t m1;
\taddr_t mx;
#ifdef RAM
\tconst char* buffer;
#endif
} mmu_t;
";

const STACK_MACROS: &str = "\
#define PUSH_VALUE(x) stack[sp++].value = x
#define PUSH_ADDRESS(x) stack[sp++].address = x
#define STACK_IS_EMPTY() (sp == 0)
#define POP_VALUE() stack[--sp].value
#define POP_ADDRESS() stack[--sp].address
";

const AES_FILL: &str = r"static inline __m128i sl_xor(__m128i tmp1) {
	__m128i tmp4;
	tmp4 = _mm_slli_si128(tmp1, 0x04);
	tmp1 = _mm_xor_si128(tmp1, tmp4);
	tmp4 = _mm_slli_si128(tmp4, 0x04);
	tmp1 = _mm_xor_si128(tmp1, tmp4);
	tmp4 = _mm_slli_si128(tmp4, 0x04);
	tmp1 = _mm_xor_si128(tmp1, tmp4);
	return tmp1;
}
#define AES_GENKEY_SUB(rcon) do { \
	__m128i xout1 = _mm_aeskeygenassist_si128(xout2, rcon); \
	xout1 = _mm_shuffle_epi32(xout1, 0xFF); \
	xout0 = sl_xor(xout0); \
	xout0 = _mm_xor_si128(xout0, xout1); \
	xout1 = _mm_aeskeygenassist_si128(xout0, 0x00); \
	xout1 = _mm_shuffle_epi32(xout1, 0xAA); \
	xout2 = sl_xor(xout2); \
	xout2 = _mm_xor_si128(xout2, xout1); } while(0)
static inline void aes_genkey(const __m128i* memory, __m128i k[10]) {
	__m128i xout0, xout2;
	xout0 = _mm_load_si128(memory);
	xout2 = _mm_load_si128(memory + 1);
	k[0] = xout0;
	k[1] = xout2;
	AES_GENKEY_SUB(0x01);
	k[2] = xout0;
	k[3] = xout2;
	AES_GENKEY_SUB(0x02);
	k[4] = xout0;
	k[5] = xout2;
	AES_GENKEY_SUB(0x04);
	k[6] = xout0;
	k[7] = xout2;
	AES_GENKEY_SUB(0x08);
	k[8] = xout0;
	k[9] = xout2;
}
static void aesInitialize(const __m128i* key, const __m128i* seed, __m128i* output, size_t count) {
	__m128i k[10];
	__m128i x[8];
	aes_genkey(key, k);
	for (int j = 0; j < 8; ++j)
		x[j] = _mm_load_si128(seed + j);
	for (size_t i = 0; i < count / sizeof(__m128i); i += 8) {
		for (int r = 0; r < 10; ++r)
			for (int j = 0; j < 8; ++j)
				x[j] = _mm_aesenc_si128(x[j], k[r]);
		for (int j = 0; j < 8; ++j)
			_mm_store_si128(output + i + j, x[j]);
	}
}
";

/// Writes the preamble: headers, types, memory macros, the DRAM read
/// primitive, stack macros and the AES fill routine.
///
/// # Errors
///
/// Propagates any error of the underlying writer.
pub fn write_preamble<W: Write>(out: &mut W, config: &GeneratorConfig) -> io::Result<()> {
    if config.uses_dram_buffer() {
        writeln!(out, "#define RAM")?;
    }
    out.write_all(HEADERS.as_bytes())?;
    write_memory_macros(out, config)?;
    out.write_all(STACK_MACROS.as_bytes())?;
    write_read_dram(out)?;
    out.write_all(AES_FILL.as_bytes())
}

fn write_memory_macros<W: Write>(out: &mut W, config: &GeneratorConfig) -> io::Result<()> {
    writeln!(out, "#define DRAM_SIZE (1ULL << 32)")?;
    writeln!(out, "#define SCRATCHPAD_SIZE ({SCRATCHPAD_SIZE})")?;
    writeln!(
        out,
        "#define SCRATCHPAD_LENGTH (SCRATCHPAD_SIZE / sizeof(convertible_t))"
    )?;
    writeln!(
        out,
        "#define SCRATCHPAD_MASK14 (16 * 1024 / sizeof(convertible_t) - 1)"
    )?;
    writeln!(out, "#define SCRATCHPAD_MASK18 (SCRATCHPAD_LENGTH - 1)")?;
    writeln!(
        out,
        "#define SCRATCHPAD_16K(x) scratchpad[(x) & SCRATCHPAD_MASK14]"
    )?;
    writeln!(
        out,
        "#define SCRATCHPAD_256K(x) scratchpad[(x) & SCRATCHPAD_MASK18]"
    )?;
    writeln!(out, "#define STACK_LENGTH ({})", config.stack_length)?;
    writeln!(out, "_Static_assert(sizeof(convertible_t) == {CELL_SIZE}, \"cell size\");")?;
    writeln!(out, "#ifdef RAM")?;
    writeln!(
        out,
        "#define DRAM_READ(mmu) (convertible_t)*(uint64_t*)((mmu)->buffer + (mmu)->m0)"
    )?;
    writeln!(
        out,
        "#define PREFETCH(mmu) _mm_prefetch(((mmu)->buffer + (mmu)->m1), _MM_HINT_T0)"
    )?;
    writeln!(out, "#else")?;
    writeln!(
        out,
        "#define DRAM_READ(mmu) (convertible_t)(uint64_t)__rolq({DRAM_LCG_MULTIPLIER}ULL*((mmu)->m0)+{DRAM_LCG_INCREMENT}ULL,32)"
    )?;
    writeln!(out, "#define PREFETCH(x)")?;
    writeln!(out, "#endif")
}

fn write_read_dram<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "static convertible_t readDram(mmu_t* mmu, addr_t addr) {{")?;
    writeln!(out, "\tconvertible_t data;")?;
    writeln!(out, "\tdata = DRAM_READ(mmu);")?;
    writeln!(out, "\tmmu->m0 += {DRAM_READ_STRIDE};")?;
    writeln!(out, "\tmmu->mx ^= addr;")?;
    writeln!(out, "\tif((mmu->m0 & 255) == {DRAM_LATCH_OFFSET}) {{")?;
    writeln!(out, "\t\tmmu->m1 = mmu->mx & {DRAM_BLOCK_MASK:#010X};")?;
    writeln!(out, "\t\tPREFETCH(mmu);")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tif((mmu->m0 & 255) == 0)")?;
    writeln!(out, "\t\tmmu->m0 = mmu->m1;")?;
    writeln!(out, "\treturn data;")?;
    writeln!(out, "}}")
}
