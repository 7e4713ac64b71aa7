//! Per-family block emission.
//!
//! Every slot becomes one labeled C block:
//!
//! ```text
//! i_N: { //<disassembly>
//!     if(0 == ic--) goto end;
//!     rA ^= addr0;
//!     addr_t addr = rA;
//!     <family body>
//! }
//! ```
//!
//! The body declares `A` (and `B` where the family takes one) with the
//! family's operand types and stores the result through the destination
//! lvalue. CALL and RET add the call stack protocol on top.

use std::io::{self, Write};

use super::resolver::{ADDRESS_LOCAL, branch_condition, destination, operand_a, operand_b};
use crate::config::{GeneratorConfig, StackOverflowPolicy};
use crate::isa::disasm::disassemble;
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::Family;
use crate::isa::operand::OperandType;

/// Label of the termination block.
pub const END_LABEL: &str = "end";

/// Label of the stack overflow handler (only with [`StackOverflowPolicy::Fault`]).
pub const OVERFLOW_LABEL: &str = "overflow";

/// Label of slot `index`.
pub fn slot_label(index: usize) -> String {
    format!("i_{index}")
}

/// Writes the complete block of slot `index`.
///
/// # Errors
///
/// Propagates any error of the underlying writer.
pub fn write_block<W: Write>(
    out: &mut W,
    index: usize,
    inst: &Decoded,
    config: &GeneratorConfig,
) -> io::Result<()> {
    let family = Family::from_opcode(inst.opcode);
    write_header(out, index, inst)?;
    match family {
        Family::Add64 | Family::Add32 | Family::Fadd => write_binary(out, inst, family, "+"),
        Family::Sub64 | Family::Sub32 | Family::Fsub => write_binary(out, inst, family, "-"),
        Family::Mul64 | Family::Fmul => write_binary(out, inst, family, "*"),
        Family::Fdiv => write_binary(out, inst, family, "/"),
        Family::And64 | Family::And32 => write_binary(out, inst, family, "&"),
        Family::Or64 | Family::Or32 => write_binary(out, inst, family, "|"),
        Family::Xor64 | Family::Xor32 => write_binary(out, inst, family, "^"),
        Family::Shl64 => write_binary(out, inst, family, "<<"),
        Family::Shr64 | Family::Sar64 => write_binary(out, inst, family, ">>"),
        Family::Mulh64 => write_expr(out, inst, family, "((uint128_t)A * B) >> 64"),
        Family::Imulh64 => write_expr(out, inst, family, "((int128_t)A * B) >> 64"),
        Family::Mul32 => write_expr(out, inst, family, "(uint64_t)A * B"),
        Family::Imul32 => write_expr(out, inst, family, "(int64_t)A * B"),
        Family::Rol64 => write_expr(out, inst, family, "__rolq(A, B)"),
        Family::Ror64 => write_expr(out, inst, family, "__rorq(A, B)"),
        Family::Div64 | Family::Idiv64 => write_division(out, inst, family),
        Family::Fsqrt => write_fsqrt(out, inst),
        Family::Fround => write_fround(out, inst),
        Family::Call => write_call(out, index, inst, config),
        Family::Ret => write_ret(out, inst),
    }
}

fn write_header<W: Write>(out: &mut W, index: usize, inst: &Decoded) -> io::Result<()> {
    writeln!(out, "\t{}: {{ //{}", slot_label(index), disassemble(inst))?;
    writeln!(out, "\t\tif(0 == ic--) goto {END_LABEL};")?;
    writeln!(out, "\t\tr{} ^= {}U;", inst.reg_a, inst.addr0)?;
    writeln!(out, "\t\taddr_t {ADDRESS_LOCAL} = r{};", inst.reg_a)
}

fn write_a<W: Write>(out: &mut W, inst: &Decoded, ty: OperandType) -> io::Result<()> {
    writeln!(out, "\t\t{} A = {};", ty.declare(), operand_a(inst, ty))
}

fn write_b<W: Write>(out: &mut W, inst: &Decoded, ty: OperandType) -> io::Result<()> {
    writeln!(out, "\t\t{} B = {};", ty.declare(), operand_b(inst, ty))
}

fn write_operands<W: Write>(out: &mut W, inst: &Decoded, family: Family) -> io::Result<()> {
    let sig = family.signature();
    write_a(out, inst, sig.a)?;
    if let Some(b) = sig.b {
        write_b(out, inst, b)?;
    }
    Ok(())
}

fn write_binary<W: Write>(
    out: &mut W,
    inst: &Decoded,
    family: Family,
    op: &str,
) -> io::Result<()> {
    write_expr(out, inst, family, &format!("A {op} B"))
}

fn write_expr<W: Write>(out: &mut W, inst: &Decoded, family: Family, expr: &str) -> io::Result<()> {
    write_operands(out, inst, family)?;
    let c = family.signature().c;
    writeln!(out, "\t\t{} = {expr}; }}", destination(inst, c))
}

// A zero divisor is coerced, but IDIV of INT64_MIN by -1 still raises
// SIGFPE in the emitted program; the model wraps to INT64_MIN instead.
fn write_division<W: Write>(out: &mut W, inst: &Decoded, family: Family) -> io::Result<()> {
    write_operands(out, inst, family)?;
    writeln!(out, "\t\tif(B == 0) B = 1;")?;
    let c = family.signature().c;
    writeln!(out, "\t\t{} = A / B; }}", destination(inst, c))
}

fn write_fsqrt<W: Write>(out: &mut W, inst: &Decoded) -> io::Result<()> {
    let ty = OperandType::Float;
    writeln!(out, "\t\tdouble A = fabs({});", operand_a(inst, ty))?;
    writeln!(
        out,
        "\t\t{} = _mm_cvtsd_f64(_mm_sqrt_sd(_mm_setzero_pd(), _mm_set_sd(A))); }}",
        destination(inst, ty)
    )
}

fn write_fround<W: Write>(out: &mut W, inst: &Decoded) -> io::Result<()> {
    write_a(out, inst, OperandType::Int64)?;
    writeln!(out, "\t\t{} = A;", destination(inst, OperandType::Float))?;
    writeln!(
        out,
        "\t\t_mm_setcsr(mxcsr | (((uint32_t)A << 13) & _MM_ROUND_MASK)); }}"
    )
}

fn write_push<W: Write>(
    out: &mut W,
    index: usize,
    inst: &Decoded,
    config: &GeneratorConfig,
) -> io::Result<()> {
    if config.stack_overflow == StackOverflowPolicy::Fault {
        writeln!(out, "\t\t\tif(sp + 2 > STACK_LENGTH) goto {OVERFLOW_LABEL};")?;
    }
    writeln!(out, "\t\t\tPUSH_VALUE(A);")?;
    writeln!(
        out,
        "\t\t\tPUSH_ADDRESS(&&{});",
        slot_label(config.next_slot(index))
    )?;
    writeln!(
        out,
        "\t\t\tgoto {};",
        slot_label(config.call_target(index, inst.imm0))
    )
}

fn write_call<W: Write>(
    out: &mut W,
    index: usize,
    inst: &Decoded,
    config: &GeneratorConfig,
) -> io::Result<()> {
    let ty = OperandType::Uint64;
    write_a(out, inst, ty)?;
    match branch_condition(inst) {
        Some(cond) => {
            writeln!(out, "\t\tif({cond}) {{")?;
            write_push(out, index, inst, config)?;
            writeln!(out, "\t\t}}")?;
            writeln!(out, "\t\t{} = A; }}", destination(inst, ty))
        }
        None => {
            write_push(out, index, inst, config)?;
            writeln!(out, "\t\t}}")
        }
    }
}

fn write_ret<W: Write>(out: &mut W, inst: &Decoded) -> io::Result<()> {
    let ty = OperandType::Uint64;
    let dst = destination(inst, ty);
    write_a(out, inst, ty)?;
    match branch_condition(inst) {
        Some(cond) => writeln!(out, "\t\tif(!STACK_IS_EMPTY() && {cond}) {{")?,
        None => writeln!(out, "\t\tif(!STACK_IS_EMPTY()) {{")?,
    }
    writeln!(out, "\t\t\tvoid* target = POP_ADDRESS();")?;
    writeln!(out, "\t\t\tuint64_t C = POP_VALUE();")?;
    writeln!(out, "\t\t\t{dst} = A ^ C;")?;
    writeln!(out, "\t\t\tgoto *target;")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t\t{dst} = A; }}")
}
