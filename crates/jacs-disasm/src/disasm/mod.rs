use std::fmt;

use jacs_core::utils::{parse_hex, to_hex};
use jacs_core::DebugInfo;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{DiagnosticPolicy, DisasmConfig};
use crate::cursor::{ByteSource, SliceCursor};
use crate::render::Renderer;
use crate::resolver::{DebugInfoResolver, InstrArgResolver};
use crate::tree::{build_tree_limited, Built, MAX_TREE_DEPTH};

/// Line emitted for a zero padding byte.
pub const FILL_LINE: &str = "          .fill 0x00";

/// Reasons an instruction could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Oops {
    #[error("???oops stack underflow; {}", to_hex(.bytes))]
    StackUnderflow { bytes: Vec<u8> },
    #[error("???oops bad stack: {size}; {}", to_hex(.bytes))]
    BadStack { size: usize, bytes: Vec<u8> },
    #[error("???oops truncated; {}", to_hex(.bytes))]
    Truncated { bytes: Vec<u8> },
    #[error("???oops too deep; {}", to_hex(.bytes))]
    TooDeep { bytes: Vec<u8> },
}

impl Oops {
    /// Bytes consumed before the failure.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Oops::StackUnderflow { bytes }
            | Oops::BadStack { bytes, .. }
            | Oops::Truncated { bytes }
            | Oops::TooDeep { bytes } => bytes,
        }
    }
}

/// Result of decoding a single instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Line(String),
    Diagnostic(Oops),
}

impl Decoded {
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Decoded::Diagnostic(_))
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Line(line) => f.write_str(line),
            Decoded::Diagnostic(oops) => write!(f, "{}", oops),
        }
    }
}

/// Decodes the next instruction from `src` into one line of text.
///
/// Consumes exactly the bytes of the instruction. Malformed input produces a
/// [`Decoded::Diagnostic`]; the caller decides whether to keep going.
pub fn stringify_instr<S: ByteSource + ?Sized>(
    src: &mut S,
    resolver: Option<&dyn InstrArgResolver>,
) -> Decoded {
    stringify_instr_limited(src, resolver, MAX_TREE_DEPTH)
}

/// [`stringify_instr`] with an explicit limit on the tree nesting depth.
pub fn stringify_instr_limited<S: ByteSource + ?Sized>(
    src: &mut S,
    resolver: Option<&dyn InstrArgResolver>,
    max_depth: usize,
) -> Decoded {
    let pc = resolver.and_then(|r| r.resolver_pc());
    let instr = match build_tree_limited(src, pc, max_depth) {
        Ok(Built::Instr(instr)) => instr,
        Ok(Built::Fill) => return Decoded::Line(FILL_LINE.to_string()),
        Err(oops) => {
            debug!(pc = ?pc, "{}", oops);
            return Decoded::Diagnostic(oops);
        }
    };

    let renderer = Renderer::new(resolver, instr.jmp_base);
    let mut res = format!("    {} // {}", renderer.stringify_expr(instr.root), to_hex(&instr.bytes));
    if let Some(pc) = pc {
        res = format!("{:>4}: {}", pc, res);
    }
    trace!(len = instr.bytes.len(), "decoded instruction");
    Decoded::Line(res)
}

/// Text listing of one function body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDisassembly {
    pub name: Option<String>,
    pub lines: Vec<String>,
    pub instructions: usize,
    pub diagnostics: usize,
    /// Decoding stopped before the end of the body.
    pub halted: bool,
}

impl fmt::Display for FunctionDisassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "{}:", name)?;
        }
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Disassembles the body of function `function` instruction by instruction.
///
/// `info` enriches operands with names and source lines when present.
pub fn disassemble_function(
    code: &[u8],
    info: Option<&DebugInfo>,
    function: usize,
    config: &DisasmConfig,
) -> FunctionDisassembly {
    let empty = DebugInfo::default();
    let dbg = info.unwrap_or(&empty);
    let func_info = dbg.functions.get(function);
    let mut resolver = DebugInfoResolver::new(dbg).with_function(function);
    let mut out = FunctionDisassembly {
        name: func_info.map(|f| f.name.clone()),
        ..Default::default()
    };

    debug!(function, len = code.len(), "disassembling function");

    let mut cur = SliceCursor::new(code);
    let mut last_line = None;
    while !cur.is_at_end() {
        if out.instructions >= config.max_instructions {
            warn!(function, limit = config.max_instructions, "instruction limit reached");
            out.halted = true;
            break;
        }

        let pc = cur.position();
        if config.annotate_source {
            if let Some(line) = func_info.and_then(|f| f.line_at(pc)) {
                if last_line != Some(line) {
                    let text = dbg.source_line(line).unwrap_or("").trim();
                    out.lines.push(format!("// {}: {}", line, text));
                    last_line = Some(line);
                }
            }
        }

        resolver.set_pc(config.show_pc.then_some(pc as i64));
        let decoded = stringify_instr_limited(&mut cur, Some(&resolver), config.max_depth);
        out.instructions += 1;
        let failed = decoded.is_diagnostic();
        out.lines.push(decoded.to_string());

        if failed {
            out.diagnostics += 1;
            if config.on_diagnostic == DiagnosticPolicy::Halt {
                warn!(function, pc, "halting after decode diagnostic");
                out.halted = true;
                break;
            }
        }
    }

    debug!(
        function,
        instructions = out.instructions,
        diagnostics = out.diagnostics,
        "function disassembled"
    );
    out
}

/// Disassembles a function body given as hex text.
pub fn disassemble_hex(
    bytecode_hex: &str,
    info: Option<&DebugInfo>,
    function: usize,
    config: &DisasmConfig,
) -> jacs_core::Result<FunctionDisassembly> {
    let code = parse_hex(bytecode_hex)?;
    Ok(disassemble_function(&code, info, function, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::Op;

    #[test]
    fn test_oops_messages() {
        let oops = Oops::StackUnderflow { bytes: vec![0x33] };
        assert_eq!(oops.to_string(), "???oops stack underflow; 33");
        let oops = Oops::BadStack { size: 3, bytes: vec![0x2b, 0x2b, 0x1a] };
        assert_eq!(oops.to_string(), "???oops bad stack: 3; 2b 2b 1a");
        assert_eq!(oops.bytes(), &[0x2b, 0x2b, 0x1a]);
    }

    #[test]
    fn test_line_without_pc() {
        let code = [Op::Stmt0Debugger.byte()];
        let decoded = stringify_instr(&mut SliceCursor::new(&code), None);
        assert_eq!(decoded, Decoded::Line("    DEBUGGER // 1a".to_string()));
    }

    #[test]
    fn test_fill_line() {
        let decoded = stringify_instr(&mut SliceCursor::new(&[0]), None);
        assert_eq!(decoded.to_string(), FILL_LINE);
        assert!(!decoded.is_diagnostic());
    }

    #[test]
    fn test_function_halts_on_diagnostic() {
        let code = [Op::Expr2Add.byte(), Op::Stmt0Debugger.byte()];
        let cfg = DisasmConfig { on_diagnostic: DiagnosticPolicy::Halt, ..Default::default() };
        let out = disassemble_function(&code, None, 0, &cfg);
        assert!(out.halted);
        assert_eq!(out.lines, vec!["???oops stack underflow; 33".to_string()]);

        let out = disassemble_function(&code, None, 0, &DisasmConfig::default());
        assert!(!out.halted);
        assert_eq!(out.diagnostics, 1);
        assert_eq!(out.lines[1], "   1:     DEBUGGER // 1a");
    }

    #[test]
    fn test_function_depth_limit_from_config() {
        let code = [Op::Expr0True.byte(), Op::Expr1Not.byte(), Op::Stmt1Return.byte(), Op::Stmt0Debugger.byte()];
        let cfg = DisasmConfig { max_depth: 2, ..Default::default() };
        let out = disassemble_function(&code, None, 0, &cfg);
        assert_eq!(out.diagnostics, 1);
        assert_eq!(out.lines, vec!["???oops too deep; 2b 2e 0c".to_string(), "   3:     DEBUGGER // 1a".to_string()]);
    }

    #[test]
    fn test_instruction_limit() {
        let code = [Op::Stmt0Debugger.byte(); 4];
        let cfg = DisasmConfig { max_instructions: 2, ..Default::default() };
        let out = disassemble_function(&code, None, 0, &cfg);
        assert_eq!(out.instructions, 2);
        assert!(out.halted);
    }
}
