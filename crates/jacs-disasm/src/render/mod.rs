//! Template expansion for rebuilt instruction trees.
//!
//! Templates are literal text with `%x` placeholders. Each placeholder takes
//! the node's inline number if it is still unused, otherwise the next operand
//! rendered recursively. The letter then selects the transformation:
//!
//! - `e` verbatim
//! - `n` numeric format mnemonic
//! - `o` call mode suffix
//! - `j` jump offset
//! - anything else: `_<letter><value>`, prefixed by the resolver's name for it

use crate::opcodes::{direct_const_value, is_direct_const, op_print_fmt, OpCall};
use crate::numfmt::numfmt_mnemonic;
use crate::resolver::InstrArgResolver;
use crate::tree::OpTree;
use crate::utils::{is_number, signed};

/// Placeholder text used when an operand is missing.
pub const MISSING_OPERAND: &str = "???oops";

/// Rendering context for one instruction.
pub struct Renderer<'r> {
    resolver: Option<&'r dyn InstrArgResolver>,
    jmp_base: Option<i64>,
}

impl<'r> Renderer<'r> {
    pub fn new(resolver: Option<&'r dyn InstrArgResolver>, jmp_base: Option<i64>) -> Self {
        Self { resolver, jmp_base }
    }

    pub fn stringify_expr(&self, t: OpTree) -> String {
        let op = t.opcode;
        if is_direct_const(op) {
            return direct_const_value(op).to_string();
        }
        match op_print_fmt(op) {
            Some(fmt) => self.expand_fmt(fmt, t),
            None => format!("???oops op{}", op),
        }
    }

    pub fn expand_fmt(&self, fmt: &str, mut t: OpTree) -> String {
        let mut r = String::with_capacity(fmt.len());
        let mut chars = fmt.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                r.push(c);
                continue;
            }
            let ff = match chars.next() {
                Some(ff) => ff,
                None => {
                    r.push('%');
                    break;
                }
            };

            let (e, e_num) = match t.arg.take() {
                Some(v) => (v.to_string(), Some(v)),
                None => match t.args.pop_front() {
                    Some(child) => {
                        let e = self.stringify_expr(child);
                        let e_num = if is_number(&e) { e.parse::<i64>().ok() } else { None };
                        (e, e_num)
                    }
                    None => (MISSING_OPERAND.to_string(), None),
                },
            };

            let e = match ff {
                'e' => e,
                'n' => numfmt_mnemonic(&e),
                'o' => callop(&e),
                'j' => self.jmp_offset(e_num, e),
                _ => self.cell_ref(ff, e_num, e),
            };
            r.push_str(&e);
        }
        r
    }

    fn jmp_offset(&self, off: Option<i64>, text: String) -> String {
        let off = match off {
            Some(off) => off,
            None => return text,
        };
        let offs = signed(off);
        match self.jmp_base {
            Some(base) => format!("{} ({})", base + off, offs),
            None => offs,
        }
    }

    fn cell_ref(&self, ff: char, num: Option<i64>, text: String) -> String {
        let e = format!("_{}{}", ff, text);
        match (num, self.resolver) {
            (Some(num), Some(resolver)) => match resolver.describe_cell(ff, num) {
                Some(pref) if !pref.is_empty() => pref + &e,
                _ => e,
            },
            _ => e,
        }
    }
}

/// Suffix for a call mode operand.
pub fn callop(op: &str) -> String {
    if is_number(op) {
        match op.parse::<i64>() {
            Ok(OpCall::SYNC) => return String::new(),
            Ok(OpCall::BG) => return " bg".to_string(),
            Ok(OpCall::BG_MAX1) => return " bg (max1)".to_string(),
            Ok(OpCall::BG_MAX1_PEND1) => return " bg (max1 pend1)".to_string(),
            _ => {}
        }
    }
    format!(" callop={}", op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::Op;
    use std::collections::VecDeque;

    struct Names;

    impl InstrArgResolver for Names {
        fn describe_cell(&self, fmt: char, idx: i64) -> Option<String> {
            match (fmt, idx) {
                ('l', 0) => Some("x".into()),
                ('g', 2) => Some(String::new()),
                _ => None,
            }
        }
    }

    fn leaf(op: Op, arg: Option<i64>) -> OpTree {
        OpTree { opcode: op.byte(), arg, args: VecDeque::new() }
    }

    fn node(op: Op, args: Vec<OpTree>) -> OpTree {
        OpTree { opcode: op.byte(), arg: None, args: args.into() }
    }

    fn konst(v: i32) -> OpTree {
        OpTree::new(crate::opcodes::direct_const_op(v).unwrap())
    }

    #[test]
    fn test_expression_nesting() {
        let r = Renderer::new(None, None);
        let t = node(Op::Expr2Add, vec![leaf(Op::ExprxLoadLocal, Some(0)), konst(5)]);
        assert_eq!(r.stringify_expr(t), "(_l0 + 5)");
    }

    #[test]
    fn test_resolver_names_cells() {
        let names = Names;
        let r = Renderer::new(Some(&names), None);
        assert_eq!(r.stringify_expr(leaf(Op::ExprxLoadLocal, Some(0))), "x_l0");
        assert_eq!(r.stringify_expr(leaf(Op::ExprxLoadGlobal, Some(2))), "_g2");
        assert_eq!(r.stringify_expr(leaf(Op::ExprxLoadLocal, Some(1))), "_l1");
    }

    #[test]
    fn test_inline_number_used_once() {
        let r = Renderer::new(None, None);
        let t = OpTree {
            opcode: Op::Stmtx1StoreLocal.byte(),
            arg: Some(3),
            args: vec![konst(7)].into(),
        };
        assert_eq!(r.stringify_expr(t), "_l3 := 7");
    }

    #[test]
    fn test_jump_offsets() {
        let t = leaf(Op::StmtxJmp, Some(-10));
        assert_eq!(Renderer::new(None, Some(100)).stringify_expr(t.clone()), "JMP 90 (-10)");
        assert_eq!(Renderer::new(None, None).stringify_expr(t), "JMP -10");
        let fwd = leaf(Op::StmtxJmp, Some(12));
        assert_eq!(Renderer::new(None, None).stringify_expr(fwd), "JMP +12");
    }

    #[test]
    fn test_numfmt_operand() {
        let r = Renderer::new(None, None);
        let t = node(
            Op::Expr3LoadBuffer,
            vec![leaf(Op::ExprxLoadGlobal, Some(0)), konst(4), konst(10)],
        );
        assert_eq!(r.stringify_expr(t), "_g0[4 @ f32]");
    }

    #[test]
    fn test_call_modes() {
        assert_eq!(callop("0"), "");
        assert_eq!(callop("1"), " bg");
        assert_eq!(callop("2"), " bg (max1)");
        assert_eq!(callop("3"), " bg (max1 pend1)");
        assert_eq!(callop("9"), " callop=9");
        assert_eq!(callop("_l1"), " callop=_l1");
    }

    #[test]
    fn test_missing_operand_and_unknown_opcode() {
        let r = Renderer::new(None, None);
        assert_eq!(r.stringify_expr(node(Op::Expr2Add, vec![konst(1)])), "(1 + ???oops)");
        assert_eq!(r.stringify_expr(OpTree::new(0x70)), "???oops op112");
        assert_eq!(r.stringify_expr(OpTree::new(0)), "???oops op0");
    }

    #[test]
    fn test_template_edge_cases() {
        let r = Renderer::new(None, None);
        assert_eq!(r.expand_fmt("100%", OpTree::new(0)), "100%");
        assert_eq!(r.expand_fmt("plain", OpTree::new(0)), "plain");
    }
}
