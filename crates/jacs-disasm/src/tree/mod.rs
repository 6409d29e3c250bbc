use std::collections::VecDeque;

use crate::cursor::{ByteSource, Recorder};
use crate::disasm::Oops;
use crate::opcodes::{op_is_stmt, op_num_real_args, op_takes_number};
use crate::varint::decode_int;

/// Expression tree reconstructed from one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpTree {
    pub opcode: u8,
    /// Inline number; rendered by the first placeholder, then cleared.
    pub arg: Option<i64>,
    /// Operands in their original left-to-right order.
    pub args: VecDeque<OpTree>,
}

impl OpTree {
    pub fn new(opcode: u8) -> Self {
        Self { opcode, arg: None, args: VecDeque::new() }
    }
}

/// A successfully rebuilt instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInstr {
    pub root: OpTree,
    /// PC the jump offsets of this instruction are relative to.
    pub jmp_base: Option<i64>,
    /// Every byte consumed for the instruction.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Built {
    /// Zero padding byte.
    Fill,
    Instr(BuiltInstr),
}

/// Default limit on the nesting depth of one instruction's tree.
pub const MAX_TREE_DEPTH: usize = 128;

/// Reads one instruction from `src` and rebuilds its tree.
///
/// `pc` is the program counter of the first byte, when known.
pub fn build_tree<S: ByteSource + ?Sized>(src: &mut S, pc: Option<i64>) -> Result<Built, Oops> {
    build_tree_limited(src, pc, MAX_TREE_DEPTH)
}

/// Like [`build_tree`], failing with [`Oops::TooDeep`] once a node would sit
/// more than `max_depth` levels above its leaves.
pub fn build_tree_limited<S: ByteSource + ?Sized>(
    src: &mut S,
    pc: Option<i64>,
    max_depth: usize,
) -> Result<Built, Oops> {
    let mut rec = Recorder::new(src);
    let mut stack: Vec<OpTree> = Vec::new();
    // depth of each node in `stack`, leaves are 1
    let mut depths: Vec<usize> = Vec::new();
    let mut jmp_base = None;

    loop {
        let op = match rec.next_byte() {
            Some(op) => op,
            None => return Err(Oops::Truncated { bytes: rec.into_bytes() }),
        };
        if op == 0 && rec.bytes().len() == 1 {
            return Ok(Built::Fill);
        }

        let mut node = OpTree::new(op);
        if op_takes_number(op) {
            let op_offset = rec.bytes().len() as i64 - 1;
            jmp_base = pc.map(|pc| pc + op_offset);
            match decode_int(&mut rec) {
                Some(v) => node.arg = Some(v),
                None => return Err(Oops::Truncated { bytes: rec.into_bytes() }),
            }
        }

        let n = op_num_real_args(op);
        let mut depth = 1;
        if n > 0 {
            if stack.len() < n {
                return Err(Oops::StackUnderflow { bytes: rec.into_bytes() });
            }
            node.args = stack.split_off(stack.len() - n).into();
            depth += depths.split_off(depths.len() - n).into_iter().max().unwrap_or(0);
        }
        if depth > max_depth {
            return Err(Oops::TooDeep { bytes: rec.into_bytes() });
        }
        stack.push(node);
        depths.push(depth);

        if op_is_stmt(op) {
            break;
        }
    }

    if stack.len() != 1 {
        return Err(Oops::BadStack { size: stack.len(), bytes: rec.into_bytes() });
    }
    match stack.pop() {
        Some(root) => Ok(Built::Instr(BuiltInstr { root, jmp_base, bytes: rec.into_bytes() })),
        None => Err(Oops::BadStack { size: 0, bytes: rec.into_bytes() }),
    }
}
