//! Opcode tables shared with the code generator.
//!
//! Every opcode below `OP_PAST_LAST` has a packed property byte, a result
//! object type and a print template. Bytes at or above
//! [`BinFmt::DIRECT_CONST_OP`] encode small integer constants directly.

use serde::{Deserialize, Serialize};

/// Bit layout of the per-opcode property byte.
pub struct BytecodeFlag;

impl BytecodeFlag {
    pub const NUM_ARGS_MASK: u8 = 0x0f;
    pub const IS_STMT: u8 = 0x10;
    pub const TAKES_NUMBER: u8 = 0x20;
    pub const IS_STATELESS: u8 = 0x40;
}

/// Binary format constants.
pub struct BinFmt;

impl BinFmt {
    pub const DIRECT_CONST_OP: u8 = 0x80;
    pub const DIRECT_CONST_OFFSET: i32 = 16;
}

/// Call modes passed to background-capable calls.
pub struct OpCall;

impl OpCall {
    pub const SYNC: i64 = 0;
    pub const BG: i64 = 1;
    pub const BG_MAX1: i64 = 2;
    pub const BG_MAX1_PEND1: i64 = 3;
}

/// Type of the value produced by an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObjectType {
    Undefined = 0,
    Number = 1,
    Map = 2,
    Array = 3,
    Buffer = 4,
    Role = 5,
    Bool = 6,
    Fiber = 7,
    Function = 8,
    String = 9,
    Any = 10,
    Void = 11,
    Null = 12,
}

/// Opcodes of the instruction set.
///
/// The digit after `STMT`/`EXPR` in the names is the number of stack operands;
/// an `x` means the opcode is followed by an inline number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    Invalid = 0,
    Stmt1Call0 = 1,
    Stmt2Call1 = 2,
    Stmt3Call2 = 3,
    Stmt4Call3 = 4,
    Stmt5Call4 = 5,
    Stmt6Call5 = 6,
    Stmt7Call6 = 7,
    Stmt8Call7 = 8,
    Stmt9Call8 = 9,
    Stmt2SendCmd = 10,
    Stmt4QueryReg = 11,
    Stmt1Return = 12,
    StmtxJmp = 13,
    Stmtx1JmpZ = 14,
    Stmt1Panic = 15,
    Stmtx1CallBg = 16,
    Stmtx1StoreLocal = 17,
    Stmtx1StoreGlobal = 18,
    Stmt4StoreBuffer = 19,
    Stmt1WaitRole = 20,
    Stmt1SleepMs = 21,
    Stmt1TerminateFiber = 22,
    Stmt1SetupBuffer = 23,
    Stmt2IndexDelete = 24,
    Stmt3IndexSet = 25,
    Stmt0Debugger = 26,
    ExprxLoadLocal = 27,
    ExprxLoadGlobal = 28,
    ExprxLoadParam = 29,
    ExprxLiteral = 30,
    ExprxLiteralF64 = 31,
    ExprxStaticString = 32,
    ExprxStaticRole = 33,
    ExprxStaticFunction = 34,
    Expr3LoadBuffer = 35,
    Expr2Index = 36,
    Expr0RetVal = 37,
    Expr0NowMs = 38,
    Expr0Nan = 39,
    Expr0Inf = 40,
    Expr0Null = 41,
    Expr0False = 42,
    Expr0True = 43,
    Expr1RoleIsConnected = 44,
    Expr1GetFiberHandle = 45,
    Expr1Not = 46,
    Expr1Neg = 47,
    Expr1Abs = 48,
    Expr1IsNan = 49,
    Expr1BitNot = 50,
    Expr2Add = 51,
    Expr2Sub = 52,
    Expr2Mul = 53,
    Expr2Div = 54,
    Expr2Pow = 55,
    Expr2BitAnd = 56,
    Expr2BitOr = 57,
    Expr2BitXor = 58,
    Expr2ShiftLeft = 59,
    Expr2ShiftRight = 60,
    Expr2ShiftRightUnsigned = 61,
    Expr2Eq = 62,
    Expr2Le = 63,
    Expr2Lt = 64,
    Expr2Ne = 65,
}

/// One past the highest table-driven opcode.
pub const OP_PAST_LAST: usize = 66;

impl Op {
    /// All opcodes, indexed by their byte value.
    pub const ALL: [Op; OP_PAST_LAST] = [
        Op::Invalid,
        Op::Stmt1Call0,
        Op::Stmt2Call1,
        Op::Stmt3Call2,
        Op::Stmt4Call3,
        Op::Stmt5Call4,
        Op::Stmt6Call5,
        Op::Stmt7Call6,
        Op::Stmt8Call7,
        Op::Stmt9Call8,
        Op::Stmt2SendCmd,
        Op::Stmt4QueryReg,
        Op::Stmt1Return,
        Op::StmtxJmp,
        Op::Stmtx1JmpZ,
        Op::Stmt1Panic,
        Op::Stmtx1CallBg,
        Op::Stmtx1StoreLocal,
        Op::Stmtx1StoreGlobal,
        Op::Stmt4StoreBuffer,
        Op::Stmt1WaitRole,
        Op::Stmt1SleepMs,
        Op::Stmt1TerminateFiber,
        Op::Stmt1SetupBuffer,
        Op::Stmt2IndexDelete,
        Op::Stmt3IndexSet,
        Op::Stmt0Debugger,
        Op::ExprxLoadLocal,
        Op::ExprxLoadGlobal,
        Op::ExprxLoadParam,
        Op::ExprxLiteral,
        Op::ExprxLiteralF64,
        Op::ExprxStaticString,
        Op::ExprxStaticRole,
        Op::ExprxStaticFunction,
        Op::Expr3LoadBuffer,
        Op::Expr2Index,
        Op::Expr0RetVal,
        Op::Expr0NowMs,
        Op::Expr0Nan,
        Op::Expr0Inf,
        Op::Expr0Null,
        Op::Expr0False,
        Op::Expr0True,
        Op::Expr1RoleIsConnected,
        Op::Expr1GetFiberHandle,
        Op::Expr1Not,
        Op::Expr1Neg,
        Op::Expr1Abs,
        Op::Expr1IsNan,
        Op::Expr1BitNot,
        Op::Expr2Add,
        Op::Expr2Sub,
        Op::Expr2Mul,
        Op::Expr2Div,
        Op::Expr2Pow,
        Op::Expr2BitAnd,
        Op::Expr2BitOr,
        Op::Expr2BitXor,
        Op::Expr2ShiftLeft,
        Op::Expr2ShiftRight,
        Op::Expr2ShiftRightUnsigned,
        Op::Expr2Eq,
        Op::Expr2Le,
        Op::Expr2Lt,
        Op::Expr2Ne,
    ];

    /// Returns the opcode byte value.
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Parses an opcode from its byte value.
    pub fn from_byte(b: u8) -> Option<Self> {
        Self::ALL.get(b as usize).copied()
    }
}

/// Static facts about one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub props: u8,
    pub ty: ObjectType,
    pub fmt: &'static str,
}

const S: u8 = BytecodeFlag::IS_STMT;
const N: u8 = BytecodeFlag::TAKES_NUMBER;
const L: u8 = BytecodeFlag::IS_STATELESS;

const fn op(props: u8, ty: ObjectType, fmt: &'static str) -> OpInfo {
    OpInfo { props, ty, fmt }
}

const NONE: OpInfo = op(0, ObjectType::Undefined, "");

/// Dense opcode table, indexed by opcode byte.
pub static OP_TABLE: [OpInfo; OP_PAST_LAST] = [
    NONE,
    op(S | 1, ObjectType::Void, "CALL %e()"),
    op(S | 2, ObjectType::Void, "CALL %e(%e)"),
    op(S | 3, ObjectType::Void, "CALL %e(%e, %e)"),
    op(S | 4, ObjectType::Void, "CALL %e(%e, %e, %e)"),
    op(S | 5, ObjectType::Void, "CALL %e(%e, %e, %e, %e)"),
    op(S | 6, ObjectType::Void, "CALL %e(%e, %e, %e, %e, %e)"),
    op(S | 7, ObjectType::Void, "CALL %e(%e, %e, %e, %e, %e, %e)"),
    op(S | 8, ObjectType::Void, "CALL %e(%e, %e, %e, %e, %e, %e, %e)"),
    op(S | 9, ObjectType::Void, "CALL %e(%e, %e, %e, %e, %e, %e, %e, %e)"),
    op(S | 2, ObjectType::Void, "SEND_CMD(%e, %e)"),
    op(S | 4, ObjectType::Void, "QUERY_REG(%e, %e, timeout=%e, %e)"),
    op(S | 1, ObjectType::Void, "RETURN %e"),
    op(S | N, ObjectType::Void, "JMP %j"),
    op(S | N | 1, ObjectType::Void, "JMP %j IF NOT %e"),
    op(S | 1, ObjectType::Void, "PANIC %e"),
    op(S | N | 1, ObjectType::Void, "CALL %F()%o"),
    op(S | N | 1, ObjectType::Void, "%l := %e"),
    op(S | N | 1, ObjectType::Void, "%g := %e"),
    op(S | 4, ObjectType::Void, "%e[%e @ %n] := %e"),
    op(S | 1, ObjectType::Void, "WAIT_ROLE %e"),
    op(S | 1, ObjectType::Void, "SLEEP_MS %e"),
    op(S | 1, ObjectType::Void, "TERMINATE_FIBER %e"),
    op(S | 1, ObjectType::Void, "SETUP_BUFFER(size=%e)"),
    op(S | 2, ObjectType::Void, "delete %e[%e]"),
    op(S | 3, ObjectType::Void, "%e[%e] := %e"),
    op(S, ObjectType::Void, "DEBUGGER"),
    op(N, ObjectType::Any, "%l"),
    op(N, ObjectType::Any, "%g"),
    op(N, ObjectType::Any, "%p"),
    op(N | L, ObjectType::Number, "%e"),
    op(N | L, ObjectType::Number, "%D"),
    op(N | L, ObjectType::String, "%S"),
    op(N | L, ObjectType::Role, "%R"),
    op(N | L, ObjectType::Function, "%F"),
    op(3, ObjectType::Number, "%e[%e @ %n]"),
    op(2, ObjectType::Any, "%e[%e]"),
    op(0, ObjectType::Any, "RET_VAL"),
    op(0, ObjectType::Number, "NOW_MS"),
    op(L, ObjectType::Number, "NAN"),
    op(L, ObjectType::Number, "INF"),
    op(L, ObjectType::Null, "NULL"),
    op(L, ObjectType::Bool, "FALSE"),
    op(L, ObjectType::Bool, "TRUE"),
    op(1, ObjectType::Bool, "ROLE_IS_CONNECTED(%e)"),
    op(1, ObjectType::Fiber, "GET_FIBER_HANDLE(%e)"),
    op(L | 1, ObjectType::Bool, "!%e"),
    op(L | 1, ObjectType::Number, "-%e"),
    op(L | 1, ObjectType::Number, "abs(%e)"),
    op(L | 1, ObjectType::Bool, "isNaN(%e)"),
    op(L | 1, ObjectType::Number, "~%e"),
    op(L | 2, ObjectType::Number, "(%e + %e)"),
    op(L | 2, ObjectType::Number, "(%e - %e)"),
    op(L | 2, ObjectType::Number, "(%e * %e)"),
    op(L | 2, ObjectType::Number, "(%e / %e)"),
    op(L | 2, ObjectType::Number, "(%e ** %e)"),
    op(L | 2, ObjectType::Number, "(%e & %e)"),
    op(L | 2, ObjectType::Number, "(%e | %e)"),
    op(L | 2, ObjectType::Number, "(%e ^ %e)"),
    op(L | 2, ObjectType::Number, "(%e << %e)"),
    op(L | 2, ObjectType::Number, "(%e >> %e)"),
    op(L | 2, ObjectType::Number, "(%e >>> %e)"),
    op(L | 2, ObjectType::Bool, "(%e == %e)"),
    op(L | 2, ObjectType::Bool, "(%e <= %e)"),
    op(L | 2, ObjectType::Bool, "(%e < %e)"),
    op(L | 2, ObjectType::Bool, "(%e != %e)"),
];

fn info(op: u8) -> &'static OpInfo {
    OP_TABLE.get(op as usize).unwrap_or(&NONE)
}

fn props(op: u8) -> u8 {
    info(op).props
}

/// Whether the opcode is followed by an inline varint.
pub fn op_takes_number(op: u8) -> bool {
    props(op) & BytecodeFlag::TAKES_NUMBER != 0
}

/// Number of operands popped from the stack.
pub fn op_num_real_args(op: u8) -> usize {
    (props(op) & BytecodeFlag::NUM_ARGS_MASK) as usize
}

/// Number of positional arguments in rendering order; the inline number comes first.
pub fn op_num_args(op: u8) -> usize {
    op_num_real_args(op) + usize::from(op_takes_number(op))
}

pub fn op_is_stmt(op: u8) -> bool {
    props(op) & BytecodeFlag::IS_STMT != 0
}

pub fn expr_is_stateful(op: u8) -> bool {
    props(op) & BytecodeFlag::IS_STATELESS == 0
}

pub fn op_type(op: u8) -> ObjectType {
    info(op).ty
}

/// Print template of the opcode, `None` for unknown opcodes.
pub fn op_print_fmt(op: u8) -> Option<&'static str> {
    let fmt = info(op).fmt;
    (!fmt.is_empty()).then_some(fmt)
}

/// Whether the byte encodes its value directly.
pub fn is_direct_const(op: u8) -> bool {
    op >= BinFmt::DIRECT_CONST_OP
}

/// Value of a direct-constant opcode.
pub fn direct_const_value(op: u8) -> i32 {
    i32::from(op) - i32::from(BinFmt::DIRECT_CONST_OP) - BinFmt::DIRECT_CONST_OFFSET
}

/// Opcode byte encoding `value` directly, if it is in range.
pub fn direct_const_op(value: i32) -> Option<u8> {
    let raw = value + i32::from(BinFmt::DIRECT_CONST_OP) + BinFmt::DIRECT_CONST_OFFSET;
    u8::try_from(raw)
        .ok()
        .filter(|b| *b >= BinFmt::DIRECT_CONST_OP)
}
