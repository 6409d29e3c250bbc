//! Jacs Disasm
//!
//! Decodes Jacs bytecode instruction by instruction and renders each one as a
//! readable expression tree.

pub mod utils;
pub mod opcodes;
pub mod numfmt;
pub mod varint;
pub mod cursor;
pub mod tree;
pub mod render;
pub mod resolver;
pub mod config;
pub mod disasm;

pub use config::{DiagnosticPolicy, DisasmConfig};
pub use cursor::{ByteSource, SliceCursor};
pub use disasm::{
    disassemble_function, disassemble_hex, stringify_instr, stringify_instr_limited, Decoded, FunctionDisassembly, Oops,
};
pub use numfmt::NumFmt;
pub use resolver::{DebugInfoResolver, InstrArgResolver};
