use std::env;
use std::fs;

use jacs_core::DebugInfo;
use jacs_disasm::{disassemble_hex, DisasmConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <BYTECODE_HEX> [DEBUG_INFO_JSON] [FUNCTION_INDEX]", args[0]);
        std::process::exit(1);
    }

    let debug_info = match args.get(2) {
        Some(path) => Some(DebugInfo::from_json(&fs::read_to_string(path)?)?),
        None => None,
    };
    let function = match args.get(3) {
        Some(idx) => idx.parse::<usize>()?,
        None => 0,
    };

    let config = match env::var("JACS_DISASM_CONFIG") {
        Ok(path) => DisasmConfig::from_json(&fs::read_to_string(path)?)?,
        Err(_) => DisasmConfig::default(),
    };

    let out = disassemble_hex(&args[1], debug_info.as_ref(), function, &config)?;
    print!("{}", out);
    info!(
        "{} instructions, {} diagnostics{}",
        out.instructions,
        out.diagnostics,
        if out.halted { " (halted)" } else { "" }
    );
    Ok(())
}
