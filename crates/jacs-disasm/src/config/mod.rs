use serde::{Deserialize, Serialize};

use crate::tree::MAX_TREE_DEPTH;

/// What to do after an instruction fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPolicy {
    /// Keep decoding at the byte following the failed instruction
    Continue,
    /// Stop the function after the first diagnostic line
    Halt,
}

/// Configuration for function disassembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasmConfig {
    /// Supply instruction PCs to the resolver (PC labels and absolute jump targets)
    pub show_pc: bool,
    /// Emit a comment with the source text whenever the source line changes
    pub annotate_source: bool,
    /// Behavior after a diagnostic line
    pub on_diagnostic: DiagnosticPolicy,
    /// Maximum number of instructions decoded per function
    pub max_instructions: usize,
    /// Maximum nesting depth of a single instruction's tree
    pub max_depth: usize,
}

impl Default for DisasmConfig {
    fn default() -> Self {
        Self {
            show_pc: true,
            annotate_source: true,
            on_diagnostic: DiagnosticPolicy::Continue,
            max_instructions: 64 * 1024,
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

impl DisasmConfig {
    /// Loads a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> jacs_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = DisasmConfig::from_json(r#"{ "on_diagnostic": "halt", "show_pc": false }"#).unwrap();
        assert_eq!(cfg.on_diagnostic, DiagnosticPolicy::Halt);
        assert!(!cfg.show_pc);
        assert!(cfg.annotate_source);
        assert_eq!(cfg.max_instructions, 64 * 1024);
        assert_eq!(cfg.max_depth, MAX_TREE_DEPTH);

        let cfg = DisasmConfig::from_json(r#"{ "max_depth": 16 }"#).unwrap();
        assert_eq!(cfg.max_depth, 16);
    }

    #[test]
    fn test_bad_json() {
        assert!(DisasmConfig::from_json(r#"{ "on_diagnostic": "explode" }"#).is_err());
    }
}
