/*!
 * Jacs Types
 *
 * Common types used across the Jacs workspace: debug information emitted
 * by the compiler and the diagnostic shape reported to hosts.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Debug information for a single compiled function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDebugInfo {
    pub name: String,
    /// Flat `(line, start, len)` triples; `start` and `len` are in halfwords
    /// relative to the start of the function
    #[serde(default)]
    pub srcmap: Vec<u32>,
    #[serde(default)]
    pub locals: Vec<CellDebugInfo>,
}

impl FunctionDebugInfo {
    /// Returns the source line covering the given byte offset of the function body
    pub fn line_at(&self, byte_offset: usize) -> Option<u32> {
        let halfword = u32::try_from(byte_offset / 2).ok()?;
        self.srcmap
            .chunks_exact(3)
            .find(|entry| entry[1] <= halfword && halfword < entry[1].saturating_add(entry[2]))
            .map(|entry| entry[0])
    }
}

/// Name of a variable cell (local, global, parameter)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDebugInfo {
    pub name: String,
}

/// Name of a role binding together with its service class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDebugInfo {
    pub name: String,
    pub service_class: u32,
}

/// Complete debug information of a compiled program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub functions: Vec<FunctionDebugInfo>,
    #[serde(default)]
    pub roles: Vec<RoleDebugInfo>,
    #[serde(default)]
    pub globals: Vec<CellDebugInfo>,
    #[serde(default)]
    pub source: String,
}

impl DebugInfo {
    /// Parses debug information from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the text of the 1-based source line `line`
    pub fn source_line(&self, line: u32) -> Option<&str> {
        let idx = usize::try_from(line).ok()?.checked_sub(1)?;
        self.source.lines().nth(idx)
    }
}

/// Compiler-level diagnostic surfaced to a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JacError {
    pub filename: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
    #[serde(default)]
    pub code_fragment: String,
}

impl fmt::Display for JacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{}): {}", self.filename, self.line, self.column, self.message)?;
        if !self.code_fragment.is_empty() {
            write!(f, " ({})", self.code_fragment)?;
        }
        Ok(())
    }
}
