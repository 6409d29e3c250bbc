/*!
 * Jacs Traits
 *
 * Interfaces implemented by the environment hosting the toolchain
 */

use crate::error::Result;
use crate::types::{DebugInfo, JacError};
use crate::utils::print_jac_error;

/// Environment that receives compiled artifacts and diagnostics
pub trait Host {
    /// Writes an output artifact
    fn write(&mut self, filename: &str, contents: &[u8]) -> Result<()>;

    /// Emits an informational message
    fn log(&mut self, msg: &str);

    /// Name of the main source file, if the host has one
    fn main_file_name(&self) -> Option<String> {
        None
    }

    /// Reports a compiler diagnostic
    fn error(&mut self, err: &JacError) {
        print_jac_error(err);
    }

    /// Checks a finished bytecode image, optionally with its debug info
    fn verify_bytecode(&mut self, _buf: &[u8], _dbg: Option<&DebugInfo>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryHost {
        files: HashMap<String, Vec<u8>>,
        logs: Vec<String>,
    }

    impl Host for MemoryHost {
        fn write(&mut self, filename: &str, contents: &[u8]) -> Result<()> {
            self.files.insert(filename.to_string(), contents.to_vec());
            Ok(())
        }

        fn log(&mut self, msg: &str) {
            self.logs.push(msg.to_string());
        }
    }

    #[test]
    fn test_host_defaults() {
        let mut host = MemoryHost::default();
        host.write("prog.jacs", &[1, 2, 3]).unwrap();
        host.log("compiled");
        assert_eq!(host.files["prog.jacs"], vec![1, 2, 3]);
        assert_eq!(host.logs, vec!["compiled".to_string()]);
        assert_eq!(host.main_file_name(), None);
        assert!(host.verify_bytecode(&[0], None).is_ok());
    }
}
