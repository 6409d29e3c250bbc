/*!
 * Jacs Core
 *
 * Shared types and utilities for the Jacs workspace
 */

pub mod types;
pub mod traits;
pub mod utils;
pub mod error;

// Public re-exports
pub use error::{Error, Result};
pub use traits::Host;
pub use types::*;
