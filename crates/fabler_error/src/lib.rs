//! Error types for the Fabler script engine.
//!
//! This crate provides the foundation error types used throughout the Fabler workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabler_error::{FablerResult, ScriptError, ScriptErrorKind};
//!
//! fn open_main() -> FablerResult<String> {
//!     Err(ScriptError::new(ScriptErrorKind::OpenFailed {
//!         path: "session-1.txt".to_string(),
//!         message: "not found".to_string(),
//!     }))?
//! }
//!
//! assert!(open_main().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actuator;
mod config;
mod error;
mod personalization;
mod script;

pub use actuator::ActuatorError;
pub use config::ConfigError;
pub use error::{FablerError, FablerErrorKind, FablerResult};
pub use personalization::{PersonalizationError, PersonalizationErrorKind};
pub use script::{ScriptError, ScriptErrorKind};
