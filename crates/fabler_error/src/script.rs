//! Script error types.

/// Specific error conditions raised while running a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// Script or data file could not be opened
    #[display("Failed to open '{}': {}", path, message)]
    OpenFailed {
        /// Path that was requested
        path: String,
        /// Underlying failure
        message: String,
    },
    /// Reading the next line of an open script failed
    #[display("Failed to read '{}': {}", path, message)]
    ReadFailed {
        /// Path of the script being read
        path: String,
        /// Underlying failure
        message: String,
    },
    /// A command argument could not be interpreted
    #[display("{} expected {}, got '{}'", command, expected, value)]
    InvalidArgument {
        /// Command family
        command: String,
        /// What the argument should have been
        expected: String,
        /// Raw field value
        value: String,
    },
    /// A response bank was read before any ADD populated it
    #[display("Response bank {} was never loaded", _0)]
    BankNotLoaded(String),
    /// A response bank was loaded from a file without phrases
    #[display("Response bank {} has no phrases", _0)]
    BankEmpty(String),
    /// A session setting was read before any SET assigned it
    #[display("Session setting {} has not been set", _0)]
    SettingNotSet(String),
    /// A tablet payload could not be encoded
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Error type for script operations.
///
/// # Examples
///
/// ```
/// use fabler_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::BankNotLoaded("STORY_INTROS".to_string()));
/// assert!(format!("{}", err).contains("never loaded"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
