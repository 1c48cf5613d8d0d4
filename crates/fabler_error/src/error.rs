//! Top-level error wrapper types.

use crate::{ActuatorError, ConfigError, PersonalizationError, ScriptError};

/// Every error condition that can cross a Fabler crate boundary.
///
/// # Examples
///
/// ```
/// use fabler_error::{FablerError, ActuatorError};
///
/// let err: FablerError = ActuatorError::new("robot offline").into();
/// assert!(format!("{}", err).contains("Actuator Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FablerErrorKind {
    /// Script loading or execution error
    #[from(ScriptError)]
    Script(ScriptError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Robot or tablet channel error
    #[from(ActuatorError)]
    Actuator(ActuatorError),
    /// Story selection error
    #[from(PersonalizationError)]
    Personalization(PersonalizationError),
}

/// Fabler error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabler_error::{FablerError, FablerErrorKind, FablerResult, ConfigError};
///
/// fn might_fail() -> FablerResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), FablerErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabler Error: {}", _0)]
pub struct FablerError(Box<FablerErrorKind>);

impl FablerError {
    /// Create a new error from a kind.
    pub fn new(kind: FablerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FablerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FablerErrorKind
impl<T> From<T> for FablerError
where
    T: Into<FablerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabler operations.
pub type FablerResult<T> = std::result::Result<T, FablerError>;
