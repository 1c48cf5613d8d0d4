//! Actuator error types.

/// Failure reported by the robot or tablet channel.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Actuator Error: {} at line {} in {}", message, line, file)]
pub struct ActuatorError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ActuatorError {
    /// Create a new ActuatorError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabler_error::ActuatorError;
    ///
    /// let err = ActuatorError::new("tablet disconnected");
    /// assert!(format!("{}", err).contains("tablet disconnected"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
