//! Personalization error types.

/// Kinds of story selection failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersonalizationErrorKind {
    /// Story details were requested before any story script was chosen
    #[display("No story has been selected yet")]
    NoStorySelected,
    /// Every story available to the participant has already been handed out
    #[display("Story catalog exhausted after {} stories", _0)]
    CatalogExhausted(usize),
}

/// Personalization error with location tracking.
///
/// # Examples
///
/// ```
/// use fabler_error::{PersonalizationError, PersonalizationErrorKind};
///
/// let err = PersonalizationError::new(PersonalizationErrorKind::NoStorySelected);
/// assert!(format!("{}", err).contains("No story"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Personalization Error: {} at line {} in {}", kind, line, file)]
pub struct PersonalizationError {
    /// The kind of error that occurred
    pub kind: PersonalizationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PersonalizationError {
    /// Create a new personalization error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersonalizationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
