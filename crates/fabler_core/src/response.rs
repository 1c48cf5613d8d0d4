//! User response classification.

use serde::{Deserialize, Serialize};

/// Classified user action reported by the actuator layer.
///
/// # Examples
///
/// ```
/// use fabler_core::ResponseCategory;
///
/// let category: ResponseCategory = " incorrect ".parse().unwrap();
/// assert_eq!(category, ResponseCategory::Incorrect);
/// assert_eq!(format!("{}", ResponseCategory::Timeout), "TIMEOUT");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCategory {
    /// User picked the correct answer
    #[display("CORRECT")]
    Correct,
    /// User picked a wrong answer
    #[display("INCORRECT")]
    Incorrect,
    /// User declined
    #[display("NO")]
    No,
    /// User pressed start
    #[display("START")]
    Start,
    /// Nothing happened before the timeout elapsed
    #[display("TIMEOUT")]
    Timeout,
}

impl ResponseCategory {
    /// Every category whose name occurs in a `WAIT` target.
    ///
    /// Matching is by substring, so a target naming `INCORRECT` also names
    /// `CORRECT`. Results are ordered `INCORRECT`, `CORRECT`, `NO`, `START`,
    /// `TIMEOUT`.
    ///
    /// ```
    /// use fabler_core::ResponseCategory;
    ///
    /// assert_eq!(
    ///     ResponseCategory::named_in("INCORRECT"),
    ///     vec![ResponseCategory::Incorrect, ResponseCategory::Correct]
    /// );
    /// assert_eq!(ResponseCategory::named_in("START"), vec![ResponseCategory::Start]);
    /// assert!(ResponseCategory::named_in("ANYTHING").is_empty());
    /// ```
    pub fn named_in(kind: &str) -> Vec<Self> {
        let mut found = Vec::new();
        for category in [
            ResponseCategory::Incorrect,
            ResponseCategory::Correct,
            ResponseCategory::No,
            ResponseCategory::Start,
            ResponseCategory::Timeout,
        ] {
            if kind.contains(&category.to_string()) {
                found.push(category);
            }
        }
        found
    }
}

impl std::str::FromStr for ResponseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CORRECT" => Ok(ResponseCategory::Correct),
            "INCORRECT" => Ok(ResponseCategory::Incorrect),
            "NO" => Ok(ResponseCategory::No),
            "START" => Ok(ResponseCategory::Start),
            "TIMEOUT" => Ok(ResponseCategory::Timeout),
            other => Err(format!("Unknown response category: {}", other)),
        }
    }
}

/// Robot state to block on after sending a command.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum WaitCondition {
    /// Robot has finished speaking
    #[display("ROBOT_NOT_SPEAKING")]
    RobotNotSpeaking,
}
