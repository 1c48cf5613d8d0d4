//! Named phrase banks.

use serde::{Deserialize, Serialize};

/// Named list of robot phrases populated by `ADD` commands.
///
/// # Examples
///
/// ```
/// use fabler_core::ResponseBank;
///
/// let bank: ResponseBank = "STORY_INTROS".parse().unwrap();
/// assert_eq!(bank, ResponseBank::StoryIntros);
/// assert_eq!(bank.to_string(), "STORY_INTROS");
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
pub enum ResponseBank {
    /// Played after an incorrect answer
    #[display("INCORRECT_RESPONSES")]
    IncorrectResponses,
    /// Played after a correct answer
    #[display("CORRECT_RESPONSES")]
    CorrectResponses,
    /// Played when the user presses start
    #[display("START_RESPONSES")]
    StartResponses,
    /// Played when the user declines
    #[display("NO_RESPONSES")]
    NoResponses,
    /// Played while the correct answer is shown
    #[display("ANSWER_FEEDBACK")]
    AnswerFeedback,
    /// Played before a story
    #[display("STORY_INTROS")]
    StoryIntros,
    /// Played after a story
    #[display("STORY_CLOSINGS")]
    StoryClosings,
    /// Loadable with ADD; the engine never plays it
    #[display("TIMEOUT_CLOSINGS")]
    TimeoutClosings,
    /// Played when no more stories may be told
    #[display("MAX_STORIES_REACHED")]
    MaxStoriesReached,
}

impl ResponseBank {
    /// Banks in the order `ADD` lines are matched against them.
    ///
    /// `INCORRECT_RESPONSES` precedes `CORRECT_RESPONSES` because the latter is a
    /// substring of the former.
    pub const MATCH_ORDER: [ResponseBank; 9] = [
        ResponseBank::IncorrectResponses,
        ResponseBank::CorrectResponses,
        ResponseBank::StartResponses,
        ResponseBank::NoResponses,
        ResponseBank::AnswerFeedback,
        ResponseBank::StoryIntros,
        ResponseBank::StoryClosings,
        ResponseBank::TimeoutClosings,
        ResponseBank::MaxStoriesReached,
    ];

    /// Script spelling of the bank name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseBank::IncorrectResponses => "INCORRECT_RESPONSES",
            ResponseBank::CorrectResponses => "CORRECT_RESPONSES",
            ResponseBank::StartResponses => "START_RESPONSES",
            ResponseBank::NoResponses => "NO_RESPONSES",
            ResponseBank::AnswerFeedback => "ANSWER_FEEDBACK",
            ResponseBank::StoryIntros => "STORY_INTROS",
            ResponseBank::StoryClosings => "STORY_CLOSINGS",
            ResponseBank::TimeoutClosings => "TIMEOUT_CLOSINGS",
            ResponseBank::MaxStoriesReached => "MAX_STORIES_REACHED",
        }
    }

    /// First bank whose name occurs anywhere in `field`.
    ///
    /// ```
    /// use fabler_core::ResponseBank;
    ///
    /// assert_eq!(
    ///     ResponseBank::find_in("my_INCORRECT_RESPONSES"),
    ///     Some(ResponseBank::IncorrectResponses)
    /// );
    /// assert_eq!(ResponseBank::find_in("GREETINGS"), None);
    /// ```
    pub fn find_in(field: &str) -> Option<Self> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|bank| field.contains(bank.as_str()))
    }
}

impl std::str::FromStr for ResponseBank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|bank| bank.as_str() == s)
            .ok_or_else(|| format!("Unknown response bank: {}", s))
    }
}
