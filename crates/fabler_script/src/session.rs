//! Session settings and playback bookkeeping.

use derive_getters::Getters;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// One value assigned by a SET line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Attempts allowed per WAIT
    MaxIncorrectResponses(u32),
    /// Session time budget
    MaxGameTime(Duration),
    /// Stories allowed per session
    MaxStories(u32),
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::MaxIncorrectResponses(n) => write!(f, "MAX_INCORRECT_RESPONSES = {}", n),
            Setting::MaxGameTime(d) => write!(f, "MAX_GAME_TIME = {} min", d.as_secs() / 60),
            Setting::MaxStories(n) => write!(f, "MAX_STORIES = {}", n),
        }
    }
}

/// Tunables populated incrementally by SET lines.
///
/// Every field starts unset. What happens when an unset field is read
/// depends on the reader:
///
/// - `max_incorrect_responses`: WAIT is skipped
/// - `max_game_time`: no time limit applies
/// - `max_stories`: REPEAT's `MAX_STORIES` alias falls back to one pass and
///   story loading is not limited by count
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SessionConfig {
    /// Attempts allowed per WAIT
    max_incorrect_responses: Option<u32>,
    /// Session time budget
    max_game_time: Option<Duration>,
    /// Stories allowed per session
    max_stories: Option<u32>,
}

impl SessionConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a setting, replacing any previous value.
    pub fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::MaxIncorrectResponses(n) => self.max_incorrect_responses = Some(n),
            Setting::MaxGameTime(d) => self.max_game_time = Some(d),
            Setting::MaxStories(n) => self.max_stories = Some(n),
        }
        info!(%setting, "Session setting changed");
    }

    /// Whether `elapsed` has used up the time budget. Always false when no
    /// budget is set.
    pub fn time_exhausted(&self, elapsed: Duration) -> bool {
        self.max_game_time.is_some_and(|limit| elapsed >= limit)
    }
}

/// Progress of the running session.
#[derive(Debug, Clone, Getters)]
pub struct PlaybackState {
    /// Stories whose scripts ran to the end
    stories_told: u32,
    /// When the engine was started
    session_start: Instant,
    /// Commands dispatched so far
    commands_executed: u64,
    /// Answer names in the order they were last loaded onto the tablet
    current_answers: Vec<String>,
}

impl PlaybackState {
    /// Start the session clock now.
    pub fn new() -> Self {
        Self {
            stories_told: 0,
            session_start: Instant::now(),
            commands_executed: 0,
            current_answers: Vec::new(),
        }
    }

    /// Time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.session_start.elapsed()
    }

    pub(crate) fn story_finished(&mut self) {
        self.stories_told += 1;
    }

    pub(crate) fn command_executed(&mut self) {
        self.commands_executed += 1;
    }

    pub(crate) fn set_current_answers(&mut self, answers: Vec<String>) {
        self.current_answers = answers;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
