//! Runtime configuration for the `fabler` binary.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from fabler.toml)
//! - `~/.config/fabler/fabler.toml`
//! - `./fabler.toml`
//!
//! Later sources override earlier ones. An explicit file can be loaded on its
//! own with [`FablerConfig::from_file`].

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use fabler_core::StoryDetails;
use fabler_error::{ConfigError, FablerError, FablerResult};
use fabler_script::{EngineSettings, EngineSettingsBuilder, ScriptPaths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Participant ID that always selects the demo script.
pub const DEMO_PARTICIPANT: &str = "DEMO";

/// Which session script to play.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct SessionScripts {
    /// Script for demo runs
    #[serde(default = "default_demo_script")]
    demo_script: String,
    /// Script name pattern for numbered sessions; `{session}` is substituted
    #[serde(default = "default_script_template")]
    script_template: String,
}

fn default_demo_script() -> String {
    "demo.txt".to_string()
}

fn default_script_template() -> String {
    "session-{session}.txt".to_string()
}

impl Default for SessionScripts {
    fn default() -> Self {
        Self {
            demo_script: default_demo_script(),
            script_template: default_script_template(),
        }
    }
}

impl SessionScripts {
    /// Session script for a session number and participant.
    ///
    /// A missing or negative session, or the `DEMO` participant, selects the
    /// demo script.
    ///
    /// ```
    /// use fabler::SessionScripts;
    ///
    /// let scripts = SessionScripts::default();
    /// assert_eq!(scripts.script_for(Some(3), Some("p01")), "session-3.txt");
    /// assert_eq!(scripts.script_for(Some(3), Some("DEMO")), "demo.txt");
    /// assert_eq!(scripts.script_for(Some(-1), Some("p01")), "demo.txt");
    /// assert_eq!(scripts.script_for(None, None), "demo.txt");
    /// ```
    pub fn script_for(&self, session: Option<i64>, participant: Option<&str>) -> String {
        match session {
            Some(session) if session >= 0 && participant != Some(DEMO_PARTICIPANT) => self
                .script_template
                .replace("{session}", &session.to_string()),
            _ => self.demo_script.clone(),
        }
    }
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct PlaybackConfig {
    /// Seed for reproducible phrase picks and answer order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    /// Seconds the correct answer stays highlighted
    #[serde(default = "default_feedback_pause_secs")]
    feedback_pause_secs: u64,
    /// Upper bound on waiting for the robot to stop speaking
    #[serde(default = "default_speech_timeout_secs")]
    speech_timeout_secs: u64,
}

fn default_feedback_pause_secs() -> u64 {
    3
}

fn default_speech_timeout_secs() -> u64 {
    10
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            seed: None,
            feedback_pause_secs: default_feedback_pause_secs(),
            speech_timeout_secs: default_speech_timeout_secs(),
        }
    }
}

impl PlaybackConfig {
    /// Engine settings for these tunables. `seed` overrides the configured
    /// seed when given.
    pub fn engine_settings(&self, seed: Option<u64>) -> FablerResult<EngineSettings> {
        let mut builder = EngineSettingsBuilder::default();
        builder
            .feedback_pause(Duration::from_secs(self.feedback_pause_secs))
            .speech_timeout(Duration::from_secs(self.speech_timeout_secs));
        if let Some(seed) = seed.or(self.seed) {
            builder.seed(seed);
        }
        builder.build().map_err(|e| {
            FablerError::from(ConfigError::new(format!(
                "Invalid playback settings: {}",
                e
            )))
        })
    }
}

/// One story in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct StoryEntry {
    /// Story name
    name: String,
    /// Script file, relative to the story directory
    script: String,
    /// Scene graphic names in story order
    #[serde(default)]
    scenes: Vec<String>,
    /// Whether scenes are presented in order
    #[serde(default = "default_in_order")]
    in_order: bool,
    /// Answer options per question
    #[serde(default = "default_num_answers")]
    num_answers: u32,
}

fn default_in_order() -> bool {
    true
}

fn default_num_answers() -> u32 {
    3
}

impl StoryEntry {
    /// Create a catalog entry.
    pub fn new(
        name: impl Into<String>,
        script: impl Into<String>,
        scenes: Vec<String>,
        in_order: bool,
        num_answers: u32,
    ) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            scenes,
            in_order,
            num_answers,
        }
    }

    /// Tablet details for this story.
    pub fn details(&self) -> StoryDetails {
        StoryDetails::new(self.scenes.clone(), self.in_order, self.num_answers)
    }
}

/// Top-level Fabler configuration.
///
/// # Example
///
/// ```no_run
/// use fabler::FablerConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FablerConfig::load()?;
/// let main_script = config.session().script_for(Some(2), Some("p07"));
/// println!("Playing {}", config.paths().session_file(main_script).display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize, Getters)]
pub struct FablerConfig {
    /// Script locations
    #[serde(default)]
    paths: ScriptPaths,
    /// Session script selection
    #[serde(default)]
    session: SessionScripts,
    /// Engine tunables
    #[serde(default)]
    playback: PlaybackConfig,
    /// Story catalog in the order stories are handed out
    #[serde(default)]
    stories: Vec<StoryEntry>,
}

impl FablerConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> FablerResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                FablerError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FablerError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> FablerResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../fabler.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabler/fabler.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("fabler").required(false));

        builder
            .build()
            .map_err(|e| {
                FablerError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FablerError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Replace the story catalog.
    pub fn with_stories(mut self, stories: Vec<StoryEntry>) -> Self {
        self.stories = stories;
        self
    }

    /// Replace the script locations.
    pub fn with_paths(mut self, paths: ScriptPaths) -> Self {
        self.paths = paths;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config: FablerConfig =
            toml::from_str(include_str!("../../../fabler.toml")).expect("Bundled config parses");
        assert_eq!(config.paths().session_dir(), Path::new("session_scripts"));
        assert_eq!(*config.playback().feedback_pause_secs(), 3);
        assert!(!config.stories().is_empty());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: FablerConfig = toml::from_str("").expect("Empty config parses");
        assert_eq!(config.session().demo_script(), "demo.txt");
        assert_eq!(*config.playback().speech_timeout_secs(), 10);
        assert_eq!(*config.playback().seed(), None);
    }

    #[test]
    fn cli_seed_overrides_config_seed() {
        let playback: PlaybackConfig = toml::from_str("seed = 1").expect("Playback parses");
        let settings = playback.engine_settings(Some(9)).expect("Settings build");
        assert_eq!(*settings.seed(), Some(9));
        let settings = playback.engine_settings(None).expect("Settings build");
        assert_eq!(*settings.seed(), Some(1));
        assert_eq!(*settings.feedback_pause(), Duration::from_secs(3));
    }
}
