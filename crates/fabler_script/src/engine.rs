//! The script engine: driving loop and per-command handlers.

use crate::{
    Advance, Command, ContextStack, OpalAction, PlaybackState, RepeatCount, ResponseBankStore,
    RobotAction, ScriptPaths, SessionConfig, read_lines,
};
use derive_builder::Builder;
use derive_getters::Getters;
use fabler_core::{ResponseBank, WaitCondition, commands};
use fabler_error::{ConfigError, FablerResult};
use fabler_interface::{Actuator, Personalization, ScriptLoader};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Tunables fixed for the lifetime of an engine.
///
/// ```
/// use fabler_script::EngineSettingsBuilder;
/// use std::time::Duration;
///
/// let settings = EngineSettingsBuilder::default().seed(7u64).build().unwrap();
/// assert_eq!(*settings.seed(), Some(7));
/// assert_eq!(*settings.feedback_pause(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(default)]
pub struct EngineSettings {
    /// Seed for phrase picks and answer shuffles; entropy when unset
    #[builder(setter(into, strip_option))]
    seed: Option<u64>,
    /// Pause between answer feedback and hiding the correct answer
    feedback_pause: Duration,
    /// Upper bound on waiting for the robot to finish speaking
    speech_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed: None,
            feedback_pause: Duration::from_secs(3),
            speech_timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of one turn of the driving loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A command was dispatched
    Executed(Command),
    /// The line carried no command, or an unusable one
    Ignored,
    /// The session script is exhausted
    SessionComplete,
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SessionSummary {
    /// Stories played to the end
    stories_told: u32,
    /// Commands dispatched
    commands_executed: u64,
    /// Wall time since the engine started
    elapsed: Duration,
}

/// Interprets a session script against the robot, the tablet, and the
/// personalization service.
///
/// The engine pulls one line at a time from its [`ContextStack`], parses it,
/// and runs it to completion before pulling the next. Only a fault in the
/// session script itself is returned to the caller; every other fault is
/// logged and playback moves on.
///
/// # Example
///
/// ```rust,ignore
/// use fabler_script::{FileScriptLoader, ScriptEngine, ScriptPaths};
///
/// let mut engine = ScriptEngine::builder()
///     .actuator(robot)
///     .personalization(stories)
///     .loader(FileScriptLoader::new())
///     .paths(ScriptPaths::new("scripts", "session_scripts", "story_scripts"))
///     .main_script("session-1.txt")
///     .start()
///     .await?;
///
/// let summary = engine.run().await?;
/// println!("Told {} stories", summary.stories_told());
/// ```
pub struct ScriptEngine<A: Actuator, P: Personalization> {
    pub(crate) actuator: A,
    pub(crate) personalization: P,
    pub(crate) loader: Box<dyn ScriptLoader>,
    pub(crate) paths: ScriptPaths,
    pub(crate) settings: EngineSettings,
    pub(crate) contexts: ContextStack,
    pub(crate) banks: ResponseBankStore,
    pub(crate) config: SessionConfig,
    pub(crate) playback: PlaybackState,
    pub(crate) rng: ChaCha8Rng,
}

impl<A: Actuator, P: Personalization> ScriptEngine<A, P> {
    /// Start configuring an engine.
    pub fn builder() -> ScriptEngineBuilder<A, P> {
        ScriptEngineBuilder::default()
    }

    /// Run until the session script is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session script cannot be read.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> FablerResult<SessionSummary> {
        while self.step().await? != Step::SessionComplete {}
        let summary = self.summary();
        info!(
            stories_told = summary.stories_told,
            commands_executed = summary.commands_executed,
            "Finished script"
        );
        Ok(summary)
    }

    /// Pull, parse, and execute one line.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session script cannot be read.
    #[instrument(skip(self), fields(context = %self.contexts.active_kind()))]
    pub async fn step(&mut self) -> FablerResult<Step> {
        let advance = self
            .contexts
            .advance(self.loader.as_ref(), &self.config, &mut self.playback)
            .await?;
        let line = match advance {
            Advance::Line(line) => line,
            Advance::SessionComplete => return Ok(Step::SessionComplete),
        };
        debug!(line = ?line, "LINE");

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!(line = ?line, "Line has no command, going to next line");
                return Ok(Step::Ignored);
            }
            Err(e) => {
                warn!(error = %e, line = ?line, "Skipping command with bad argument");
                return Ok(Step::Ignored);
            }
        };

        debug!(family = %command.family(), command = %command, "Dispatching");
        if let Err(e) = self.dispatch(&command).await {
            warn!(error = %e, command = %command, "Command failed, continuing");
        }
        self.playback.command_executed();
        Ok(Step::Executed(command))
    }

    /// Totals so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            stories_told: *self.playback.stories_told(),
            commands_executed: *self.playback.commands_executed(),
            elapsed: self.playback.elapsed(),
        }
    }

    /// Settings assigned by SET lines so far.
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    /// Phrase banks loaded by ADD lines so far.
    pub fn banks(&self) -> &ResponseBankStore {
        &self.banks
    }

    /// Session progress.
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Execution contexts.
    pub fn contexts(&self) -> &ContextStack {
        &self.contexts
    }

    /// Robot and tablet channels.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Story selection.
    pub fn personalization(&self) -> &P {
        &self.personalization
    }

    async fn dispatch(&mut self, command: &Command) -> FablerResult<()> {
        match command {
            Command::Story => self.start_story().await,
            Command::Robot(action) => self.robot(action).await,
            Command::Opal(action) => self.opal(action).await,
            Command::Pause(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
            Command::Add { bank, file } => {
                self.add(*bank, file).await;
                Ok(())
            }
            Command::Set(setting) => {
                self.config.apply(*setting);
                Ok(())
            }
            Command::Wait { kind, timeout } => self.wait_for_response(kind, *timeout).await,
            Command::Repeat { count, file } => {
                self.repeat(*count, file).await;
                Ok(())
            }
        }
    }

    async fn start_story(&mut self) -> FablerResult<()> {
        if self.story_limit_reached() {
            return self.max_stories_reached().await;
        }

        let script = match self.personalization.next_story_script().await {
            Ok(script) => script,
            Err(e) => {
                warn!(error = %e, "Could not choose a story, skipping STORY line");
                return Ok(());
            }
        };
        let path = self.paths.story_file(&script);
        if let Err(e) = self.contexts.push_story(self.loader.as_ref(), &path).await {
            warn!(error = %e, "Could not open story script, skipping STORY line");
        }
        Ok(())
    }

    async fn robot(&mut self, action: &RobotAction) -> FablerResult<()> {
        match action {
            RobotAction::StoryIntro => self.play_phrase(ResponseBank::StoryIntros).await,
            RobotAction::StoryClosing => self.play_phrase(ResponseBank::StoryClosings).await,
            RobotAction::Send {
                command,
                properties,
            } => self.actuator.send_robot_command(command, properties).await,
        }
    }

    async fn opal(&mut self, action: &OpalAction) -> FablerResult<()> {
        match action {
            OpalAction::LoadAll { file } => {
                let path = self.paths.session_file(file);
                let objects = read_lines(self.loader.as_ref(), &path).await?;
                debug!(count = objects.len(), path = %path.display(), "Loading all objects");
                for object in &objects {
                    self.actuator
                        .send_opal_command(commands::LOAD_OBJECT, Some(object))
                        .await?;
                }
                Ok(())
            }
            OpalAction::LoadStory => self.load_next_story().await,
            OpalAction::LoadAnswers { answers } => self.load_answers(answers).await,
            OpalAction::Send {
                command,
                properties,
            } => {
                self.actuator
                    .send_opal_command(command, properties.as_deref())
                    .await
            }
        }
    }

    async fn add(&mut self, bank: ResponseBank, file: &str) {
        let path = self.paths.session_file(file);
        match read_lines(self.loader.as_ref(), &path).await {
            Ok(phrases) => {
                info!(%bank, count = phrases.len(), "Added responses");
                self.banks.load(bank, phrases);
            }
            Err(e) => warn!(error = %e, %bank, "Failed to add responses, bank left as it was"),
        }
    }

    async fn repeat(&mut self, count: RepeatCount, file: &str) {
        let max_repetitions = match count {
            RepeatCount::Times(n) => n,
            RepeatCount::MaxStories => match *self.config.max_stories() {
                Some(max) => max,
                None => {
                    warn!("REPEAT asked for MAX_STORIES but it has not been set, repeating once");
                    1
                }
            },
        };
        let path = self.paths.session_file(file);
        if let Err(e) = self
            .contexts
            .push_repeat(self.loader.as_ref(), &path, max_repetitions)
            .await
        {
            warn!(error = %e, "Could not open script to repeat, no longer repeating");
        }
    }

    /// Whether the session may not start another story.
    pub(crate) fn story_limit_reached(&self) -> bool {
        let stories_exhausted = match *self.config.max_stories() {
            Some(max) => *self.playback.stories_told() >= max,
            None => {
                debug!("MAX_STORIES has not been set, not limiting story count");
                false
            }
        };
        stories_exhausted || self.config.time_exhausted(self.playback.elapsed())
    }

    /// Say a random phrase from `bank`. A missing or empty bank is logged
    /// and skipped.
    pub(crate) async fn play_phrase(&mut self, bank: ResponseBank) -> FablerResult<()> {
        match self.banks.pick(bank) {
            Ok(phrase) => {
                self.actuator
                    .send_robot_command(commands::ROBOT_DO, &phrase)
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Could not play robot phrase");
                Ok(())
            }
        }
    }

    /// Like [`play_phrase`](Self::play_phrase), then block until the robot
    /// stops speaking or the speech timeout elapses.
    pub(crate) async fn play_phrase_and_wait(&mut self, bank: ResponseBank) -> FablerResult<()> {
        match self.banks.pick(bank) {
            Ok(phrase) => {
                self.actuator
                    .send_robot_command_and_wait(
                        commands::ROBOT_DO,
                        WaitCondition::RobotNotSpeaking,
                        self.settings.speech_timeout,
                        &phrase,
                    )
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Could not play robot phrase");
                Ok(())
            }
        }
    }
}

/// Builder for [`ScriptEngine`].
pub struct ScriptEngineBuilder<A: Actuator, P: Personalization> {
    actuator: Option<A>,
    personalization: Option<P>,
    loader: Option<Box<dyn ScriptLoader>>,
    paths: ScriptPaths,
    main_script: Option<PathBuf>,
    settings: EngineSettings,
}

impl<A: Actuator, P: Personalization> Default for ScriptEngineBuilder<A, P> {
    fn default() -> Self {
        Self {
            actuator: None,
            personalization: None,
            loader: None,
            paths: ScriptPaths::default(),
            main_script: None,
            settings: EngineSettings::default(),
        }
    }
}

impl<A: Actuator, P: Personalization> ScriptEngineBuilder<A, P> {
    /// Set the robot and tablet channels.
    pub fn actuator(mut self, actuator: A) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Set the story selection service.
    pub fn personalization(mut self, personalization: P) -> Self {
        self.personalization = Some(personalization);
        self
    }

    /// Set where scripts are read from.
    pub fn loader(mut self, loader: impl ScriptLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Set script locations.
    pub fn paths(mut self, paths: ScriptPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Set the session script, relative to the session directory.
    pub fn main_script(mut self, name: impl Into<PathBuf>) -> Self {
        self.main_script = Some(name.into());
        self
    }

    /// Set engine tunables.
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Seed phrase picks and answer shuffles.
    pub fn seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    /// Set how long the correct answer stays highlighted.
    pub fn feedback_pause(mut self, pause: Duration) -> Self {
        self.settings.feedback_pause = pause;
        self
    }

    /// Set the upper bound on waiting for the robot to stop speaking.
    pub fn speech_timeout(mut self, timeout: Duration) -> Self {
        self.settings.speech_timeout = timeout;
        self
    }

    /// Open the session script and start the session clock.
    ///
    /// # Errors
    ///
    /// Fails when a required part is missing or the session script cannot
    /// be opened.
    #[instrument(skip(self), fields(main_script = ?self.main_script))]
    pub async fn start(self) -> FablerResult<ScriptEngine<A, P>> {
        let actuator = self
            .actuator
            .ok_or_else(|| ConfigError::new("Script engine requires an actuator"))?;
        let personalization = self
            .personalization
            .ok_or_else(|| ConfigError::new("Script engine requires a personalization service"))?;
        let loader = self
            .loader
            .ok_or_else(|| ConfigError::new("Script engine requires a script loader"))?;
        let main_script = self
            .main_script
            .ok_or_else(|| ConfigError::new("Script engine requires a session script"))?;

        let main_path = self.paths.session_file(&main_script);
        let contexts = ContextStack::open_main(loader.as_ref(), &main_path).await?;

        let (banks, rng) = match self.settings.seed {
            Some(seed) => (
                ResponseBankStore::seeded(seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (ResponseBankStore::new(), ChaCha8Rng::from_entropy()),
        };

        Ok(ScriptEngine {
            actuator,
            personalization,
            loader,
            paths: self.paths,
            settings: self.settings,
            contexts,
            banks,
            config: SessionConfig::new(),
            playback: PlaybackState::new(),
            rng,
        })
    }
}
