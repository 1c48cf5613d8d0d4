//! Fabler - robot-narrated interactive story sessions
//!
//! Fabler plays tab-separated session scripts in which a social robot tells
//! stories and asks questions about them while a tablet game shows the
//! scenes and answer options. The script engine lives in `fabler_script`;
//! this crate re-exports it together with runtime configuration and the
//! collaborators used by the `fabler` binary.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabler::{CatalogPersonalization, ConsoleActuator, FablerConfig, FileScriptLoader, ScriptEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FablerConfig::load()?;
//!     let mut engine = ScriptEngine::builder()
//!         .actuator(ConsoleActuator::stdin())
//!         .personalization(CatalogPersonalization::new(config.stories().clone()))
//!         .loader(FileScriptLoader::new())
//!         .paths(config.paths().clone())
//!         .main_script(config.session().script_for(None, None))
//!         .settings(config.playback().engine_settings(None)?)
//!         .start()
//!         .await?;
//!
//!     let summary = engine.run().await?;
//!     println!("Told {} stories", summary.stories_told());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `fabler_error` - Error types
//! - `fabler_core` - Shared data types
//! - `fabler_interface` - Collaborator traits
//! - `fabler_script` - Script execution engine
//!
//! This crate (`fabler`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod console;

pub use catalog::CatalogPersonalization;
pub use config::{
    DEMO_PARTICIPANT, FablerConfig, PlaybackConfig, SessionScripts, StoryEntry,
};
pub use console::ConsoleActuator;

pub use fabler_core::{
    ObjectDescriptor, ResponseBank, ResponseCategory, StoryDetails, StorySetup, WaitCondition,
    commands,
};
pub use fabler_error::{
    ActuatorError, ConfigError, FablerError, FablerErrorKind, FablerResult, PersonalizationError,
    PersonalizationErrorKind, ScriptError, ScriptErrorKind,
};
pub use fabler_interface::{Actuator, LineSource, Personalization, ScriptLoader};
pub use fabler_script::{
    Advance, Command, CommandFamily, ContextKind, ContextStack, EngineSettings,
    EngineSettingsBuilder, FileScriptLoader, InMemoryScriptLoader, OpalAction, PlaybackState,
    RepeatCount, ResponseBankStore, RobotAction, ScriptEngine, ScriptEngineBuilder, ScriptPaths,
    SessionConfig, SessionSummary, Setting, Step, WaitOutcome, read_lines,
};
