//! Script execution engine for Fabler story sessions.
//!
//! A session script is a tab-separated command file. The engine reads it one
//! line at a time, sends robot speech and tablet game commands through an
//! [`Actuator`](fabler_interface::Actuator), and hands control to
//! personalized story scripts and repeating scripts as the session script
//! asks for them.
//!
//! # Architecture
//!
//! - [`ContextStack`] decides where the next line comes from (STORY, else
//!   REPEAT, else MAIN)
//! - [`Command::parse`] turns a line into a [`Command`]
//! - [`ScriptEngine`] dispatches commands and runs the WAIT protocol
//! - [`ResponseBankStore`] and [`SessionConfig`] hold what ADD and SET lines
//!   assigned
//!
//! # Example
//!
//! ```rust,ignore
//! use fabler_script::{EngineSettingsBuilder, FileScriptLoader, ScriptEngine, ScriptPaths};
//!
//! let settings = EngineSettingsBuilder::default().seed(42u64).build()?;
//! let mut engine = ScriptEngine::builder()
//!     .actuator(robot)
//!     .personalization(stories)
//!     .loader(FileScriptLoader::new())
//!     .paths(ScriptPaths::new("scripts", "session_scripts", "story_scripts"))
//!     .main_script("demo.txt")
//!     .settings(settings)
//!     .start()
//!     .await?;
//! engine.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod banks;
mod command;
mod context;
mod engine;
mod loader;
mod paths;
mod session;
mod story;
mod wait;

pub use banks::ResponseBankStore;
pub use command::{Command, CommandFamily, OpalAction, RepeatCount, RobotAction, split_fields};
pub use context::{Advance, ContextKind, ContextStack, ScriptContext};
pub use engine::{
    EngineSettings, EngineSettingsBuilder, ScriptEngine, ScriptEngineBuilder, SessionSummary, Step,
};
pub use loader::{FileLineSource, FileScriptLoader, InMemoryScriptLoader, read_lines};
pub use paths::ScriptPaths;
pub use session::{PlaybackState, SessionConfig, Setting};
pub use story::split_answers;
pub use wait::WaitOutcome;
