//! Trait definitions for the engine's external collaborators.

use async_trait::async_trait;
use fabler_core::{ResponseCategory, StoryDetails, WaitCondition};
use fabler_error::FablerResult;
use std::path::Path;
use std::time::Duration;

/// Robot and tablet channels.
///
/// Commands must be delivered in the order they are issued.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Send a command to the robot.
    async fn send_robot_command(&self, command: &str, properties: &str) -> FablerResult<()>;

    /// Send a command to the robot, then block until `condition` holds or
    /// `timeout` elapses.
    async fn send_robot_command_and_wait(
        &self,
        command: &str,
        condition: WaitCondition,
        timeout: Duration,
        properties: &str,
    ) -> FablerResult<()>;

    /// Send a command to the tablet game.
    async fn send_opal_command(&self, command: &str, properties: Option<&str>) -> FablerResult<()>;

    /// Block until the user does something or `timeout` elapses.
    ///
    /// Returns `Some(ResponseCategory::Timeout)` when nothing happened in time,
    /// and `None` when `kind` is not something that can be waited for.
    async fn wait_for_response(
        &self,
        kind: &str,
        timeout: Duration,
    ) -> FablerResult<Option<ResponseCategory>>;
}

/// Story selection for the current participant.
#[async_trait]
pub trait Personalization: Send + Sync {
    /// Choose the next story and return its script file name.
    async fn next_story_script(&self) -> FablerResult<String>;

    /// Details of the story most recently chosen by [`next_story_script`].
    ///
    /// [`next_story_script`]: Personalization::next_story_script
    async fn next_story_details(&self) -> FablerResult<StoryDetails>;
}

/// Lazy, finite, non-restartable sequence of raw script lines.
#[async_trait]
pub trait LineSource: Send {
    /// Next raw line, or `None` once the sequence is exhausted.
    ///
    /// An `Err` is a read fault; the source should not be polled again.
    async fn next_line(&mut self) -> FablerResult<Option<String>>;
}

/// Opens scripts identified by path.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    /// Open `path` as a fresh line source positioned at its first line.
    async fn open(&self, path: &Path) -> FablerResult<Box<dyn LineSource>>;
}
