//! Terminal stand-in for the robot and the tablet.

use async_trait::async_trait;
use fabler_core::{ResponseCategory, WaitCondition};
use fabler_error::{ActuatorError, FablerResult};
use fabler_interface::Actuator;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

type InputLines = Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>;

/// Actuator that logs outgoing commands and reads user responses typed on
/// a terminal.
///
/// Each response is one line holding a category name (`correct`,
/// `incorrect`, `no`, `start`). Unrecognized lines are ignored until the
/// wait times out.
#[derive(Clone)]
pub struct ConsoleActuator {
    input: Arc<Mutex<InputLines>>,
    prompt: bool,
}

impl std::fmt::Debug for ConsoleActuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleActuator")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl ConsoleActuator {
    /// Read responses from standard input.
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin()).with_prompt(true)
    }

    /// Read responses from `reader`.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        Self {
            input: Arc::new(Mutex::new(BufReader::new(reader).lines())),
            prompt: false,
        }
    }

    /// Print a prompt before each wait.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }
}

#[async_trait]
impl Actuator for ConsoleActuator {
    async fn send_robot_command(&self, command: &str, properties: &str) -> FablerResult<()> {
        info!(command, properties, "ROBOT");
        Ok(())
    }

    async fn send_robot_command_and_wait(
        &self,
        command: &str,
        condition: WaitCondition,
        timeout: Duration,
        properties: &str,
    ) -> FablerResult<()> {
        info!(command, properties, %condition, ?timeout, "ROBOT");
        Ok(())
    }

    async fn send_opal_command(&self, command: &str, properties: Option<&str>) -> FablerResult<()> {
        info!(command, properties = properties.unwrap_or_default(), "OPAL");
        Ok(())
    }

    async fn wait_for_response(
        &self,
        kind: &str,
        timeout: Duration,
    ) -> FablerResult<Option<ResponseCategory>> {
        if ResponseCategory::named_in(kind).is_empty() {
            warn!(kind, "Not a response that can be waited for");
            return Ok(None);
        }
        if self.prompt {
            println!("Waiting {}s for {} (correct/incorrect/no/start):", timeout.as_secs(), kind);
        }

        let deadline = Instant::now() + timeout;
        let mut input = self.input.lock().await;
        loop {
            match tokio::time::timeout_at(deadline, input.next_line()).await {
                Err(_) => {
                    debug!(kind, "No response before timeout");
                    return Ok(Some(ResponseCategory::Timeout));
                }
                Ok(Ok(Some(line))) => match line.parse::<ResponseCategory>() {
                    Ok(category) => {
                        debug!(%category, "Got response");
                        return Ok(Some(category));
                    }
                    Err(e) => warn!(error = %e, "Ignoring response"),
                },
                Ok(Ok(None)) => {
                    // Input closed; nothing more can arrive.
                    tokio::time::sleep_until(deadline).await;
                    return Ok(Some(ResponseCategory::Timeout));
                }
                Ok(Err(e)) => {
                    return Err(ActuatorError::new(format!("Failed to read response: {}", e)).into());
                }
            }
        }
    }
}
