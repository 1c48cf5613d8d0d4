//! The WAIT protocol: block for a user response, retry, and react.

use crate::ScriptEngine;
use fabler_core::{ResponseBank, ResponseCategory, commands};
use fabler_error::{FablerResult, ScriptError, ScriptErrorKind};
use fabler_interface::{Actuator, Personalization};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// What a response means for the WAIT in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum WaitOutcome {
    /// Wrong answer, or no answer while an answer was expected
    #[display("INCORRECT")]
    Incorrect,
    /// User declined, or did not start when asked
    #[display("NO")]
    No,
    /// Right answer; ends the wait
    #[display("CORRECT")]
    Correct,
    /// User started; ends the wait
    #[display("START")]
    Start,
    /// Response has no bearing on what is awaited
    #[display("IGNORED")]
    Ignored,
}

impl WaitOutcome {
    /// Interpret `category` against the awaited response `kind`.
    ///
    /// ```
    /// use fabler_core::ResponseCategory;
    /// use fabler_script::WaitOutcome;
    ///
    /// assert_eq!(WaitOutcome::classify(ResponseCategory::Timeout, "CORRECT"), WaitOutcome::Incorrect);
    /// assert_eq!(WaitOutcome::classify(ResponseCategory::Timeout, "START"), WaitOutcome::No);
    /// assert_eq!(WaitOutcome::classify(ResponseCategory::Start, "START"), WaitOutcome::Start);
    /// ```
    pub fn classify(category: ResponseCategory, kind: &str) -> Self {
        match category {
            ResponseCategory::Incorrect => WaitOutcome::Incorrect,
            ResponseCategory::No => WaitOutcome::No,
            ResponseCategory::Correct => WaitOutcome::Correct,
            ResponseCategory::Start => WaitOutcome::Start,
            ResponseCategory::Timeout if kind.contains("CORRECT") => WaitOutcome::Incorrect,
            ResponseCategory::Timeout if kind.contains("START") => WaitOutcome::No,
            ResponseCategory::Timeout => WaitOutcome::Ignored,
        }
    }
}

impl<A: Actuator, P: Personalization> ScriptEngine<A, P> {
    /// Wait for `kind` up to `max_incorrect_responses` times.
    ///
    /// # Errors
    ///
    /// Fails when the attempt budget was never set, or when an actuator
    /// call fails.
    #[instrument(skip(self))]
    pub(crate) async fn wait_for_response(
        &mut self,
        kind: &str,
        timeout: Duration,
    ) -> FablerResult<()> {
        let max_attempts = (*self.config.max_incorrect_responses()).ok_or_else(|| {
            ScriptError::new(ScriptErrorKind::SettingNotSet(
                "MAX_INCORRECT_RESPONSES".to_string(),
            ))
        })?;

        for attempt in 1..=max_attempts {
            let Some(category) = self.actuator.wait_for_response(kind, timeout).await? else {
                warn!(kind, "Nothing to wait for, skipping WAIT");
                return Ok(());
            };
            let outcome = WaitOutcome::classify(category, kind);
            debug!(attempt, %category, %outcome, "Got response");

            match outcome {
                WaitOutcome::Incorrect => {
                    self.play_phrase(ResponseBank::IncorrectResponses).await?
                }
                WaitOutcome::No => self.play_phrase(ResponseBank::NoResponses).await?,
                WaitOutcome::Correct => {
                    self.play_phrase_and_wait(ResponseBank::CorrectResponses)
                        .await?;
                    return self.reveal_answer().await;
                }
                WaitOutcome::Start => {
                    return self.play_phrase(ResponseBank::StartResponses).await;
                }
                WaitOutcome::Ignored => {}
            }
        }

        info!(kind, max_attempts, "Out of attempts");
        if kind.contains("CORRECT") {
            self.reveal_answer().await
        } else {
            if kind.contains("START") {
                info!("User never started, ending story");
                self.contexts.cancel_repeat();
                self.contexts.cancel_story();
            }
            Ok(())
        }
    }

    /// Highlight the correct answer, comment on it, and hide it again.
    async fn reveal_answer(&mut self) -> FablerResult<()> {
        self.actuator
            .send_opal_command(commands::SHOW_CORRECT, None)
            .await?;
        self.play_phrase_and_wait(ResponseBank::AnswerFeedback)
            .await?;
        tokio::time::sleep(*self.settings.feedback_pause()).await;
        self.actuator
            .send_opal_command(commands::HIDE_CORRECT, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_wins_over_correct_in_kind() {
        assert_eq!(
            WaitOutcome::classify(ResponseCategory::Timeout, "INCORRECT"),
            WaitOutcome::Incorrect
        );
    }

    #[test]
    fn timeout_without_expectation_is_ignored() {
        assert_eq!(
            WaitOutcome::classify(ResponseCategory::Timeout, "NO"),
            WaitOutcome::Ignored
        );
    }

    #[test]
    fn concrete_categories_ignore_kind() {
        assert_eq!(
            WaitOutcome::classify(ResponseCategory::Correct, "START"),
            WaitOutcome::Correct
        );
        assert_eq!(
            WaitOutcome::classify(ResponseCategory::No, "CORRECT"),
            WaitOutcome::No
        );
    }
}
