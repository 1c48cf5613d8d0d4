//! Story and answer loading onto the tablet.

use crate::ScriptEngine;
use fabler_core::{ObjectDescriptor, ResponseBank, commands};
use fabler_error::{FablerResult, ScriptError, ScriptErrorKind};
use fabler_interface::{Actuator, Personalization};
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

fn to_json<T: Serialize>(value: &T) -> Result<String, ScriptError> {
    serde_json::to_string(value)
        .map_err(|e| ScriptError::new(ScriptErrorKind::Serialization(e.to_string())))
}

/// Split a comma-separated answer list into trimmed, non-empty names.
pub fn split_answers(answers: &str) -> Vec<String> {
    answers
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl<A: Actuator, P: Personalization> ScriptEngine<A, P> {
    /// Stop telling stories: drop the current story and any repeat, then
    /// tell the user the session is over.
    pub(crate) async fn max_stories_reached(&mut self) -> FablerResult<()> {
        info!(
            stories_told = *self.playback.stories_told(),
            max_stories = ?self.config.max_stories(),
            "Story limit reached"
        );
        self.contexts.cancel_story();
        self.contexts.cancel_repeat();
        self.play_phrase(ResponseBank::MaxStoriesReached).await
    }

    /// Lay out the next story's scenes on the tablet, or run the story
    /// limit fallback when no more stories are allowed.
    #[instrument(skip(self))]
    pub(crate) async fn load_next_story(&mut self) -> FablerResult<()> {
        if self.story_limit_reached() {
            return self.max_stories_reached().await;
        }

        let details = self.personalization.next_story_details().await?;
        let setup = details.setup();
        debug!(?setup, "Setting up story scene");
        self.actuator
            .send_opal_command(commands::SETUP_STORY_SCENE, Some(&to_json(&setup)?))
            .await?;

        for (position, scene) in details.scenes().iter().enumerate() {
            let object = ObjectDescriptor::scene(scene, position as u32 + 1, *details.in_order());
            self.actuator
                .send_opal_command(commands::LOAD_OBJECT, Some(&to_json(&object)?))
                .await?;
        }
        info!(scenes = details.scenes().len(), "Loaded story");
        Ok(())
    }

    /// Load the named answers onto the tablet in random order.
    #[instrument(skip(self))]
    pub(crate) async fn load_answers(&mut self, answers: &str) -> FablerResult<()> {
        let mut names = split_answers(answers);
        if names.is_empty() {
            warn!("No answers to load");
        }
        names.shuffle(&mut self.rng);

        for (position, name) in names.iter().enumerate() {
            let object = ObjectDescriptor::answer(name, position as u32 + 1);
            self.actuator
                .send_opal_command(commands::LOAD_OBJECT, Some(&to_json(&object)?))
                .await?;
        }
        debug!(order = ?names, "Loaded answers");
        self.playback.set_current_answers(names);
        Ok(())
    }
}
