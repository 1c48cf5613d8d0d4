//! Story details provided by personalization.

use crate::StorySetup;
use serde::{Deserialize, Serialize};

/// Scenes, ordering, and answer count of the story about to be told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryDetails {
    /// Scene graphic names in story order
    scenes: Vec<String>,
    /// Whether scenes are presented in order
    in_order: bool,
    /// Number of answer options per question
    num_answers: u32,
}

impl StoryDetails {
    /// Create story details.
    pub fn new(scenes: Vec<String>, in_order: bool, num_answers: u32) -> Self {
        Self {
            scenes,
            in_order,
            num_answers,
        }
    }

    /// Tablet setup payload for these details.
    pub fn setup(&self) -> StorySetup {
        StorySetup::new(self.scenes.len(), self.in_order, self.num_answers)
    }
}
