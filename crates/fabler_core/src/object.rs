//! Payloads sent to the tablet game.

use crate::commands::PLAY_OBJECT_TAG;
use serde::{Deserialize, Serialize};

/// Properties of one object loaded with `LOAD_OBJECT`.
///
/// # Examples
///
/// ```
/// use fabler_core::ObjectDescriptor;
///
/// let scene = ObjectDescriptor::scene("park", 2, false);
/// assert_eq!(*scene.slot(), 2);
/// assert_eq!(*scene.correct_slot(), Some(2));
/// assert!(*scene.draggable());
///
/// let json = serde_json::to_value(&scene).unwrap();
/// assert_eq!(json["isAnswerSlot"], false);
/// assert_eq!(json["correctSlot"], 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    /// Graphic name
    name: String,
    /// Object tag in the game
    tag: String,
    /// 1-based slot position
    slot: u32,
    /// Whether the user may drag the object
    draggable: bool,
    /// Whether the object sits in an answer slot
    is_answer_slot: bool,
    /// Slot the object belongs in, for shuffled scenes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_slot: Option<u32>,
}

impl ObjectDescriptor {
    /// Story scene graphic. Scenes told out of order are draggable and carry
    /// their correct slot.
    pub fn scene(name: impl Into<String>, slot: u32, in_order: bool) -> Self {
        Self {
            name: name.into(),
            tag: PLAY_OBJECT_TAG.to_string(),
            slot,
            draggable: !in_order,
            is_answer_slot: false,
            correct_slot: (!in_order).then_some(slot),
        }
    }

    /// Answer option graphic.
    pub fn answer(name: impl Into<String>, slot: u32) -> Self {
        Self {
            name: name.into(),
            tag: PLAY_OBJECT_TAG.to_string(),
            slot,
            draggable: false,
            is_answer_slot: true,
            correct_slot: None,
        }
    }
}

/// Payload of `SETUP_STORY_SCENE`.
///
/// ```
/// use fabler_core::StorySetup;
///
/// let setup = StorySetup::new(4, true, 3);
/// let json = serde_json::to_value(&setup).unwrap();
/// assert_eq!(json["numScenes"], 4);
/// assert_eq!(json["scenesInOrder"], true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StorySetup {
    /// Number of scene slots
    num_scenes: usize,
    /// Whether scenes are shown in story order
    scenes_in_order: bool,
    /// Number of answer slots
    num_answers: u32,
}

impl StorySetup {
    /// Create a new scene setup payload.
    pub fn new(num_scenes: usize, scenes_in_order: bool, num_answers: u32) -> Self {
        Self {
            num_scenes,
            scenes_in_order,
            num_answers,
        }
    }
}
