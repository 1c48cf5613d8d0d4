//! Command names understood by the robot and tablet channels.

/// Robot command that performs speech and gestures.
pub const ROBOT_DO: &str = "DO";

/// Tablet command that loads one object into the game scene.
pub const LOAD_OBJECT: &str = "LOAD_OBJECT";

/// Tablet command that lays out scene and answer slots for a story.
pub const SETUP_STORY_SCENE: &str = "SETUP_STORY_SCENE";

/// Tablet command that highlights the correct answer.
pub const SHOW_CORRECT: &str = "SHOW_CORRECT";

/// Tablet command that removes the correct answer highlight.
pub const HIDE_CORRECT: &str = "HIDE_CORRECT";

/// Tag given to every object the engine loads.
pub const PLAY_OBJECT_TAG: &str = "PlayObject";
