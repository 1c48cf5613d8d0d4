//! Story selection from the configured catalog.

use crate::StoryEntry;
use async_trait::async_trait;
use fabler_core::StoryDetails;
use fabler_error::{FablerResult, PersonalizationError, PersonalizationErrorKind};
use fabler_interface::Personalization;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct CatalogCursor {
    next: usize,
    current: Option<usize>,
}

/// Hands out catalog stories in order, one per request.
///
/// # Example
///
/// ```
/// use fabler::{CatalogPersonalization, StoryEntry};
/// use fabler_interface::Personalization;
///
/// #[tokio::main]
/// async fn main() {
///     let catalog = CatalogPersonalization::new(vec![StoryEntry::new(
///         "frog",
///         "frog.txt",
///         vec!["pond".to_string()],
///         true,
///         3,
///     )]);
///     assert_eq!(catalog.next_story_script().await.unwrap(), "frog.txt");
///     assert_eq!(catalog.next_story_details().await.unwrap().scenes().len(), 1);
///     assert!(catalog.next_story_script().await.is_err());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogPersonalization {
    stories: Arc<Vec<StoryEntry>>,
    cursor: Arc<RwLock<CatalogCursor>>,
}

impl CatalogPersonalization {
    /// Create a provider over `stories`.
    pub fn new(stories: Vec<StoryEntry>) -> Self {
        Self {
            stories: Arc::new(stories),
            cursor: Arc::new(RwLock::new(CatalogCursor::default())),
        }
    }

    /// Number of stories in the catalog.
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Whether the catalog has no stories.
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Stories handed out so far.
    pub async fn handed_out(&self) -> usize {
        self.cursor.read().await.next
    }
}

#[async_trait]
impl Personalization for CatalogPersonalization {
    async fn next_story_script(&self) -> FablerResult<String> {
        let mut cursor = self.cursor.write().await;
        let index = cursor.next;
        let story = self.stories.get(index).ok_or_else(|| {
            PersonalizationError::new(PersonalizationErrorKind::CatalogExhausted(
                self.stories.len(),
            ))
        })?;
        cursor.next += 1;
        cursor.current = Some(index);
        info!(story = %story.name(), "Chose next story");
        Ok(story.script().clone())
    }

    async fn next_story_details(&self) -> FablerResult<StoryDetails> {
        let index = self
            .cursor
            .read()
            .await
            .current
            .ok_or_else(|| PersonalizationError::new(PersonalizationErrorKind::NoStorySelected))?;
        let story = self
            .stories
            .get(index)
            .ok_or_else(|| PersonalizationError::new(PersonalizationErrorKind::NoStorySelected))?;
        debug!(story = %story.name(), "Story details requested");
        Ok(story.details())
    }
}
