//! Execution contexts and the stack that chooses where the next line comes from.
//!
//! The MAIN context is always present. A REPEAT context and a STORY context
//! can each be pushed above it; a STORY started from a repeating script sits
//! above the REPEAT and hands control back to it when the story ends. Lines
//! are always pulled from the topmost context: STORY, else REPEAT, else MAIN.

use crate::{PlaybackState, SessionConfig};
use fabler_error::FablerResult;
use fabler_interface::{LineSource, ScriptLoader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which script a context plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContextKind {
    /// The session script
    #[display("MAIN")]
    Main,
    /// A personalized story script
    #[display("STORY")]
    Story,
    /// A script played several times over
    #[display("REPEAT")]
    Repeat,
}

/// An open script plus its execution metadata.
pub struct ScriptContext {
    kind: ContextKind,
    path: PathBuf,
    source: Option<Box<dyn LineSource>>,
    repetitions_done: u32,
    max_repetitions: u32,
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("open", &self.source.is_some())
            .field("repetitions_done", &self.repetitions_done)
            .field("max_repetitions", &self.max_repetitions)
            .finish()
    }
}

impl ScriptContext {
    async fn open(
        kind: ContextKind,
        loader: &dyn ScriptLoader,
        path: &Path,
        max_repetitions: u32,
    ) -> FablerResult<Self> {
        let source = loader.open(path).await?;
        Ok(Self {
            kind,
            path: path.to_path_buf(),
            source: Some(source),
            repetitions_done: 0,
            max_repetitions,
        })
    }

    /// Kind of script this context plays.
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Script path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Passes completed so far.
    pub fn repetitions_done(&self) -> u32 {
        self.repetitions_done
    }

    /// Passes to make before returning to the parent.
    pub fn max_repetitions(&self) -> u32 {
        self.max_repetitions
    }

    async fn next_line(&mut self) -> FablerResult<Option<String>> {
        match self.source.as_mut() {
            Some(source) => source.next_line().await,
            None => Ok(None),
        }
    }
}

/// Result of asking the stack for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A raw line to execute
    Line(String),
    /// The MAIN script is exhausted; nothing more will be produced
    SessionComplete,
}

/// MAIN context with optional REPEAT and STORY contexts above it.
#[derive(Debug)]
pub struct ContextStack {
    main: ScriptContext,
    repeat: Option<ScriptContext>,
    story: Option<ScriptContext>,
}

impl ContextStack {
    /// Open the session script as the MAIN context.
    ///
    /// # Errors
    ///
    /// Fails when the session script cannot be opened. Nothing can run
    /// without it.
    pub async fn open_main(loader: &dyn ScriptLoader, path: &Path) -> FablerResult<Self> {
        let main = ScriptContext::open(ContextKind::Main, loader, path, 1).await?;
        info!(path = %path.display(), "Opened session script");
        Ok(Self {
            main,
            repeat: None,
            story: None,
        })
    }

    /// Open `path` as the STORY context. An existing story is replaced.
    ///
    /// # Errors
    ///
    /// Fails when the story script cannot be opened; the stack is unchanged.
    pub async fn push_story(&mut self, loader: &dyn ScriptLoader, path: &Path) -> FablerResult<()> {
        let story = ScriptContext::open(ContextKind::Story, loader, path, 1).await?;
        if let Some(previous) = self.story.replace(story) {
            warn!(path = %previous.path.display(), "Replacing unfinished story");
        }
        info!(path = %path.display(), "Starting story");
        Ok(())
    }

    /// Open `path` as the REPEAT context. An existing repeat is replaced.
    ///
    /// # Errors
    ///
    /// Fails when the script cannot be opened. Any repeat already running is
    /// dropped as well, so the session continues from MAIN or the story.
    pub async fn push_repeat(
        &mut self,
        loader: &dyn ScriptLoader,
        path: &Path,
        max_repetitions: u32,
    ) -> FablerResult<()> {
        let repeat =
            match ScriptContext::open(ContextKind::Repeat, loader, path, max_repetitions).await {
                Ok(repeat) => repeat,
                Err(e) => {
                    self.cancel_repeat();
                    return Err(e);
                }
            };
        if let Some(previous) = self.repeat.replace(repeat) {
            warn!(path = %previous.path.display(), "Replacing unfinished repeat");
        }
        info!(path = %path.display(), max_repetitions, "Repeating script");
        Ok(())
    }

    /// Drop the STORY context without counting it as told.
    pub fn cancel_story(&mut self) -> bool {
        let cancelled = self.story.take().is_some();
        if cancelled {
            info!("Story cancelled");
        }
        cancelled
    }

    /// Drop the REPEAT context.
    pub fn cancel_repeat(&mut self) -> bool {
        let cancelled = self.repeat.take().is_some();
        if cancelled {
            info!("Repeat cancelled");
        }
        cancelled
    }

    /// Whether a story is being told.
    pub fn is_doing_story(&self) -> bool {
        self.story.is_some()
    }

    /// Whether a script is being repeated.
    pub fn is_repeating(&self) -> bool {
        self.repeat.is_some()
    }

    /// The REPEAT context, if any.
    pub fn repeat(&self) -> Option<&ScriptContext> {
        self.repeat.as_ref()
    }

    /// Kind of the context lines are currently pulled from.
    pub fn active_kind(&self) -> ContextKind {
        if self.story.is_some() {
            ContextKind::Story
        } else if self.repeat.is_some() {
            ContextKind::Repeat
        } else {
            ContextKind::Main
        }
    }

    /// Next line from the topmost context.
    ///
    /// End of a STORY pops it and counts the story as told. End of a REPEAT
    /// pass pops the REPEAT once `max_repetitions` passes are done or the
    /// session time budget is spent; otherwise the script is reopened on the
    /// next pull. Open and read faults in STORY or REPEAT abandon that
    /// context and continue with its parent.
    ///
    /// # Errors
    ///
    /// A read fault in the MAIN script is returned as-is and ends the session.
    pub async fn advance(
        &mut self,
        loader: &dyn ScriptLoader,
        config: &SessionConfig,
        playback: &mut PlaybackState,
    ) -> FablerResult<Advance> {
        loop {
            if let Some(story) = self.story.as_mut() {
                debug!("Getting next line from story script");
                match story.next_line().await {
                    Ok(Some(line)) => return Ok(Advance::Line(line)),
                    Ok(None) => {
                        playback.story_finished();
                        info!(
                            stories_told = *playback.stories_told(),
                            max_stories = ?config.max_stories(),
                            "Finished story"
                        );
                        self.story = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "Abandoning story after read fault");
                        self.story = None;
                    }
                }
                continue;
            }

            if let Some(repeat) = self.repeat.as_mut() {
                debug!("Getting next line from repeating script");
                if repeat.source.is_none() {
                    match loader.open(&repeat.path).await {
                        Ok(source) => repeat.source = Some(source),
                        Err(e) => {
                            warn!(error = %e, "Abandoning repeat, could not reopen script");
                            self.repeat = None;
                            continue;
                        }
                    }
                }
                match repeat.next_line().await {
                    Ok(Some(line)) => return Ok(Advance::Line(line)),
                    Ok(None) => {
                        repeat.repetitions_done += 1;
                        repeat.source = None;
                        info!(
                            repetition = repeat.repetitions_done,
                            max_repetitions = repeat.max_repetitions,
                            "Finished repetition"
                        );
                        let out_of_time = config.time_exhausted(playback.elapsed());
                        if repeat.repetitions_done >= repeat.max_repetitions || out_of_time {
                            info!(out_of_time, "Done repeating");
                            self.repeat = None;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Abandoning repeat after read fault");
                        self.repeat = None;
                    }
                }
                continue;
            }

            debug!("Getting next line from main session script");
            return match self.main.next_line().await? {
                Some(line) => Ok(Advance::Line(line)),
                None => {
                    if self.main.source.take().is_some() {
                        info!("No more script lines to get");
                    }
                    Ok(Advance::SessionComplete)
                }
            };
        }
    }
}
