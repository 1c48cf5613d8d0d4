//! Script loaders backed by the filesystem or by memory.

use async_trait::async_trait;
use fabler_error::{FablerResult, ScriptError, ScriptErrorKind};
use fabler_interface::{LineSource, ScriptLoader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::RwLock;
use tracing::debug;

/// Opens scripts from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScriptLoader;

impl FileScriptLoader {
    /// Create a new filesystem loader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptLoader for FileScriptLoader {
    async fn open(&self, path: &Path) -> FablerResult<Box<dyn LineSource>> {
        let file = File::open(path).await.map_err(|e| {
            ScriptError::new(ScriptErrorKind::OpenFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        debug!(path = %path.display(), "Opened script file");
        Ok(Box::new(FileLineSource {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
        }))
    }
}

/// Reads one line at a time from an open file.
#[derive(Debug)]
pub struct FileLineSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

#[async_trait]
impl LineSource for FileLineSource {
    async fn next_line(&mut self) -> FablerResult<Option<String>> {
        self.lines.next_line().await.map_err(|e| {
            ScriptError::new(ScriptErrorKind::ReadFailed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
            .into()
        })
    }
}

/// In-memory script store for testing and dry runs.
///
/// Scripts are registered by path. A script can be given a read fault that
/// fires after a number of lines, or an open fault that fires once it has
/// been opened a number of times. The loader counts how often each path was
/// opened.
///
/// # Example
///
/// ```
/// use fabler_interface::ScriptLoader;
/// use fabler_script::InMemoryScriptLoader;
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() {
///     let loader = InMemoryScriptLoader::new().with_script("main.txt", "PAUSE\t1\n");
///     let mut source = loader.open(Path::new("main.txt")).await.unwrap();
///     assert_eq!(source.next_line().await.unwrap().as_deref(), Some("PAUSE\t1"));
///     assert_eq!(source.next_line().await.unwrap(), None);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryScriptLoader {
    scripts: HashMap<PathBuf, Vec<String>>,
    read_faults: HashMap<PathBuf, usize>,
    open_faults: HashMap<PathBuf, usize>,
    opens: Arc<RwLock<HashMap<PathBuf, usize>>>,
}

impl InMemoryScriptLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script, splitting `text` into lines.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: &str) {
        self.scripts
            .insert(path.into(), text.lines().map(str::to_string).collect());
    }

    /// Register a script and return the loader.
    pub fn with_script(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
        self.insert(path, text);
        self
    }

    /// Make reads of `path` fail after `after_lines` lines have been served.
    pub fn with_read_fault(mut self, path: impl Into<PathBuf>, after_lines: usize) -> Self {
        self.read_faults.insert(path.into(), after_lines);
        self
    }

    /// Make opens of `path` fail once it has been opened `after_opens` times.
    pub fn with_open_fault(mut self, path: impl Into<PathBuf>, after_opens: usize) -> Self {
        self.open_faults.insert(path.into(), after_opens);
        self
    }

    /// Number of times `path` was successfully opened.
    pub async fn open_count(&self, path: impl AsRef<Path>) -> usize {
        self.opens
            .read()
            .await
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ScriptLoader for InMemoryScriptLoader {
    async fn open(&self, path: &Path) -> FablerResult<Box<dyn LineSource>> {
        let lines = self.scripts.get(path).cloned().ok_or_else(|| {
            ScriptError::new(ScriptErrorKind::OpenFailed {
                path: path.display().to_string(),
                message: "no such script".to_string(),
            })
        })?;
        let mut opens = self.opens.write().await;
        let count = opens.entry(path.to_path_buf()).or_insert(0);
        if self.open_faults.get(path).is_some_and(|after| *count >= *after) {
            return Err(ScriptError::new(ScriptErrorKind::OpenFailed {
                path: path.display().to_string(),
                message: "injected open fault".to_string(),
            })
            .into());
        }
        *count += 1;
        drop(opens);

        Ok(Box::new(MemoryLineSource {
            path: path.to_path_buf(),
            lines: lines.into_iter(),
            served: 0,
            fault_after: self.read_faults.get(path).copied(),
        }))
    }
}

#[derive(Debug)]
struct MemoryLineSource {
    path: PathBuf,
    lines: std::vec::IntoIter<String>,
    served: usize,
    fault_after: Option<usize>,
}

#[async_trait]
impl LineSource for MemoryLineSource {
    async fn next_line(&mut self) -> FablerResult<Option<String>> {
        if self.fault_after.is_some_and(|after| self.served >= after) {
            return Err(ScriptError::new(ScriptErrorKind::ReadFailed {
                path: self.path.display().to_string(),
                message: "injected read fault".to_string(),
            })
            .into());
        }
        self.served += 1;
        Ok(self.lines.next())
    }
}

/// Read every non-blank line of `path`, right-trimmed.
///
/// Used for phrase banks and object lists, which are small and read whole.
pub async fn read_lines(loader: &dyn ScriptLoader, path: &Path) -> FablerResult<Vec<String>> {
    let mut source = loader.open(path).await?;
    let mut lines = Vec::new();
    while let Some(line) = source.next_line().await? {
        let line = line.trim_end();
        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}
