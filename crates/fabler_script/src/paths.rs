//! Script file locations.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where session and story files live.
///
/// Session scripts and every file they name (phrase banks, repeating
/// scripts, object lists) resolve under `root/session_dir`. Story scripts
/// chosen by personalization resolve under `root/story_dir`. Empty
/// components are skipped, and an absolute file name replaces the prefix.
///
/// # Examples
///
/// ```
/// use fabler_script::ScriptPaths;
/// use std::path::PathBuf;
///
/// let paths = ScriptPaths::new("scripts", "session_scripts", "story_scripts");
/// assert_eq!(
///     paths.session_file("intro.txt"),
///     PathBuf::from("scripts/session_scripts/intro.txt")
/// );
/// assert_eq!(ScriptPaths::default().story_file("a.txt"), PathBuf::from("a.txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScriptPaths {
    /// Base directory
    #[serde(default)]
    root: PathBuf,
    /// Session script directory, relative to `root`
    #[serde(default)]
    session_dir: PathBuf,
    /// Story script directory, relative to `root`
    #[serde(default)]
    story_dir: PathBuf,
}

impl ScriptPaths {
    /// Create a new set of script locations.
    pub fn new(
        root: impl Into<PathBuf>,
        session_dir: impl Into<PathBuf>,
        story_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            session_dir: session_dir.into(),
            story_dir: story_dir.into(),
        }
    }

    /// Resolve a file named by a session script.
    pub fn session_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.resolve(&self.session_dir, name.as_ref())
    }

    /// Resolve a story script name returned by personalization.
    pub fn story_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.resolve(&self.story_dir, name.as_ref())
    }

    fn resolve(&self, dir: &Path, name: &Path) -> PathBuf {
        let mut path = PathBuf::new();
        for part in [self.root.as_path(), dir, name] {
            if !part.as_os_str().is_empty() {
                path.push(part);
            }
        }
        path
    }
}
