//! Env file discovery and reading.
//!
//! # Discovery
//!
//! An [`EnvDir`] is resolved to one concrete directory, whose entries are
//! listed (no recursion). Every regular file whose name starts with the
//! [`MARKER`] is a candidate:
//!
//! - `.env` itself registers under the reserved [`DEFAULT_SELECTOR`].
//! - Any other match has the marker and one optional [separator](SEPARATORS)
//!   stripped; the remainder is the selector, taken verbatim. `.env.prod`,
//!   `.env-prod` and `.envprod` all register as `prod`.
//!
//! When several files normalize to the same selector, the one enumerated last
//! wins. Directory enumeration order is filesystem dependent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EnvError;
use crate::selector::DEFAULT_SELECTOR;
use crate::types::EnvDir;

/// Filename prefix that marks a candidate env file.
pub const MARKER: &str = ".env";

/// Characters allowed between the marker and the selector name.
pub const SEPARATORS: [char; 2] = ['.', '-'];

/// Selector name → env file path, built fresh for every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    files: HashMap<String, PathBuf>,
}

impl FileIndex {
    pub fn get(&self, selector: &str) -> Option<&Path> {
        self.files.get(selector).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All registered selectors, sorted.
    pub fn selectors(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }

    fn insert(&mut self, selector: String, path: PathBuf) {
        if let Some(previous) = self.files.insert(selector.clone(), path) {
            debug!(
                selector,
                previous = %previous.display(),
                "duplicate env file selector, keeping the later entry"
            );
        }
    }
}

impl FromIterator<(String, PathBuf)> for FileIndex {
    fn from_iter<I: IntoIterator<Item = (String, PathBuf)>>(iter: I) -> Self {
        let mut index = FileIndex::default();
        for (selector, path) in iter {
            index.insert(selector, path);
        }
        index
    }
}

/// Resolve an [`EnvDir`] to a concrete directory.
///
/// Returns `None` if it cannot be resolved (e.g. no home directory found).
pub fn resolve_env_dir(dir: &EnvDir) -> Option<PathBuf> {
    match dir {
        EnvDir::Cwd => std::env::current_dir().ok(),
        EnvDir::Path(p) => Some(p.clone()),
        EnvDir::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        EnvDir::Platform(app_name) => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
    }
}

/// Map a file name to its selector, or `None` if it is not an env file.
pub fn selector_for(file_name: &str) -> Option<String> {
    let rest = file_name.strip_prefix(MARKER)?;
    if rest.is_empty() {
        return Some(DEFAULT_SELECTOR.to_string());
    }
    let name = rest.strip_prefix(SEPARATORS).unwrap_or(rest);
    Some(name.to_string())
}

/// List `dir` and index every env file found in it.
pub fn discover(dir: &Path) -> Result<FileIndex, EnvError> {
    let unreadable = |source| EnvError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut index = FileIndex::default();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            debug!(path = %path.display(), "skipping non-unicode file name");
            continue;
        };
        let Some(selector) = selector_for(&file_name) else {
            continue;
        };
        if path.is_dir() {
            debug!(path = %path.display(), "skipping directory with env marker");
            continue;
        }
        index.insert(selector, path);
    }

    debug!(dir = %dir.display(), selectors = ?index.selectors(), "discovered env files");
    Ok(index)
}

/// Read the raw bytes of the selected env file.
pub fn read_env_file(path: &Path) -> Result<Vec<u8>, EnvError> {
    std::fs::read(path).map_err(|source| EnvError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
