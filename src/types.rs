//! Shared vocabulary types: where env files live and how file values relate to
//! the native environment.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Decoded contents of one env file: key to value.
pub type EnvMap = HashMap<String, String>;

/// Where to look for env files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnvDir {
    /// Current working directory.
    #[default]
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Platform config directory for the given app name (XDG on Linux,
    /// ~/Library/Application Support on macOS).
    Platform(String),
}

/// Precedence between values from the loaded file and the native environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvPreference {
    /// File value if present, else the native one.
    #[default]
    FileFirst,
    /// File value only.
    FileOnly,
    /// Native value if present, else the file one.
    NativeFirst,
    /// Native value only.
    NativeOnly,
}

impl EnvPreference {
    pub const ALL: [EnvPreference; 4] = [
        EnvPreference::FileFirst,
        EnvPreference::FileOnly,
        EnvPreference::NativeFirst,
        EnvPreference::NativeOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnvPreference::FileFirst => "file-first",
            EnvPreference::FileOnly => "file-only",
            EnvPreference::NativeFirst => "native-first",
            EnvPreference::NativeOnly => "native-only",
        }
    }
}

impl fmt::Display for EnvPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvPreference::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = EnvPreference::ALL.iter().map(|p| p.as_str()).collect();
                format!(
                    "unknown env preference '{s}', expected one of: {}",
                    names.join(", ")
                )
            })
    }
}
