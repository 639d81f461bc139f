use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

use crate::types::EnvDir;

/// Failure while turning raw file bytes into an [`EnvMap`](crate::EnvMap).
///
/// Decoders (built-in or caller-supplied) report this; the loader attaches the
/// file path and surfaces it as an [`EnvError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("File is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    #[error("Expected 'key=value' on line {line_number}: {line}")]
    Format { line: String, line_number: usize },

    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// Wrap any displayable failure from a custom decoder.
    pub fn custom(reason: impl std::fmt::Display) -> Self {
        DecodeError::Custom(reason.to_string())
    }
}

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum EnvError {
    #[error("Failed to list env directory {path}: {source}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envstore::directory_unreadable),
            help("check that the directory exists and is readable")
        )
    )]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not resolve env directory {0:?}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envstore::directory_unresolved)))]
    DirectoryUnresolved(EnvDir),

    #[error("No env file for selector '{selector}' (found: {})", format_available(.available))]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envstore::no_file_for_selector),
            help("add a '.env.<selector>' file or change the DOTENV variable")
        )
    )]
    NoFileForSelector {
        selector: String,
        available: Vec<String>,
    },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envstore::read_failed)))]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envstore::encoding_invalid)))]
    EncodingInvalid { path: PathBuf, source: Utf8Error },

    #[error("Invalid line {line_number} in {path}, expected 'key=value': {line}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envstore::format_invalid),
            help("every non-empty line must contain a '=' separator")
        )
    )]
    FormatInvalid {
        path: PathBuf,
        line: String,
        line_number: usize,
    },

    #[error("Failed to decode {path}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envstore::decode_failed)))]
    DecodeFailed { path: PathBuf, reason: String },

    #[error("Environment already loaded — call .reset() before loading again")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envstore::already_loaded)))]
    AlreadyLoaded,

    #[error("Missing required keys: {}", .0.join(", "))]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envstore::missing_required_keys),
            help("set them in the env file or the process environment")
        )
    )]
    MissingRequiredKeys(Vec<String>),
}

impl EnvError {
    /// Attach the file path to a decoder failure.
    pub(crate) fn from_decode(path: PathBuf, err: DecodeError) -> Self {
        match err {
            DecodeError::Encoding(source) => EnvError::EncodingInvalid { path, source },
            DecodeError::Format { line, line_number } => EnvError::FormatInvalid {
                path,
                line,
                line_number,
            },
            DecodeError::Custom(reason) => EnvError::DecodeFailed { path, reason },
        }
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
