//! Choosing which discovered env file to load.
//!
//! Precedence: explicit selector from the caller, then the override variable
//! (`DOTENV` unless renamed on the loader), then [`DEFAULT_SELECTOR`].

use std::path::Path;

use crate::error::EnvError;
use crate::file::FileIndex;

/// Selector used when neither the caller nor the environment names one.
/// Also the selector of the bare `.env` file.
pub const DEFAULT_SELECTOR: &str = "default";

/// Native variable consulted for the selector.
pub const SELECTOR_VAR: &str = "DOTENV";

/// Pick the selector. An empty override value counts as unset.
pub fn resolve_selector(explicit: Option<&str>, override_value: Option<&str>) -> String {
    explicit
        .or(override_value.filter(|v| !v.is_empty()))
        .unwrap_or(DEFAULT_SELECTOR)
        .to_string()
}

/// Look the selector up in the index.
pub fn select<'a>(index: &'a FileIndex, selector: &str) -> Result<&'a Path, EnvError> {
    index
        .get(selector)
        .ok_or_else(|| EnvError::NoFileForSelector {
            selector: selector.to_string(),
            available: index.selectors(),
        })
}
