//! Required-key validation.
//!
//! A required key is satisfied if it is present in the decoded file or in the
//! native environment, independent of the active [`EnvPreference`](crate::EnvPreference).

use std::collections::BTreeSet;

use crate::error::EnvError;
use crate::native::NativeEnv;
use crate::types::EnvMap;

/// Check that every `required` key exists in `file` or `native`.
///
/// All missing keys are reported at once, sorted. An empty `required` set
/// always passes.
pub fn validate_required(
    required: &BTreeSet<String>,
    file: &EnvMap,
    native: &NativeEnv,
) -> Result<(), EnvError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !file.contains_key(key.as_str()) && !native.contains(key))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EnvError::MissingRequiredKeys(missing))
    }
}
