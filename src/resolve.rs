//! Decode-and-validate step of a load, run on bytes already read from disk.
//!
//! No I/O happens here, so the step is testable with synthetic inputs:
//!
//! 1. Decode the file bytes with the active decoder
//! 2. Check required keys against the decoded map and the native environment

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::decode::Decoder;
use crate::error::EnvError;
use crate::native::NativeEnv;
use crate::types::EnvMap;
use crate::validate;

/// Everything a load gathered from disk. No I/O happens past this point.
#[derive(Debug, Clone)]
pub struct ResolveInput {
    /// The selector that picked the file.
    pub selector: String,
    /// Path of the selected file, for diagnostics.
    pub path: PathBuf,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Keys that must exist in the file or the native environment.
    pub required: BTreeSet<String>,
}

/// Decode `input.bytes` and validate required keys.
pub fn resolve(
    input: ResolveInput,
    decoder: &Decoder,
    native: &NativeEnv,
) -> Result<EnvMap, EnvError> {
    let env = decoder(&input.bytes).map_err(|e| EnvError::from_decode(input.path.clone(), e))?;

    debug!(selector = %input.selector, keys = env.len(), "decoded env file");

    if !input.required.is_empty() {
        validate::validate_required(&input.required, &env, native)?;
    }

    Ok(env)
}
