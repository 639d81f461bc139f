//! Turning raw env file bytes into an [`EnvMap`].
//!
//! The loader is decoder-agnostic: anything matching [`Decoder`] can be passed
//! to [`EnvLoader::decoder`](crate::EnvLoader::decoder), so JSON, YAML or TOML
//! files are handled by the caller with the crate of their choice.
//!
//! [`decode_plain`] is the built-in reference format: one `key=value` per line,
//! values taken verbatim.

use crate::error::DecodeError;
use crate::types::EnvMap;

/// Bytes in, key-value mapping out.
pub type Decoder = dyn Fn(&[u8]) -> Result<EnvMap, DecodeError> + Send + Sync;

/// Decode the reference `key=value` format.
///
/// - Input must be UTF-8.
/// - Lines are split on `\n`; empty lines are skipped.
/// - Each line splits on its first `=`. Everything after it, including more
///   `=` characters, is the value.
/// - There is no trimming, quoting, or comment syntax. A `\r` before the
///   newline stays part of the value.
/// - Duplicate keys: the later line wins.
pub fn decode_plain(bytes: &[u8]) -> Result<EnvMap, DecodeError> {
    let text = std::str::from_utf8(bytes)?;
    let mut map = EnvMap::new();

    for (i, line) in text.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(DecodeError::Format {
                line: line.to_string(),
                line_number: i + 1,
            });
        };
        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}
