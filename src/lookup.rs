use crate::native::NativeEnv;
use crate::types::{EnvMap, EnvPreference};

/// Resolve `key` against the file map and the native environment.
/// Pure read; an absent key yields `None`.
pub fn lookup(
    key: &str,
    preference: EnvPreference,
    file: &EnvMap,
    native: &NativeEnv,
) -> Option<String> {
    let from_file = || file.get(key).cloned();
    let from_native = || native.var(key);

    match preference {
        EnvPreference::FileFirst => from_file().or_else(from_native),
        EnvPreference::FileOnly => from_file(),
        EnvPreference::NativeFirst => from_native().or_else(from_file),
        EnvPreference::NativeOnly => from_native(),
    }
}
