use std::collections::HashMap;

/// Source of native environment values.
///
/// `Process` reads the live process environment on every call. `Fixed` holds a
/// synthetic snapshot so tests can exercise lookup and validation without
/// mutating the real environment.
#[derive(Debug, Clone, Default)]
pub enum NativeEnv {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl NativeEnv {
    pub fn from_pairs<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        NativeEnv::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of `key`, or `None` if unset or not valid unicode.
    pub fn var(&self, key: &str) -> Option<String> {
        match self {
            NativeEnv::Process => {
                if !is_valid_name(key) {
                    return None;
                }
                std::env::var(key).ok()
            }
            NativeEnv::Fixed(vars) => vars.get(key).cloned(),
        }
    }

    /// Whether `key` is set at all (including non-unicode values).
    pub fn contains(&self, key: &str) -> bool {
        match self {
            NativeEnv::Process => is_valid_name(key) && std::env::var_os(key).is_some(),
            NativeEnv::Fixed(vars) => vars.contains_key(key),
        }
    }
}

// Names the OS cannot store can never be set.
fn is_valid_name(key: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0'])
}
