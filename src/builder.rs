use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::decode::{Decoder, decode_plain};
use crate::error::{DecodeError, EnvError};
use crate::file;
use crate::key::EnvKey;
use crate::native::NativeEnv;
use crate::resolve::{self, ResolveInput};
use crate::selector::{self, SELECTOR_VAR};
use crate::store::EnvStore;
use crate::types::{EnvDir, EnvMap, EnvPreference};

/// Builder for a one-time load into an [`EnvStore`].
///
/// Every setting is optional:
///
/// - **Directory**: [`dir()`](Self::dir), default [`EnvDir::Cwd`].
/// - **Selector**: [`selector()`](Self::selector), else the `DOTENV` variable
///   (renamable with [`selector_var()`](Self::selector_var)), else `"default"`.
/// - **Decoder**: [`decoder()`](Self::decoder), default [`decode_plain`].
/// - **Required keys**: [`required()`](Self::required) / [`require()`](Self::require).
/// - **Preference**: [`preference()`](Self::preference), default keeps the
///   store's current preference.
pub struct EnvLoader<'a> {
    store: &'a EnvStore,
    dir: Option<EnvDir>,
    selector: Option<String>,
    selector_var: Option<String>,
    required: BTreeSet<String>,
    decoder: Option<Box<Decoder>>,
    preference: Option<EnvPreference>,
}

impl<'a> EnvLoader<'a> {
    pub(crate) fn new(store: &'a EnvStore) -> Self {
        Self {
            store,
            dir: None,
            selector: None,
            selector_var: None,
            required: BTreeSet::new(),
            decoder: None,
            preference: None,
        }
    }

    /// Directory to scan for env files (default: current working directory).
    pub fn dir(mut self, dir: EnvDir) -> Self {
        self.dir = Some(dir);
        self
    }

    /// Pick the env file explicitly, overriding the `DOTENV` variable.
    pub fn selector(mut self, name: &str) -> Self {
        self.selector = Some(name.to_string());
        self
    }

    /// Read the selector from a different native variable (default: `DOTENV`).
    pub fn selector_var(mut self, name: &str) -> Self {
        self.selector_var = Some(name.to_string());
        self
    }

    /// Add keys that must be present in the file or the native environment.
    pub fn required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Add a single required key, typed or plain.
    pub fn require<K: EnvKey + ?Sized>(mut self, key: &K) -> Self {
        self.required.insert(key.as_env_key().to_string());
        self
    }

    /// Replace the reference `key=value` decoder.
    pub fn decoder<F>(mut self, decoder: F) -> Self
    where
        F: Fn(&[u8]) -> Result<EnvMap, DecodeError> + Send + Sync + 'static,
    {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Preference committed together with the loaded file.
    pub fn preference(mut self, preference: EnvPreference) -> Self {
        self.preference = Some(preference);
        self
    }

    /// Resolve the effective directory, or error if it cannot be located.
    fn effective_dir(&self) -> Result<PathBuf, EnvError> {
        let dir = self.dir.clone().unwrap_or_default();
        file::resolve_env_dir(&dir).ok_or(EnvError::DirectoryUnresolved(dir))
    }

    fn effective_selector_var(&self) -> &str {
        self.selector_var.as_deref().unwrap_or(SELECTOR_VAR)
    }

    fn effective_decoder(&self) -> &Decoder {
        self.decoder.as_deref().unwrap_or(&decode_plain)
    }

    /// Discover, select and read the env file.
    fn build_input(&self, native: &NativeEnv) -> Result<ResolveInput, EnvError> {
        let dir = self.effective_dir()?;
        let index = file::discover(&dir)?;

        let override_value = native.var(self.effective_selector_var());
        let selector =
            selector::resolve_selector(self.selector.as_deref(), override_value.as_deref());
        let path = selector::select(&index, &selector)?.to_path_buf();
        debug!(selector, path = %path.display(), "selected env file");

        let bytes = file::read_env_file(&path)?;

        Ok(ResolveInput {
            selector,
            path,
            bytes,
            required: self.required.clone(),
        })
    }

    /// Run the load and commit the result to the store.
    ///
    /// Fails with [`EnvError::AlreadyLoaded`] if the store is already loaded.
    /// On any error the store is left exactly as it was.
    pub fn load(self) -> Result<(), EnvError> {
        let store = self.store;
        store.load_with(self.preference, |native| {
            let input = self.build_input(native)?;
            resolve::resolve(input, self.effective_decoder(), native)
        })
    }
}
