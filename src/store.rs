//! Process-wide load-once state.
//!
//! An [`EnvStore`] starts unloaded. A successful [`EnvLoader::load`] commits
//! the decoded file exactly once; later loads fail with
//! [`EnvError::AlreadyLoaded`] until [`reset()`](EnvStore::reset).
//!
//! Two locks guard the store:
//!
//! - a load mutex, held for the whole load (already-loaded check, discovery,
//!   read, decode, validation, commit), so at most one load succeeds;
//! - a read-write lock over the committed state, taken only briefly by
//!   lookups and by the final commit.
//!
//! Lookups never wait on a load in progress. A lookup racing the first load
//! may still see the unloaded state.

use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::builder::EnvLoader;
use crate::error::EnvError;
use crate::key::EnvKey;
use crate::lookup::lookup;
use crate::native::NativeEnv;
use crate::types::{EnvMap, EnvPreference};

static GLOBAL: LazyLock<EnvStore> = LazyLock::new(EnvStore::new);

#[derive(Debug, Default)]
struct LoadState {
    loaded: bool,
    env: Arc<EnvMap>,
    preference: EnvPreference,
}

/// Loaded env file plus the native environment, queried by key.
#[derive(Debug, Default)]
pub struct EnvStore {
    load_lock: Mutex<()>,
    state: RwLock<LoadState>,
    native: NativeEnv,
}

impl EnvStore {
    /// A fresh, unloaded store backed by the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh store reading native values from `native` instead of the
    /// process environment.
    pub fn with_native(native: NativeEnv) -> Self {
        Self {
            native,
            ..Self::default()
        }
    }

    /// The process-wide store.
    pub fn global() -> &'static EnvStore {
        &GLOBAL
    }

    /// Start configuring a load into this store.
    pub fn loader(&self) -> EnvLoader<'_> {
        EnvLoader::new(self)
    }

    fn read(&self) -> RwLockReadGuard<'_, LoadState> {
        // State is only ever replaced wholesale, so a poisoned lock is still consistent.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LoadState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `load` under the load lock and commit its result.
    ///
    /// `preference` of `None` keeps the current preference.
    pub(crate) fn load_with<F>(
        &self,
        preference: Option<EnvPreference>,
        load: F,
    ) -> Result<(), EnvError>
    where
        F: FnOnce(&NativeEnv) -> Result<EnvMap, EnvError>,
    {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.read().loaded {
            warn!("env store already loaded, rejecting second load");
            return Err(EnvError::AlreadyLoaded);
        }

        let env = load(&self.native)?;

        let mut state = self.write();
        let preference = preference.unwrap_or(state.preference);
        info!(keys = env.len(), %preference, "env file loaded");
        *state = LoadState {
            loaded: true,
            env: Arc::new(env),
            preference,
        };
        Ok(())
    }

    /// Look up `key` under the current preference.
    pub fn get<K: EnvKey + ?Sized>(&self, key: &K) -> Option<String> {
        let (env, preference) = {
            let state = self.read();
            (Arc::clone(&state.env), state.preference)
        };
        lookup(key.as_env_key(), preference, &env, &self.native)
    }

    /// Look up `key`, falling back to `default`.
    pub fn get_or<K: EnvKey + ?Sized>(&self, key: &K, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Whether `key` resolves to a value under the current preference.
    pub fn contains<K: EnvKey + ?Sized>(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Read-only view of the loaded file's mapping (empty before load).
    pub fn snapshot(&self) -> Arc<EnvMap> {
        Arc::clone(&self.read().env)
    }

    pub fn is_loaded(&self) -> bool {
        self.read().loaded
    }

    pub fn preference(&self) -> EnvPreference {
        self.read().preference
    }

    /// Change how file and native values are merged during lookup.
    /// The loaded mapping itself is untouched.
    pub fn set_preference(&self, preference: EnvPreference) {
        self.write().preference = preference;
    }

    /// Return to the unloaded state with an empty mapping and the default
    /// preference. Intended for tests.
    pub fn reset(&self) {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.write() = LoadState::default();
    }
}

/// Start a load into the process-wide store.
pub fn loader() -> EnvLoader<'static> {
    EnvStore::global().loader()
}

/// Look up `key` in the process-wide store.
pub fn get<K: EnvKey + ?Sized>(key: &K) -> Option<String> {
    EnvStore::global().get(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{env_dir, isolated_store};
    use crate::types::EnvDir;
    use std::thread;

    fn path_of(dir: &tempfile::TempDir) -> EnvDir {
        EnvDir::Path(dir.path().to_path_buf())
    }

    #[test]
    fn starts_unloaded() {
        let store = isolated_store([]);
        assert!(!store.is_loaded());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.preference(), EnvPreference::FileFirst);
    }

    #[test]
    fn lookup_before_load_uses_native() {
        let store = isolated_store([("HOST", "native-host")]);
        assert_eq!(store.get("HOST").as_deref(), Some("native-host"));
        store.set_preference(EnvPreference::FileOnly);
        assert_eq!(store.get("HOST"), None);
    }

    #[test]
    fn load_default_file() {
        let dir = env_dir(&[(".env", "HOST=localhost\nURL=a=b=c\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).load().unwrap();

        assert!(store.is_loaded());
        assert_eq!(store.get("HOST").as_deref(), Some("localhost"));
        assert_eq!(store.get("URL").as_deref(), Some("a=b=c"));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn explicit_selector_beats_dotenv_var() {
        let dir = env_dir(&[
            (".env", "STAGE=default\n"),
            (".env.dev", "STAGE=dev\n"),
            (".env.prod", "STAGE=prod\n"),
        ]);
        let store = isolated_store([("DOTENV", "dev")]);
        store.loader().dir(path_of(&dir)).selector("prod").load().unwrap();
        assert_eq!(store.get("STAGE").as_deref(), Some("prod"));
    }

    #[test]
    fn dotenv_var_beats_default() {
        let dir = env_dir(&[(".env", "STAGE=default\n"), (".env.dev", "STAGE=dev\n")]);
        let store = isolated_store([("DOTENV", "dev")]);
        store.loader().dir(path_of(&dir)).load().unwrap();
        assert_eq!(store.get("STAGE").as_deref(), Some("dev"));
    }

    #[test]
    fn default_used_without_selector() {
        let dir = env_dir(&[(".env", "STAGE=default\n"), (".env.dev", "STAGE=dev\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).load().unwrap();
        assert_eq!(store.get("STAGE").as_deref(), Some("default"));
    }

    #[test]
    fn second_load_fails_and_keeps_first_result() {
        let dir = env_dir(&[(".env", "A=first\n"), (".env.other", "A=second\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).load().unwrap();
        let before = store.snapshot();

        let err = store
            .loader()
            .dir(path_of(&dir))
            .selector("other")
            .preference(EnvPreference::NativeOnly)
            .load()
            .unwrap_err();

        assert!(matches!(err, EnvError::AlreadyLoaded));
        assert_eq!(*store.snapshot(), *before);
        assert_eq!(store.get("A").as_deref(), Some("first"));
        assert_eq!(store.preference(), EnvPreference::FileFirst);
    }

    #[test]
    fn required_keys_from_file() {
        let dir = env_dir(&[(".env", "PASS=hunter2\ntestValue=1\n")]);
        let store = isolated_store([]);
        store
            .loader()
            .dir(path_of(&dir))
            .required(["PASS", "testValue"])
            .load()
            .unwrap();
        assert_eq!(store.get("PASS").as_deref(), Some("hunter2"));
        assert_eq!(store.get("testValue").as_deref(), Some("1"));
    }

    #[test]
    fn required_key_satisfied_by_native_under_file_only() {
        let dir = env_dir(&[(".env", "A=1\n")]);
        let store = isolated_store([("TOKEN", "t")]);
        store
            .loader()
            .dir(path_of(&dir))
            .require("TOKEN")
            .preference(EnvPreference::FileOnly)
            .load()
            .unwrap();
        assert_eq!(store.get("TOKEN"), None);
    }

    #[test]
    fn missing_required_key_leaves_store_unloaded() {
        let dir = env_dir(&[(".env", "PASS=x\n")]);
        let store = isolated_store([]);
        let err = store
            .loader()
            .dir(path_of(&dir))
            .required(["PASS", "NOT_ANYWHERE"])
            .preference(EnvPreference::NativeOnly)
            .load()
            .unwrap_err();

        match err {
            EnvError::MissingRequiredKeys(keys) => assert_eq!(keys, vec!["NOT_ANYWHERE"]),
            other => panic!("Expected MissingRequiredKeys, got: {other:?}"),
        }
        assert!(!store.is_loaded());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.preference(), EnvPreference::FileFirst);

        // A failed load does not block a later one.
        store.loader().dir(path_of(&dir)).load().unwrap();
        assert!(store.is_loaded());
    }

    #[test]
    fn format_error_leaves_store_unloaded() {
        let dir = env_dir(&[(".env", "GOOD=1\nBAD LINE\n")]);
        let store = isolated_store([]);
        let err = store.loader().dir(path_of(&dir)).load().unwrap_err();
        match err {
            EnvError::FormatInvalid { line, .. } => assert_eq!(line, "BAD LINE"),
            other => panic!("Expected FormatInvalid, got: {other:?}"),
        }
        assert!(!store.is_loaded());
        assert_eq!(store.get("GOOD"), None);
    }

    #[test]
    fn invalid_utf8_file_is_encoding_invalid() {
        let dir = env_dir(&[]);
        std::fs::write(dir.path().join(".env"), b"KEY=\xff\xfe\n").unwrap();
        let store = isolated_store([]);
        let err = store.loader().dir(path_of(&dir)).load().unwrap_err();
        assert!(matches!(err, EnvError::EncodingInvalid { .. }));
        assert!(!store.is_loaded());
    }

    #[test]
    fn no_file_for_selector() {
        let dir = env_dir(&[(".env.prod", "A=1\n")]);
        let store = isolated_store([]);
        let err = store.loader().dir(path_of(&dir)).load().unwrap_err();
        match err {
            EnvError::NoFileForSelector {
                selector,
                available,
            } => {
                assert_eq!(selector, "default");
                assert_eq!(available, vec!["prod"]);
            }
            other => panic!("Expected NoFileForSelector, got: {other:?}"),
        }
    }

    #[test]
    fn preference_round_trip() {
        let dir = env_dir(&[(".env", "SHARED=file\n")]);
        let store = isolated_store([("SHARED", "native")]);
        store.loader().dir(path_of(&dir)).load().unwrap();

        let expected = [
            (EnvPreference::FileFirst, "file"),
            (EnvPreference::FileOnly, "file"),
            (EnvPreference::NativeFirst, "native"),
            (EnvPreference::NativeOnly, "native"),
        ];
        for (pref, value) in expected {
            store.set_preference(pref);
            assert_eq!(store.get("SHARED").as_deref(), Some(value), "preference {pref}");
        }
    }

    #[test]
    fn preference_set_by_loader() {
        let dir = env_dir(&[(".env", "SHARED=file\n")]);
        let store = isolated_store([("SHARED", "native")]);
        store
            .loader()
            .dir(path_of(&dir))
            .preference(EnvPreference::NativeFirst)
            .load()
            .unwrap();
        assert_eq!(store.preference(), EnvPreference::NativeFirst);
        assert_eq!(store.get("SHARED").as_deref(), Some("native"));
    }

    #[test]
    fn preference_set_before_load_is_kept() {
        let dir = env_dir(&[(".env", "SHARED=file\n")]);
        let store = isolated_store([("SHARED", "native")]);
        store.set_preference(EnvPreference::NativeOnly);
        store.loader().dir(path_of(&dir)).load().unwrap();
        assert_eq!(store.preference(), EnvPreference::NativeOnly);
    }

    #[test]
    fn reset_restores_initial_state_and_allows_reload() {
        let dir = env_dir(&[(".env", "A=1\n"), (".env.next", "A=2\n")]);
        let store = isolated_store([]);
        store
            .loader()
            .dir(path_of(&dir))
            .preference(EnvPreference::FileOnly)
            .load()
            .unwrap();

        store.reset();
        assert!(!store.is_loaded());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.preference(), EnvPreference::FileFirst);
        assert_eq!(store.get("A"), None);

        store.loader().dir(path_of(&dir)).selector("next").load().unwrap();
        assert_eq!(store.get("A").as_deref(), Some("2"));
    }

    #[test]
    fn snapshot_outlives_reset() {
        let dir = env_dir(&[(".env", "A=1\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).load().unwrap();
        let view = store.snapshot();
        store.reset();
        assert_eq!(view["A"], "1");
    }

    #[test]
    fn get_or_and_contains() {
        let dir = env_dir(&[(".env", "A=1\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).load().unwrap();
        assert_eq!(store.get_or("A", "x"), "1");
        assert_eq!(store.get_or("B", "x"), "x");
        assert!(store.contains("A"));
        assert!(!store.contains("B"));
    }

    #[test]
    fn typed_keys_work() {
        enum Key {
            Port,
        }
        impl EnvKey for Key {
            fn as_env_key(&self) -> &str {
                match self {
                    Key::Port => "PORT",
                }
            }
        }

        let dir = env_dir(&[(".env", "PORT=8080\n")]);
        let store = isolated_store([]);
        store.loader().dir(path_of(&dir)).require(&Key::Port).load().unwrap();
        assert_eq!(store.get(&Key::Port).as_deref(), Some("8080"));
    }

    #[test]
    fn concurrent_loads_only_one_succeeds() {
        let dir = env_dir(&[(".env", "A=1\n")]);
        let store = isolated_store([]);
        let results: Vec<Result<(), EnvError>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| store.loader().dir(path_of(&dir)).load()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let already = results
            .iter()
            .filter(|r| matches!(r, Err(EnvError::AlreadyLoaded)))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(already, 7);
        assert_eq!(store.get("A").as_deref(), Some("1"));
    }

    #[test]
    fn global_store_is_shared() {
        assert!(std::ptr::eq(EnvStore::global(), EnvStore::global()));
    }
}
