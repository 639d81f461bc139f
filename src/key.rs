//! Typed env keys.
//!
//! Store lookups take any [`EnvKey`], so plain strings work and applications
//! can also name their keys with an enum:
//!
//! ```
//! use envstore::EnvKey;
//!
//! enum AppKey {
//!     DatabaseUrl,
//!     Port,
//! }
//!
//! impl EnvKey for AppKey {
//!     fn as_env_key(&self) -> &str {
//!         match self {
//!             AppKey::DatabaseUrl => "DATABASE_URL",
//!             AppKey::Port => "PORT",
//!         }
//!     }
//! }
//!
//! assert_eq!(AppKey::Port.as_env_key(), "PORT");
//! ```

/// Anything that names an env key.
pub trait EnvKey {
    fn as_env_key(&self) -> &str;
}

impl EnvKey for str {
    fn as_env_key(&self) -> &str {
        self
    }
}

impl EnvKey for String {
    fn as_env_key(&self) -> &str {
        self
    }
}

impl EnvKey for Box<str> {
    fn as_env_key(&self) -> &str {
        self
    }
}

impl<K: EnvKey + ?Sized> EnvKey for &K {
    fn as_env_key(&self) -> &str {
        (**self).as_env_key()
    }
}
