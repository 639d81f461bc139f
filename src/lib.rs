//! Load-once `.env` file selection with native environment fallback.
//!
//! Envstore picks one env file from a directory, decodes it into a key-value
//! map, checks that required keys exist, and commits the result to a store
//! that answers lookups for the rest of the process lifetime.
//!
//! ```ignore
//! envstore::loader()
//!     .required(["DATABASE_URL"])
//!     .load()?;
//!
//! let url = envstore::get("DATABASE_URL");
//! ```
//!
//! That call scans the working directory for `.env*` files, loads the one
//! named by `$DOTENV` (or `.env` when unset), fails if `DATABASE_URL` is in
//! neither the file nor the process environment, and commits the map to the
//! process-wide [`EnvStore`].
//!
//! # File naming
//!
//! | File | Selector |
//! |------|----------|
//! | `.env` | `default` |
//! | `.env.prod` | `prod` |
//! | `.env-dev` | `dev` |
//! | `.envtest` | `test` |
//!
//! Anything after the `.env` marker and one optional `.` or `-` separator is
//! the selector, taken verbatim. Subdirectories are not searched.
//!
//! # Choosing a file
//!
//! ```text
//! "default"                 built-in
//!        ↑ overridden by
//! $DOTENV                   .selector_var() renames it
//!        ↑ overridden by
//! .selector("prod")         explicit
//! ```
//!
//! A selector with no matching file fails the load with
//! [`EnvError::NoFileForSelector`], listing the selectors that were found.
//!
//! # File format
//!
//! The built-in decoder reads one `key=value` pair per line. The first `=`
//! separates key from value; the value is everything after it, verbatim.
//! There are no comments, quotes, or escapes, and empty lines are skipped.
//! A non-empty line without `=` fails the load.
//!
//! Other formats plug in through [`EnvLoader::decoder`], which takes any
//! `Fn(&[u8]) -> Result<EnvMap, DecodeError>`.
//!
//! # Lookup preference
//!
//! Each lookup consults the loaded file and the process environment according
//! to the store's [`EnvPreference`]:
//!
//! | Preference | Order |
//! |------------|-------|
//! | `FileFirst` (default) | file, then process env |
//! | `FileOnly` | file |
//! | `NativeFirst` | process env, then file |
//! | `NativeOnly` | process env |
//!
//! Required keys are checked against both sources regardless of preference.
//!
//! # Load once
//!
//! A store accepts one successful load. A second one fails with
//! [`EnvError::AlreadyLoaded`] and leaves the first result in place. Every
//! failed load leaves the store untouched, so it can be retried.
//! [`EnvStore::reset`] returns a store to its initial state, mostly for tests.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`EnvArgs`] adds `--env-dir`,
//! `--env` and `--env-preference` flags to an application's parser.
//!
//! # Error handling
//!
//! All load failures are [`EnvError`] values. With the `rich-errors` feature
//! they also implement `miette::Diagnostic`. Lookups never fail.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod decode;
mod file;
mod key;
mod lookup;
mod native;
mod resolve;
mod selector;
mod store;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::EnvLoader;
#[cfg(feature = "clap")]
pub use cli::EnvArgs;
pub use decode::{Decoder, decode_plain};
pub use error::{DecodeError, EnvError};
pub use file::{FileIndex, MARKER, discover};
pub use key::EnvKey;
pub use native::NativeEnv;
pub use selector::{DEFAULT_SELECTOR, SELECTOR_VAR};
pub use store::{EnvStore, get, loader};
pub use types::{EnvDir, EnvMap, EnvPreference};
