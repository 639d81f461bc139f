//! Clap adapter for envstore.
//!
//! Compiled only with the `clap` Cargo feature (on by default). [`EnvArgs`]
//! is a clap derive struct you flatten into your own parser to get
//! `--env-dir`, `--env` and `--env-preference` flags. The only bridge to the
//! core is [`EnvArgs::apply()`], which copies the parsed flags onto an
//! [`EnvLoader`]; everything else goes through the clap-free API.

use std::path::PathBuf;

use clap::Args;

use crate::builder::EnvLoader;
use crate::types::{EnvDir, EnvPreference};

/// Clap-derived env file flags.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     env: EnvArgs,
/// }
///
/// let cli = Cli::parse();
/// cli.env.apply(envstore::loader()).load()?;
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct EnvArgs {
    /// Directory containing the .env files (default: current directory).
    #[arg(long = "env-dir", value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Which env file to load, e.g. "prod" for `.env.prod`. Overrides $DOTENV.
    #[arg(long = "env", value_name = "SELECTOR")]
    pub env: Option<String>,

    /// How file values and process environment values are merged
    /// (file-first, file-only, native-first, native-only).
    #[arg(long = "env-preference", value_name = "PREFERENCE")]
    pub env_preference: Option<EnvPreference>,
}

impl EnvArgs {
    /// Copy the flags that were given onto `loader`. Absent flags leave the
    /// loader's own settings alone.
    pub fn apply<'a>(self, mut loader: EnvLoader<'a>) -> EnvLoader<'a> {
        if let Some(dir) = self.env_dir {
            loader = loader.dir(EnvDir::Path(dir));
        }
        if let Some(selector) = &self.env {
            loader = loader.selector(selector);
        }
        if let Some(preference) = self.env_preference {
            loader = loader.preference(preference);
        }
        loader
    }
}
