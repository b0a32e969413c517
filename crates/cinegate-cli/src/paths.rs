//! Where cinegate keeps its config file and cache database.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Per-application directory name under the XDG roots.
const APP_DIR: &str = "cinegate";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Cache database file name.
const DATABASE_FILE: &str = "cinegate.db";

/// Resolved file locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// TOML config read by `browse` and `search`.
    pub config_file: PathBuf,
    /// `SQLite` cache used by `browse`.
    pub database_file: PathBuf,
}

impl AppPaths {
    /// Resolves both files from `--dir` or the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no `--dir` is given and neither the XDG
    /// variables nor `HOME` locate a base directory.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        Self::from_lookup(dir, |name| std::env::var_os(name))
    }

    /// Resolves both files using `lookup` for environment variables.
    ///
    /// With `dir`, both files live directly in it. Otherwise the config
    /// goes under `$XDG_CONFIG_HOME` (default `~/.config`) and the
    /// database under `$XDG_DATA_HOME` (default `~/.local/share`), each
    /// in a `cinegate` subdirectory. Relative XDG values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a base directory cannot be determined.
    pub fn from_lookup(
        dir: Option<&Path>,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self> {
        if let Some(dir) = dir {
            return Ok(Self {
                config_file: dir.join(CONFIG_FILE),
                database_file: dir.join(DATABASE_FILE),
            });
        }

        let base = |xdg_var: &str, fallback: &[&str]| -> Result<PathBuf> {
            let xdg = lookup(xdg_var)
                .map(PathBuf::from)
                .filter(|path| path.is_absolute());
            let root = match xdg {
                Some(root) => root,
                None => {
                    let home = lookup("HOME")
                        .filter(|home| !home.is_empty())
                        .with_context(|| format!("neither {xdg_var} nor HOME is set"))?;
                    fallback
                        .iter()
                        .fold(PathBuf::from(home), |path, part| path.join(part))
                }
            };
            Ok(root.join(APP_DIR))
        };

        Ok(Self {
            config_file: base("XDG_CONFIG_HOME", &[".config"])?.join(CONFIG_FILE),
            database_file: base("XDG_DATA_HOME", &[".local", "share"])?.join(DATABASE_FILE),
        })
    }
}
