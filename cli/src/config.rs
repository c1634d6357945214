use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the database location, e.g. for running several instances side by side.
pub const DB_ENV_VAR: &str = "NUTRICALC_DB";

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::resolve(std::env::var_os(DB_ENV_VAR).map(PathBuf::from))
    }

    fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let (data_dir, db_path) = if let Some(db_path) = db_override {
            let data_dir = db_path
                .parent()
                .map(std::path::Path::to_path_buf)
                .unwrap_or_default();
            (data_dir, db_path)
        } else {
            let proj_dirs = ProjectDirs::from("", "", "nutricalc")
                .context("Could not determine home directory")?;
            let data_dir = proj_dirs.data_dir().to_path_buf();
            let db_path = data_dir.join("nutricalc.db");
            (data_dir, db_path)
        };

        if !data_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }

        tracing::debug!("Using database {}", db_path.display());
        Ok(Config { db_path })
    }
}
