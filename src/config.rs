use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorecardConfig {
    /// Database file; relative paths are taken from the working directory
    pub database: Option<String>,
    /// Directory record sheets are written to when no output path is given
    pub reports_dir: Option<String>,
}

impl StorecardConfig {
    /// Database path: explicit flag, then config, then the default
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    /// Where to write a sheet named `file_name` when no output path is given
    pub fn report_path(&self, file_name: &str) -> PathBuf {
        match &self.reports_dir {
            Some(dir) => Path::new(dir).join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("storecard.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("storecard.db")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<StorecardConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: StorecardConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &StorecardConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the parent directory of `path` if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
