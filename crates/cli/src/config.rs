use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use prioritizer::KeywordTables;
use tokio::fs;
use tracing::debug;

pub const CONFIG_DIR: &str = ".roadmap";
pub const CONFIG_FILE: &str = "config.toml";

/// Places searched for a config file when none is given, most specific first.
fn candidates(cwd: &Path) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(CONFIG_DIR).join(CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("roadmap").join(CONFIG_FILE));
    }
    paths
}

/// Load keyword tables.
///
/// An explicit path must exist. Otherwise the first existing candidate is used,
/// and built-in tables when there is none. A file that exists but does not parse
/// or validate is an error, never silently replaced by defaults.
pub async fn load(explicit: Option<&Path>, cwd: &Path) -> Result<KeywordTables> {
    if let Some(path) = explicit {
        return read(path).await;
    }

    for path in candidates(cwd) {
        if path.exists() {
            return read(&path).await;
        }
    }

    debug!("No config file found, using built-in tables");
    Ok(KeywordTables::default())
}

async fn read(path: &Path) -> Result<KeywordTables> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let tables: KeywordTables = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;

    tables
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;

    debug!(path = %path.display(), version = tables.version, "Config loaded successfully");
    Ok(tables)
}

/// Write the built-in tables to `<dir>/.roadmap/config.toml`.
///
/// Returns `None` when the file already exists and `force` is not set.
pub async fn write_default(dir: &Path, force: bool) -> Result<Option<PathBuf>> {
    let config_dir = dir.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        return Ok(None);
    }

    fs::create_dir_all(&config_dir).await?;
    let content = toml::to_string_pretty(&KeywordTables::default())?;
    fs::write(&config_path, content).await?;
    debug!(path = %config_path.display(), "Config saved successfully");

    Ok(Some(config_path))
}
