use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::protocol::{FilterKind, SortKind};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_path: PathBuf,
    pub default_filter: FilterKind,
    pub default_sort: SortKind,
    /// Fixed "now" for the time filters; the system clock when unset.
    pub now: Option<DateTime<Utc>>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: "./data/trip.json".into(),
            default_filter: FilterKind::Everything,
            default_sort: SortKind::Default,
            now: None,
            log_level: "info".into(),
        }
    }
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };
    apply_overrides(&mut settings, |name| std::env::var(name).ok())?;
    Ok(settings)
}

pub fn apply_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__DATA_PATH") {
        settings.data_path = v.into();
    }
    if let Some(v) = lookup("APP__DEFAULT_FILTER") {
        settings.default_filter = v.parse().context("invalid APP__DEFAULT_FILTER")?;
    }
    if let Some(v) = lookup("APP__DEFAULT_SORT") {
        settings.default_sort = v.parse().context("invalid APP__DEFAULT_SORT")?;
    }
    if let Some(v) = lookup("APP__NOW") {
        let now = DateTime::parse_from_rfc3339(v.trim()).context("invalid APP__NOW")?;
        settings.now = Some(now.with_timezone(&Utc));
    }
    if let Some(v) = lookup("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
