use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use list_toolbar::{viewport::DEFAULT_MOBILE_BREAKPOINT, ClearPolicy, ToolbarOptions};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mobile_breakpoint: u32,
    pub clear_resets_sort: bool,
    pub viewport_width: u32,
    pub refetch_on_create: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            clear_resets_sort: false,
            viewport_width: 1280,
            refetch_on_create: true,
        }
    }
}

impl Settings {
    pub fn toolbar_options(&self) -> ToolbarOptions {
        ToolbarOptions {
            mobile_breakpoint: self.mobile_breakpoint,
            clear_policy: ClearPolicy {
                reset_sort: self.clear_resets_sort,
            },
            refetch_on_create: Some(self.refetch_on_create),
        }
    }
}

/// Defaults, then the settings file when present, then `APP__*` variables.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(parsed) = parse_var::<u32>(&var, "APP__MOBILE_BREAKPOINT") {
        settings.mobile_breakpoint = parsed;
    }
    if let Some(parsed) = parse_var::<bool>(&var, "APP__CLEAR_RESETS_SORT") {
        settings.clear_resets_sort = parsed;
    }
    if let Some(parsed) = parse_var::<u32>(&var, "APP__VIEWPORT_WIDTH") {
        settings.viewport_width = parsed;
    }
    if let Some(parsed) = parse_var::<bool>(&var, "APP__REFETCH_ON_CREATE") {
        settings.refetch_on_create = parsed;
    }
}

fn parse_var<T: std::str::FromStr>(var: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %raw, "config: ignoring unparsable override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
