use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use shared::domain::UserId;
use url::Url;

pub const SETTINGS_FILE: &str = "finder.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub service_url: String,
    pub user_id: UserId,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:3001".into(),
            user_id: UserId::guest(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        apply_overrides(&mut settings, |key| {
            file_cfg.get(key).map(|value| match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        });
    }

    apply_overrides(&mut settings, |key| {
        let key = key.to_ascii_uppercase();
        std::env::var(format!("APP__{key}"))
            .or_else(|_| std::env::var(format!("FINDER_{key}")))
            .ok()
    });

    settings.service_url = normalize_service_url(&settings.service_url)?;
    Ok(settings)
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("service_url") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("user_id") {
        let v = v.trim();
        if !v.is_empty() {
            settings.user_id = UserId::new(v);
        }
    }
    if let Some(v) = lookup("request_timeout_secs") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
}

/// Trims whitespace and trailing slashes so endpoint paths can be appended directly.
pub fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Settings::default().service_url);
    }

    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid service url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "service url must start with http:// or https://, got '{trimmed}'"
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
