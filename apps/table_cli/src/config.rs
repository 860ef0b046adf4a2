use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub token: Option<String>,
    pub autoload: bool,
    pub initialize_message: Option<String>,
    pub export_dir: PathBuf,
    pub page_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/table".into(),
            token: None,
            autoload: true,
            initialize_message: None,
            export_dir: "./exports".into(),
            page_url: "http://localhost/".into(),
        }
    }
}

/// Defaults, then `path` (flat TOML string map), then environment.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.get("endpoint") {
        settings.endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("token") {
        settings.token = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("autoload") {
        if let Some(parsed) = parse_flag(v) {
            settings.autoload = parsed;
        }
    }
    if let Some(v) = file_cfg.get("initialize_message") {
        settings.initialize_message = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("export_dir") {
        settings.export_dir = v.into();
    }
    if let Some(v) = file_cfg.get("page_url") {
        settings.page_url = v.clone();
    }
}

fn apply_env<F>(settings: &mut Settings, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = var("TABLE_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = var("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = var("TABLE_TOKEN") {
        settings.token = Some(v);
    }
    if let Some(v) = var("APP__TOKEN") {
        settings.token = Some(v);
    }

    if let Some(v) = var("APP__AUTOLOAD") {
        if let Some(parsed) = parse_flag(&v) {
            settings.autoload = parsed;
        }
    }

    if let Some(v) = var("APP__EXPORT_DIR") {
        settings.export_dir = v.into();
    }

    if let Some(v) = var("APP__PAGE_URL") {
        settings.page_url = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
