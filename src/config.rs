use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub thresholds: ThresholdsConfig,
    pub sources: SourcesConfig,
    /// Replaces the built-in classification rules when present. Order matters.
    pub groups: Option<Vec<GroupRuleConfig>>,
    /// Replaces the built-in interpreter tool markers when present.
    pub tools: Option<Vec<ToolMarkerConfig>>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub page_size_bytes: u64,
    pub pretty: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            page_size_bytes: 16384,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub script_label_min_mb: u64,
    pub script_include_min_mb: u64,
    pub command_label_chars: usize,
    pub session_min_mb: u64,
    pub session_primary_min_mb: u64,
    pub tab_fallback_min_mb: u64,
    pub tab_fallback_max_mb: u64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            script_label_min_mb: 50,
            script_include_min_mb: 10,
            command_label_chars: 40,
            session_min_mb: 20,
            session_primary_min_mb: 200,
            tab_fallback_min_mb: 50,
            tab_fallback_max_mb: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub browser_app: String,
    pub renderer_pattern: String,
    pub editor_app: String,
    pub editor_helper_pattern: String,
    pub interpreter_pattern: String,
    pub session_pattern: String,
    pub session_family: String,
    pub ignored_path_segments: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            browser_app: "Google Chrome".to_string(),
            renderer_pattern: r"Google Chrome Helper \(Renderer\)".to_string(),
            editor_app: "Code".to_string(),
            editor_helper_pattern: r"Code Helper".to_string(),
            interpreter_pattern: r"(?i)(^|/)python[0-9.]*(\s|$)|Python\.app".to_string(),
            session_pattern: r"(?i)\bclaude\b".to_string(),
            session_family: "claude".to_string(),
            ignored_path_segments: vec!["Users".to_string(), "home".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRuleConfig {
    pub label: String,
    pub pattern: String,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default = "default_group_color")]
    pub color: String,
}

fn default_group_color() -> String {
    "#8e8e93".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolMarkerConfig {
    pub marker: String,
    pub label: String,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("memscope").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
