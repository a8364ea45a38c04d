//! User configuration loading from `~/.quack/config.toml`.

use crate::ui::theme::ThemePalette;
use anyhow::{Context, Result, anyhow};
use ratatui::style::Color;
use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = ".quack";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_DEBOUNCE_MS: u64 = 1000;
const DEFAULT_REVIEW_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_CONFIG_TOML: &str = r##"# quack configuration
# Colors accept `#RRGGBB` or named ANSI colors (e.g. "yellow", "dark_gray").

[sync]
# Deployment URL of the code record store, e.g. "https://your-app.convex.cloud".
# deployment_url = ""
# User identifier owning the code record. Overridable with `--user`.
# user_id = ""
# Quiet period after the last edit before a save is attempted.
debounce_ms = 1000

[review]
model = "gemini-2.5-flash"
# API key for the review model. GEMINI_API_KEY takes precedence when set.
# api_key = ""

[agent]
# WebSocket endpoint of the voice-agent session. Leave unset to disable the bridge.
# endpoint = "wss://..."

[theme]
border = "#c47832"
title = "#ebaa5a"
dim = "dark_gray"
text = "#d2d2c8"
selected_fg = "black"
selected_bg = "#e2b45c"
issue = "#e7b258"
error = "red"
info = "cyan"
duck = "#f5cd52"
saved = "green"
saving = "cyan"
unsaved = "yellow"
line_number = "dark_gray"
inline_code_fg = "yellow"
inline_code_bg = "#282828"
section_title = "light_yellow"
"##;

/// Application configuration loaded from disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sync: SyncSettings,
    pub review: ReviewSettings,
    pub agent: AgentSettings,
    pub theme: ThemePalette,
}

/// Buffer-to-store synchronization settings.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub deployment_url: Option<String>,
    pub user_id: Option<String>,
    pub debounce: Duration,
}

/// Review model settings.
#[derive(Debug, Clone)]
pub struct ReviewSettings {
    pub model: String,
    pub api_key: Option<SecretString>,
}

/// Voice-agent bridge settings.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub endpoint: Option<String>,
}

/// Returns the config file path and creates default config if missing.
pub fn ensure_config_file() -> Result<PathBuf> {
    let path = config_path()?;
    ensure_default_config(&path)?;
    Ok(path)
}

/// Loads configuration from `~/.quack/config.toml`, creating defaults if missing.
pub fn load_or_create() -> Result<AppConfig> {
    let path = ensure_config_file()?;
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;

    parse_config(&content).with_context(|| format!("invalid config in {}", path.display()))
}

/// Returns the directory used for rolling log files.
pub fn log_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_DIR).join("logs"))
}

fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content).context("failed to parse TOML")?;

    let theme = raw.theme.into_theme()?;
    let sync = SyncSettings {
        deployment_url: non_empty(raw.sync.deployment_url),
        user_id: non_empty(raw.sync.user_id),
        debounce: Duration::from_millis(raw.sync.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
    };
    let review = ReviewSettings {
        model: non_empty(raw.review.model).unwrap_or_else(|| DEFAULT_REVIEW_MODEL.to_owned()),
        api_key: non_empty(raw.review.api_key).map(SecretString::from),
    };
    let agent = AgentSettings {
        endpoint: non_empty(raw.agent.endpoint),
    };

    Ok(AppConfig {
        sync,
        review,
        agent,
        theme,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn home_dir() -> Result<PathBuf> {
    let home =
        env::var_os("HOME").ok_or_else(|| anyhow!("HOME environment variable is not set"))?;
    Ok(PathBuf::from(home))
}

fn config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn ensure_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("invalid config path: {}", path.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write default config file {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    sync: RawSync,
    review: RawReview,
    agent: RawAgent,
    theme: RawTheme,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSync {
    deployment_url: Option<String>,
    user_id: Option<String>,
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawReview {
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAgent {
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTheme {
    border: Option<String>,
    title: Option<String>,
    dim: Option<String>,
    text: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    issue: Option<String>,
    error: Option<String>,
    info: Option<String>,
    duck: Option<String>,
    saved: Option<String>,
    saving: Option<String>,
    unsaved: Option<String>,
    line_number: Option<String>,
    inline_code_fg: Option<String>,
    inline_code_bg: Option<String>,
    section_title: Option<String>,
}

impl RawTheme {
    fn into_theme(self) -> Result<ThemePalette> {
        let defaults = ThemePalette::default();

        Ok(ThemePalette {
            border: parse_or_default(self.border, defaults.border, "theme.border")?,
            title: parse_or_default(self.title, defaults.title, "theme.title")?,
            dim: parse_or_default(self.dim, defaults.dim, "theme.dim")?,
            text: parse_or_default(self.text, defaults.text, "theme.text")?,
            selected_fg: parse_or_default(
                self.selected_fg,
                defaults.selected_fg,
                "theme.selected_fg",
            )?,
            selected_bg: parse_or_default(
                self.selected_bg,
                defaults.selected_bg,
                "theme.selected_bg",
            )?,
            issue: parse_or_default(self.issue, defaults.issue, "theme.issue")?,
            error: parse_or_default(self.error, defaults.error, "theme.error")?,
            info: parse_or_default(self.info, defaults.info, "theme.info")?,
            duck: parse_or_default(self.duck, defaults.duck, "theme.duck")?,
            saved: parse_or_default(self.saved, defaults.saved, "theme.saved")?,
            saving: parse_or_default(self.saving, defaults.saving, "theme.saving")?,
            unsaved: parse_or_default(self.unsaved, defaults.unsaved, "theme.unsaved")?,
            line_number: parse_or_default(
                self.line_number,
                defaults.line_number,
                "theme.line_number",
            )?,
            inline_code_fg: parse_or_default(
                self.inline_code_fg,
                defaults.inline_code_fg,
                "theme.inline_code_fg",
            )?,
            inline_code_bg: parse_or_default(
                self.inline_code_bg,
                defaults.inline_code_bg,
                "theme.inline_code_bg",
            )?,
            section_title: parse_or_default(
                self.section_title,
                defaults.section_title,
                "theme.section_title",
            )?,
        })
    }
}

fn parse_or_default(value: Option<String>, default: Color, field: &str) -> Result<Color> {
    match value {
        Some(raw) => parse_color(raw.trim())
            .with_context(|| format!("invalid color value for `{field}`: {raw}")),
        None => Ok(default),
    }
}

fn parse_color(raw: &str) -> Result<Color> {
    if let Some(hex) = raw.strip_prefix('#') {
        if hex.len() != 6 {
            return Err(anyhow!("hex colors must be in #RRGGBB format"));
        }
        let red = u8::from_str_radix(&hex[0..2], 16).context("invalid red hex channel")?;
        let green = u8::from_str_radix(&hex[2..4], 16).context("invalid green hex channel")?;
        let blue = u8::from_str_radix(&hex[4..6], 16).context("invalid blue hex channel")?;
        return Ok(Color::Rgb(red, green, blue));
    }

    let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    let color = match normalized.as_str() {
        "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" => Color::DarkGray,
        "light_red" => Color::LightRed,
        "light_green" => Color::LightGreen,
        "light_yellow" => Color::LightYellow,
        "light_blue" => Color::LightBlue,
        "light_magenta" => Color::LightMagenta,
        "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return Err(anyhow!("unsupported color format")),
    };

    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CONFIG_TOML, ensure_default_config, parse_color, parse_config};
    use ratatui::style::Color;
    use std::time::Duration;

    #[test]
    fn parse_color_supports_hex() {
        assert_eq!(
            parse_color("#112233").unwrap(),
            Color::Rgb(0x11, 0x22, 0x33)
        );
    }

    #[test]
    fn parse_color_supports_named_values() {
        assert_eq!(parse_color("light_yellow").unwrap(), Color::LightYellow);
        assert_eq!(parse_color("dark-gray").unwrap(), Color::DarkGray);
    }

    #[test]
    fn default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG_TOML).expect("default config must parse");
        assert_eq!(config.sync.debounce, Duration::from_millis(1000));
        assert_eq!(config.review.model, "gemini-2.5-flash");
        assert!(config.sync.deployment_url.is_none());
        assert!(config.agent.endpoint.is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").expect("empty config must parse");
        assert_eq!(config.sync.debounce, Duration::from_millis(1000));
        assert!(config.review.api_key.is_none());
    }

    #[test]
    fn blank_strings_are_treated_as_unset() {
        let config = parse_config("[sync]\ndeployment_url = \"  \"\nuser_id = \"\"\n").unwrap();
        assert!(config.sync.deployment_url.is_none());
        assert!(config.sync.user_id.is_none());
    }

    #[test]
    fn ensure_default_config_writes_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        ensure_default_config(&path).expect("create default config");
        let first = std::fs::read_to_string(&path).unwrap();

        std::fs::write(&path, "[sync]\ndebounce_ms = 250\n").unwrap();
        ensure_default_config(&path).expect("existing config untouched");
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, DEFAULT_CONFIG_TOML);
        assert_eq!(second, "[sync]\ndebounce_ms = 250\n");
    }
}
