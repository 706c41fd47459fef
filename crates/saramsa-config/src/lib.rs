mod config;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use saramsa_core::{SaramsaError, SaramsaResult, validate_url};
use tracing::debug;

pub use config::{
    ApiConfig, DEFAULT_ENDPOINT, DisplayConfig, OutputConfig, SaramsaConfig, Theme,
};

pub const ENDPOINT_ENV: &str = "SARAMSA_ENDPOINT";
pub const SIMPLE_OUTPUT_ENV: &str = "SARAMSA_OUTPUT_SIMPLE";
pub const THEME_ENV: &str = "SARAMSA_THEME";

pub fn config_path() -> SaramsaResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SaramsaError::Config("home directory not found".to_string()))?;
    Ok(home.join(".saramsa").join("config.toml"))
}

pub fn load_config() -> SaramsaResult<SaramsaConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> SaramsaResult<SaramsaConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SaramsaConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| SaramsaError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| SaramsaError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &SaramsaConfig) -> SaramsaResult<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &SaramsaConfig) -> SaramsaResult<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|err| SaramsaError::Config(format!("failed to serialize config: {err}")))?;
    write_config_file(path, &content)
}

pub fn config_exists() -> SaramsaResult<bool> {
    let path = config_path()?;
    Ok(path.exists())
}

pub fn resolve_endpoint(config: &SaramsaConfig) -> SaramsaResult<String> {
    pick_endpoint(env_value(ENDPOINT_ENV), config)
}

fn pick_endpoint(from_env: Option<String>, config: &SaramsaConfig) -> SaramsaResult<String> {
    let endpoint = from_env
        .or_else(|| {
            config
                .api
                .endpoint
                .clone()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_url(&endpoint)
        .map_err(|err| SaramsaError::Config(format!("bad endpoint '{endpoint}': {err}")))?;
    Ok(endpoint)
}

pub fn resolve_simple_output(config: &SaramsaConfig) -> Option<bool> {
    if let Ok(value) = env::var(SIMPLE_OUTPUT_ENV) {
        return Some(parse_flag(&value));
    }
    config.output.simple
}

pub fn resolve_json_output(config: &SaramsaConfig) -> bool {
    config.output.json.unwrap_or(false)
}

pub fn resolve_theme(config: &SaramsaConfig) -> Theme {
    pick_theme(env_value(THEME_ENV), config)
}

fn pick_theme(from_env: Option<String>, config: &SaramsaConfig) -> Theme {
    from_env
        .and_then(|value| value.parse().ok())
        .or(config.display.theme)
        .unwrap_or_default()
}

/// Persists the theme preference without touching the rest of the file.
pub fn save_theme(theme: Theme) -> SaramsaResult<()> {
    set_config_value("display.theme", theme.as_str())
}

pub fn set_config_value(key_path: &str, value: &str) -> SaramsaResult<()> {
    set_config_value_at(&config_path()?, key_path, value)
}

pub fn set_config_value_at(path: &Path, key_path: &str, value: &str) -> SaramsaResult<()> {
    let content = if path.exists() {
        fs::read_to_string(path)
            .map_err(|err| SaramsaError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|err| SaramsaError::Config(format!("failed to parse config: {err}")))?;

    let parts: Vec<&str> = key_path.split('.').collect();
    let Some((last_part, parents)) = parts.split_last().filter(|_| parts.len() >= 2) else {
        return Err(SaramsaError::Config(
            "key path must have at least 2 parts (e.g., 'api.endpoint')".to_string(),
        ));
    };

    let mut current = doc.as_table_mut();
    for part in parents {
        current = current
            .entry(part)
            .or_insert(toml_edit::Item::Table(Default::default()))
            .as_table_mut()
            .ok_or_else(|| {
                SaramsaError::Config(format!("cannot set nested value in '{key_path}'"))
            })?;
    }

    current[*last_part] = match value.parse::<bool>() {
        Ok(flag) => toml_edit::value(flag),
        Err(_) => toml_edit::value(value),
    };

    // Round-trip through the typed config so a bad value never lands on disk.
    let content = doc.to_string();
    toml::from_str::<SaramsaConfig>(&content)
        .map_err(|err| SaramsaError::Config(format!("invalid value for '{key_path}': {err}")))?;

    write_config_file(path, &content)
}

pub fn open_in_editor() -> SaramsaResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&SaramsaConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "vim".to_string()
        } else if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor).arg(&path).status().map_err(|err| {
        SaramsaError::Config(format!("failed to open editor '{editor}': {err}"))
    })?;

    if !status.success() {
        return Err(SaramsaError::Config(format!(
            "editor exited with status: {status}"
        )));
    }

    Ok(())
}

fn write_config_file(path: &Path, content: &str) -> SaramsaResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SaramsaError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(path, content)
        .map_err(|err| SaramsaError::Config(format!("failed to write config: {err}")))?;
    debug!(path = %path.display(), "config written");
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes"
}
