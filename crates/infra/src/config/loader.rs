//! Configuration loader
//!
//! Loads engine configuration from a file with environment overrides.
//!
//! ## Loading Strategy
//! 1. Load the config file (explicit `HERALD_CONFIG_PATH`, else the first
//!    probed location); falls back to built-in defaults when no file exists
//! 2. Apply `HERALD_*` environment overrides on top
//! 3. Validate the merged result
//!
//! Every field has a default, so a partial file or a couple of environment
//! variables is a complete configuration.
//!
//! ## Environment Variables
//! - `HERALD_CONFIG_PATH`: Explicit config file location
//! - `HERALD_API_BASE_URL`: Notification API base URL
//! - `HERALD_FID`: Farcaster id of the authenticated user
//! - `HERALD_API_TIMEOUT_SECONDS`: Per-request timeout
//! - `HERALD_BASE_INTERVAL_SECONDS`: Steady-state poll interval
//! - `HERALD_MAX_INTERVAL_SECONDS`: Failure backoff cap
//! - `HERALD_IDLE_THRESHOLD_SECONDS`: Quiet time before the user counts as idle
//! - `HERALD_IDLE_CHECK_INTERVAL_SECONDS`: Idle check cadence
//! - `HERALD_FETCH_LIMIT`: Page size for the notification fetch
//! - `HERALD_SETTINGS_PATH`: Notification settings file location
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./herald.config.json` or `./herald.config.toml`
//! 2. Relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use herald_domain::{HeraldConfig, HeraldError, Result};

/// Load configuration with file and environment merged
///
/// # Errors
/// Returns `HeraldError::Config` if:
/// - An explicitly named config file is missing or invalid
/// - An environment override has an unparsable value
/// - The merged configuration fails validation
pub fn load() -> Result<HeraldConfig> {
    let mut config = match config_file_path() {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("No config file found; starting from defaults");
            HeraldConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// The file the loader would read, if any.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HERALD_CONFIG_PATH") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    probe_config_paths()
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HeraldError::Config` if:
/// - The file does not exist
/// - The file format is invalid
pub fn load_from_file(path: &Path) -> Result<HeraldConfig> {
    if !path.exists() {
        return Err(HeraldError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| HeraldError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<HeraldConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HeraldError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HeraldError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(HeraldError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("herald.config.json"));
        candidates.push(cwd.join("herald.config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("herald.config.json"));
            candidates.push(exe_dir.join("herald.config.toml"));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Overlay `HERALD_*` environment variables onto a loaded configuration.
fn apply_env_overrides(config: &mut HeraldConfig) -> Result<()> {
    if let Some(base_url) = env_string("HERALD_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(fid) = env_parse("HERALD_FID")? {
        config.api.fid = fid;
    }
    if let Some(seconds) = env_parse("HERALD_API_TIMEOUT_SECONDS")? {
        config.api.timeout_seconds = seconds;
    }
    if let Some(seconds) = env_parse("HERALD_BASE_INTERVAL_SECONDS")? {
        config.poll.base_interval_seconds = seconds;
    }
    if let Some(seconds) = env_parse("HERALD_MAX_INTERVAL_SECONDS")? {
        config.poll.max_interval_seconds = seconds;
    }
    if let Some(seconds) = env_parse("HERALD_IDLE_THRESHOLD_SECONDS")? {
        config.activity.idle_threshold_seconds = seconds;
    }
    if let Some(seconds) = env_parse("HERALD_IDLE_CHECK_INTERVAL_SECONDS")? {
        config.activity.idle_check_interval_seconds = seconds;
    }
    if let Some(limit) = env_parse("HERALD_FETCH_LIMIT")? {
        config.delivery.fetch_limit = limit;
    }
    if let Some(path) = env_string("HERALD_SETTINGS_PATH") {
        config.settings.path = path;
    }
    Ok(())
}

/// Get an optional environment variable, treating empty as unset.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `HeraldError::Config` if the variable is set but unparsable.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| HeraldError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const OVERRIDE_VARS: &[&str] = &[
        "HERALD_CONFIG_PATH",
        "HERALD_API_BASE_URL",
        "HERALD_FID",
        "HERALD_API_TIMEOUT_SECONDS",
        "HERALD_BASE_INTERVAL_SECONDS",
        "HERALD_MAX_INTERVAL_SECONDS",
        "HERALD_IDLE_THRESHOLD_SECONDS",
        "HERALD_IDLE_CHECK_INTERVAL_SECONDS",
        "HERALD_FETCH_LIMIT",
        "HERALD_SETTINGS_PATH",
    ];

    fn clear_env() {
        for var in OVERRIDE_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn env_overrides_apply_on_top_of_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HERALD_API_BASE_URL", "https://api.example.com");
        std::env::set_var("HERALD_FID", "194");
        std::env::set_var("HERALD_BASE_INTERVAL_SECONDS", "60");
        std::env::set_var("HERALD_SETTINGS_PATH", "/tmp/herald-settings.json");

        let mut config = HeraldConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.fid, 194);
        assert_eq!(config.poll.base_interval_seconds, 60);
        assert_eq!(config.settings.path, "/tmp/herald-settings.json");
        // Untouched fields keep their defaults.
        assert_eq!(config.poll.max_interval_seconds, 600);

        clear_env();
    }

    #[test]
    fn invalid_numeric_override_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HERALD_FID", "not-a-number");

        let mut config = HeraldConfig::default();
        let result = apply_env_overrides(&mut config);
        assert!(matches!(result, Err(HeraldError::Config(_))));

        clear_env();
    }

    #[test]
    fn empty_override_counts_as_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HERALD_FID", "");

        let mut config = HeraldConfig::default();
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.api.fid, 0);

        clear_env();
    }

    #[test]
    fn load_validates_the_merged_result() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        // Cap below base fails validation even though both parse fine.
        std::env::set_var("HERALD_BASE_INTERVAL_SECONDS", "600");
        std::env::set_var("HERALD_MAX_INTERVAL_SECONDS", "300");

        let result = load();
        assert!(matches!(result, Err(HeraldError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "api": {
                "base_url": "https://api.example.com",
                "fid": 42
            },
            "poll": {
                "base_interval_seconds": 120,
                "max_interval_seconds": 480
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(&path);
        assert!(result.is_ok(), "Should load config from JSON file");

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.fid, 42);
        assert_eq!(config.poll.base_interval_seconds, 120);
        // Sections absent from the file come from the defaults.
        assert_eq!(config.delivery.fetch_limit, 25);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[api]
base_url = "https://api.example.com"
fid = 7

[activity]
idle_threshold_seconds = 240
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(&path);
        assert!(result.is_ok(), "Should load config from TOML file");

        let config = result.unwrap();
        assert_eq!(config.api.fid, 7);
        assert_eq!(config.activity.idle_threshold_seconds, 240);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Path::new("/nonexistent/herald.config.json"));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(&path);
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
