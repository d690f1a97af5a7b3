//! Harness configuration.
//!
//! Configuration is loaded from these sources, later ones winning:
//! 1. Default values
//! 2. A TOML file (missing sections and keys keep their defaults)
//! 3. Environment variables (`SMOKE_*`)
//!
//! ```toml
//! [poll]
//! retry_count = 200
//! retry_interval_ms = 100
//!
//! [exit]
//! check_interval_ms = 500
//! warn_after = 20
//! give_up_after = 40
//!
//! [launch]
//! extension_name = "vscode-notebook-tests"
//! window_retry_count = 600
//! ```

use crate::error::Error;
use crate::poll::PollOptions;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding the poll retry count.
pub const ENV_POLL_RETRY_COUNT: &str = "SMOKE_POLL_RETRY_COUNT";
/// Environment variable overriding the poll interval in milliseconds.
pub const ENV_POLL_RETRY_INTERVAL_MS: &str = "SMOKE_POLL_RETRY_INTERVAL_MS";
/// Environment variable overriding how many exit checks run before giving up.
pub const ENV_EXIT_GIVE_UP_AFTER: &str = "SMOKE_EXIT_GIVE_UP_AFTER";
/// Environment variable overriding the bundled test extension name.
pub const ENV_EXTENSION_NAME: &str = "SMOKE_EXTENSION_NAME";

/// Complete harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Default poll budget for `wait_for_*` helpers.
    pub poll: PollConfig,
    /// Exit flow timing.
    pub exit: ExitConfig,
    /// Launch settings.
    pub launch: LaunchConfig,
}

/// Poll budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Attempts per poll.
    pub retry_count: u32,
    /// Pause between attempts in milliseconds.
    pub retry_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retry_count: crate::poll::DEFAULT_RETRY_COUNT,
            retry_interval_ms: crate::poll::DEFAULT_RETRY_INTERVAL.as_millis() as u64,
        }
    }
}

impl PollConfig {
    /// Poll options for this budget.
    pub fn options(&self) -> PollOptions {
        PollOptions::new(self.retry_count, Duration::from_millis(self.retry_interval_ms))
    }
}

/// Timing of the exit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// Pause between process liveness checks in milliseconds.
    pub check_interval_ms: u64,
    /// Checks after which a warning is logged.
    pub warn_after: u32,
    /// Checks after which the exit fails.
    pub give_up_after: u32,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 500,
            warn_after: 20,
            give_up_after: 40,
        }
    }
}

impl ExitConfig {
    /// Pause between liveness checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

/// Launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Test extension copied into the extensions directory before launch.
    pub extension_name: String,
    /// Attempts when waiting for windows to appear.
    pub window_retry_count: u32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            extension_name: "vscode-notebook-tests".to_string(),
            window_retry_count: 600,
        }
    }
}

impl SmokeConfig {
    /// Default config file location (`<config dir>/smoke-driver/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("smoke-driver").join("config.toml"))
    }

    /// Load defaults, then the config file if it exists, then environment
    /// overrides. Without `path` the [default location](Self::default_path)
    /// is tried.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "loaded smoke config");
        Self::from_toml(&content)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `SMOKE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply `SMOKE_*` overrides read through `lookup`.
    pub fn apply_overrides<L>(&mut self, lookup: L) -> Result<()>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&lookup, ENV_POLL_RETRY_COUNT)? {
            self.poll.retry_count = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_POLL_RETRY_INTERVAL_MS)? {
            self.poll.retry_interval_ms = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_EXIT_GIVE_UP_AFTER)? {
            self.exit.give_up_after = v;
        }
        if let Some(name) = lookup(ENV_EXTENSION_NAME) {
            self.launch.extension_name = name;
        }
        Ok(())
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> Result<()> {
        if self.exit.warn_after > self.exit.give_up_after {
            return Err(Error::config(format!(
                "exit.warn_after ({}) must not exceed exit.give_up_after ({})",
                self.exit.warn_after, self.exit.give_up_after
            )));
        }
        Ok(())
    }
}

fn parse_override<T, L>(lookup: &L, var: &str) -> Result<Option<T>>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("Invalid value for {}: '{}'", var, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SmokeConfig::default();
        assert_eq!(config.poll.options(), PollOptions::default());
        assert_eq!(config.exit.check_interval(), Duration::from_millis(500));
        assert_eq!(config.launch.window_retry_count, 600);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SmokeConfig::from_toml("[poll]\nretry_count = 5\n").unwrap();
        assert_eq!(config.poll.retry_count, 5);
        assert_eq!(config.poll.retry_interval_ms, 100);
        assert_eq!(config.exit, ExitConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[exit]\nwarn_after = 2\ngive_up_after = 4").unwrap();

        let config = SmokeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.exit.give_up_after, 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SmokeConfig::load(Some(Path::new("/nonexistent/smoke.toml"))).unwrap();
        assert_eq!(config.launch.extension_name, "vscode-notebook-tests");
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = SmokeConfig::default_path() {
            assert!(path.ends_with("smoke-driver/config.toml"));
        }
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SmokeConfig::from_toml("[poll\nretry_count = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_warn_after_give_up() {
        let config = SmokeConfig::from_toml("[exit]\nwarn_after = 50\n").unwrap();
        assert!(config.validate().is_err());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = SmokeConfig::from_toml("[poll]\nretry_count = 5\n").unwrap();
        let vars = [
            (ENV_POLL_RETRY_COUNT, " 12 "),
            (ENV_POLL_RETRY_INTERVAL_MS, "7"),
            (ENV_EXIT_GIVE_UP_AFTER, "60"),
            (ENV_EXTENSION_NAME, "custom-tests"),
        ];

        config.apply_overrides(lookup(&vars)).unwrap();

        assert_eq!(config.poll.options(), PollOptions::new(12, Duration::from_millis(7)));
        assert_eq!(config.exit.give_up_after, 60);
        assert_eq!(config.launch.extension_name, "custom-tests");
    }

    #[test]
    fn test_unset_overrides_keep_values() {
        let mut config = SmokeConfig::default();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config, SmokeConfig::default());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = SmokeConfig::default();
        let vars = [(ENV_POLL_RETRY_COUNT, "many")];

        match config.apply_overrides(lookup(&vars)) {
            Err(Error::Config(message)) => {
                assert_eq!(message, "Invalid value for SMOKE_POLL_RETRY_COUNT: 'many'")
            }
            other => panic!("expected config error, got {other:?}"),
        }
        assert_eq!(config.poll.retry_count, 200);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SmokeConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(SmokeConfig::from_toml(&text).unwrap(), config);
    }
}
