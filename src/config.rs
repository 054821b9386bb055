use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::DashboardMode;

const CONFIG_ENV: &str = "IMPACT_DASHBOARD_CONFIG";
const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "impact_dashboard";
pub const DEFAULT_LOG_FILTER: &str = "impact_dashboard=info";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse config {path}: {source}")]
	TomlDecode {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
	#[serde(deserialize_with = "deserialize_mode")]
	pub initial_mode: DashboardMode,
	pub seed: Option<PathBuf>,
	pub log_file: Option<PathBuf>,
	pub log_filter: String,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			initial_mode: DashboardMode::Current,
			seed: None,
			log_file: None,
			log_filter: DEFAULT_LOG_FILTER.to_string(),
		}
	}
}

fn deserialize_mode<'de, D>(deserializer: D) -> Result<DashboardMode, D::Error>
where
	D: Deserializer<'de>,
{
	let name = String::deserialize(deserializer)?;
	Ok(DashboardMode::from_name(&name))
}

pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
	if let Some(path) = cli_path {
		return Some(path);
	}

	if let Some(path) = env::var_os(CONFIG_ENV) {
		let path = PathBuf::from(path);
		if !path.as_os_str().is_empty() {
			return Some(path);
		}
	}

	config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// A missing file yields the defaults. Relative `seed` and `log_file`
/// paths are taken relative to the config file.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
	let Some(path) = path else {
		return Ok(DashboardConfig::default());
	};

	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => {
			tracing::debug!(event = "config.missing", path = %path.display());
			return Ok(DashboardConfig::default());
		}
		Err(source) => {
			return Err(ConfigError::Io {
				path: path.to_path_buf(),
				source,
			});
		}
	};

	let mut config: DashboardConfig = toml::from_str(&raw).map_err(|source| ConfigError::TomlDecode {
		path: path.to_path_buf(),
		source,
	})?;

	if let Some(base) = path.parent() {
		config.seed = config.seed.map(|seed| relative_to(base, seed));
		config.log_file = config.log_file.map(|log_file| relative_to(base, log_file));
	}

	Ok(config)
}

fn relative_to(base: &Path, path: PathBuf) -> PathBuf {
	if path.is_absolute() {
		path
	} else {
		base.join(path)
	}
}

fn config_dir() -> Option<PathBuf> {
	#[cfg(target_os = "windows")]
	{
		if let Some(path) = env::var_os("APPDATA") {
			return Some(PathBuf::from(path).join(APP_DIR));
		}
	}

	if let Some(path) = env::var_os("XDG_CONFIG_HOME") {
		return Some(PathBuf::from(path).join(APP_DIR));
	}

	env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::path::PathBuf;

	use crate::domain::DashboardMode;

	use super::{ConfigError, DEFAULT_LOG_FILTER, DashboardConfig, load_config, resolve_config_path};

	#[test]
	fn cli_path_wins() {
		let path = PathBuf::from("/tmp/elsewhere.toml");
		assert_eq!(resolve_config_path(Some(path.clone())), Some(path));
	}

	#[test]
	fn missing_config_uses_defaults() {
		let dir = tempfile::tempdir().expect("temp dir");
		let config = load_config(Some(&dir.path().join("config.toml"))).expect("defaults");
		assert_eq!(config, DashboardConfig::default());
		assert_eq!(load_config(None).expect("defaults").log_filter, DEFAULT_LOG_FILTER);
	}

	#[test]
	fn reads_fields_and_resolves_relative_paths() {
		let dir = tempfile::tempdir().expect("temp dir");
		let path = dir.path().join("config.toml");
		fs::write(
			&path,
			"initial_mode = \"done\"\nseed = \"seed.toml\"\nlog_file = \"/var/log/dash.log\"\n",
		)
		.expect("write config");

		let config = load_config(Some(&path)).expect("config should load");
		assert_eq!(config.initial_mode, DashboardMode::Done);
		assert_eq!(config.seed, Some(dir.path().join("seed.toml")));
		assert_eq!(config.log_file, Some(PathBuf::from("/var/log/dash.log")));
		assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
	}

	#[test]
	fn unknown_mode_falls_back_to_virtual() {
		let dir = tempfile::tempdir().expect("temp dir");
		let path = dir.path().join("config.toml");
		fs::write(&path, "initial_mode = \"everything\"\n").expect("write config");

		let config = load_config(Some(&path)).expect("config should load");
		assert_eq!(config.initial_mode, DashboardMode::Virtual);
	}

	#[test]
	fn malformed_config_is_an_error() {
		let dir = tempfile::tempdir().expect("temp dir");
		let path = dir.path().join("config.toml");
		fs::write(&path, "initial_mode = [").expect("write config");

		assert!(matches!(load_config(Some(&path)), Err(ConfigError::TomlDecode { .. })));
	}
}
