use std::path::{Path, PathBuf};

use clap::Parser;

use crate::logging;

/// Extensions tried, in order, when the config file is given without one.
const FILE_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,

	/// Maximum number of pooled connections
	pub max_connections: u32,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/verse_dev".to_string(),
			max_connections: 10,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("config file not found: {0}")]
	FileNotFound(String),
	#[error("failed to canonicalize config path: {0}")]
	Canonicalize(#[from] std::io::Error),
	#[error(transparent)]
	Source(#[from] ::config::ConfigError),
}

#[derive(Debug, Parser)]
struct Cli {
	/// The path to the config file
	#[arg(long, short)]
	config_file: Option<String>,
}

/// Resolves `path` to an existing file, trying the supported extensions when
/// `path` itself does not exist.
pub fn find_config_file(path: impl AsRef<Path>) -> Option<PathBuf> {
	let path = path.as_ref();
	if path.is_file() {
		return Some(path.to_path_buf());
	}

	FILE_EXTENSIONS
		.iter()
		.map(|ext| path.with_extension(ext))
		.find(|candidate| candidate.is_file())
}

/// Loads a config struct from, in increasing priority: the struct defaults,
/// a config file and `{env_prefix}_` environment variables (`__` separates
/// nested keys, so `VERSE_API__BIND_ADDRESS` sets `api.bind_address`).
///
/// The file comes from `--config-file` (when `enable_cli` is set), then
/// `{env_prefix}_CONFIG_FILE`, then `default_file`. Only an explicitly
/// requested file has to exist. Returns the canonical path of the file that
/// was loaded, if any.
pub fn parse<C: serde::de::DeserializeOwned>(
	enable_cli: bool,
	env_prefix: &str,
	default_file: Option<String>,
) -> Result<(C, Option<String>), ConfigError> {
	let cli_file = if enable_cli { Cli::parse().config_file } else { None };
	let requested = cli_file.or_else(|| std::env::var(format!("{env_prefix}_CONFIG_FILE")).ok());
	let key_provided = requested.is_some();

	let mut builder = ::config::Config::builder();
	let mut config_path = None;

	if let Some(path) = requested.or(default_file) {
		match find_config_file(&path) {
			Some(found) => {
				builder = builder.add_source(::config::File::from(found.as_path()));
				config_path = Some(std::fs::canonicalize(&found)?.display().to_string());
			}
			None if key_provided => return Err(ConfigError::FileNotFound(path)),
			None => tracing::debug!(path = %path, "no config file found, using defaults"),
		}
	}

	let config = builder
		.add_source(
			::config::Environment::with_prefix(env_prefix)
				.prefix_separator("_")
				.separator("__")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	Ok((config, config_path))
}
