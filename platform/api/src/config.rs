use std::net::SocketAddr;

use anyhow::Result;
use common::config::LoggingConfig;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the Quill social blogging service
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	/// The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Page size for every paginated listing
	pub posts_per_page: u64,

	/// TTL of the cached home listing, in seconds. Writes do not
	/// invalidate the cache; staleness up to this window is intended.
	pub listing_cache_ttl_secs: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
			posts_per_page: 10,
			listing_cache_ttl_secs: 20,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/quill_dev".to_string(),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config".to_string()),
			name: "quill-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		let default = Self::default();

		let mut builder = ::config::Config::builder();

		if let Some(file) = &default.config_file {
			builder = builder.add_source(::config::File::with_name(file).required(false));
		}

		if !cfg!(test) {
			builder = builder.add_source(::config::Environment::with_prefix("QUILL").separator("__"));
		}

		let config = builder.build()?.try_deserialize()?;

		Ok(config)
	}
}
