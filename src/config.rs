use std::{env, fmt::Display, str::FromStr};

/// Runtime configuration, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	pub database_url: String,
	pub max_connections: u32,
	/// The only account allowed to manage posts.
	pub admin_id: i64,
	pub session_ttl: chrono::Duration,
	/// Cookie signing secret. When absent a random key is generated per process.
	pub secret_key: Option<String>,
	pub secure_cookies: bool,
	pub otlp_endpoint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid value for {key}: {message}")]
	Invalid { key: &'static str, message: String },
}

impl Default for Config {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".into(),
			port: 3000,
			database_url: "sqlite://blog.db".into(),
			max_connections: 5,
			admin_id: 1,
			session_ttl: chrono::Duration::hours(168),
			secret_key: None,
			secure_cookies: false,
			otlp_endpoint: None,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup, falling
	/// back to [`Config::default`] for anything unset.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let default = Self::default();

		Ok(Self {
			host: lookup("HOST").unwrap_or(default.host),
			port: parse(&lookup, "PORT", default.port)?,
			database_url: lookup("DATABASE_URL").unwrap_or(default.database_url),
			max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", default.max_connections)?,
			admin_id: parse(&lookup, "ADMIN_USER_ID", default.admin_id)?,
			session_ttl: chrono::Duration::hours(parse(&lookup, "SESSION_TTL_HOURS", 168)?),
			secret_key: lookup("SECRET_KEY").filter(|key| !key.is_empty()),
			secure_cookies: parse(&lookup, "SECURE_COOKIES", default.secure_cookies)?,
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|url| !url.is_empty()),
		})
	}
}

fn parse<T>(
	lookup: impl Fn(&str) -> Option<String>,
	key: &'static str,
	default: T,
) -> Result<T, Error>
where
	T: FromStr,
	T::Err: Display,
{
	let Some(value) = lookup(key) else {
		return Ok(default);
	};

	value.trim().parse().map_err(|error: T::Err| Error::Invalid {
		key,
		message: error.to_string(),
	})
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();

		assert_eq!(config.port, 3000);
		assert_eq!(config.admin_id, 1);
		assert_eq!(config.session_ttl, chrono::Duration::hours(168));
		assert!(config.secret_key.is_none());
		assert!(!config.secure_cookies);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("PORT", "8080"),
			("ADMIN_USER_ID", "7"),
			("SESSION_TTL_HOURS", "2"),
			("SECURE_COOKIES", "true"),
			("DATABASE_URL", "sqlite::memory:"),
		])
		.unwrap();

		assert_eq!(config.port, 8080);
		assert_eq!(config.admin_id, 7);
		assert_eq!(config.session_ttl, chrono::Duration::hours(2));
		assert!(config.secure_cookies);
		assert_eq!(config.database_url, "sqlite::memory:");
	}

	#[test]
	fn test_invalid_value_names_variable() {
		let error = config(&[("PORT", "eighty")]).unwrap_err();

		assert!(error.to_string().contains("PORT"));
	}
}
