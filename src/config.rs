use std::{env, str::FromStr};

use axum::http::HeaderValue;

/// The minimum number of bytes of key material accepted for signing cookies.
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} is invalid: {reason}")]
	Invalid { key: &'static str, reason: String },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub database_max_connections: u32,
	pub host: String,
	pub port: u16,
	pub session_secret: Vec<u8>,
	/// Whether session cookies are `Secure; SameSite=None` rather than `SameSite=Lax`.
	pub cookie_secure: bool,
	pub allowed_origins: Vec<HeaderValue>,
	pub log_level: tracing::Level,
	/// Spans are exported over OTLP to this endpoint when set.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from any key-value source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());
		let required = |key: &'static str| var(key).ok_or(Error::Missing(key));

		let session_secret = required("SESSION_SECRET")?.into_bytes();

		if session_secret.len() < MIN_SECRET_LENGTH {
			return Err(Error::Invalid {
				key: "SESSION_SECRET",
				reason: format!("must be at least {MIN_SECRET_LENGTH} bytes"),
			});
		}

		let allowed_origins = var("ALLOWED_ORIGINS")
			.unwrap_or_else(|| "http://localhost:5173".into())
			.split(',')
			.map(str::trim)
			.filter(|origin| !origin.is_empty())
			.map(|origin| {
				HeaderValue::from_str(origin).map_err(|e| Error::Invalid {
					key: "ALLOWED_ORIGINS",
					reason: e.to_string(),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			database_url: required("DATABASE_URL")?,
			database_max_connections: parse("DATABASE_MAX_CONNECTIONS", var("DATABASE_MAX_CONNECTIONS"), 5)?,
			host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
			port: parse("PORT", var("PORT"), 3000)?,
			session_secret,
			cookie_secure: parse("COOKIE_SECURE", var("COOKIE_SECURE"), true)?,
			allowed_origins,
			log_level: parse("LOG_LEVEL", var("LOG_LEVEL"), tracing::Level::INFO)?,
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

fn parse<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, Error>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match value {
		Some(value) => value.trim().parse().map_err(|e: T::Err| Error::Invalid {
			key,
			reason: e.to_string(),
		}),
		None => Ok(default),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::{Config, Error};

	const SECRET: &str = "0123456789abcdef0123456789abcdef";

	fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = load(&[("DATABASE_URL", "postgres://localhost/forum"), ("SESSION_SECRET", SECRET)]).unwrap();

		assert_eq!(config.database_max_connections, 5);
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 3000);
		assert!(config.cookie_secure);
		assert_eq!(config.allowed_origins, ["http://localhost:5173"]);
		assert_eq!(config.log_level, tracing::Level::INFO);
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_overrides() {
		let config = load(&[
			("DATABASE_URL", "postgres://localhost/forum"),
			("SESSION_SECRET", SECRET),
			("PORT", "8080"),
			("COOKIE_SECURE", "false"),
			("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
			("LOG_LEVEL", "debug"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
		])
		.unwrap();

		assert_eq!(config.port, 8080);
		assert!(!config.cookie_secure);
		assert_eq!(config.allowed_origins, ["https://a.example", "https://b.example"]);
		assert_eq!(config.log_level, tracing::Level::DEBUG);
		assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
	}

	#[test]
	fn test_missing_and_invalid() {
		assert!(matches!(
			load(&[("SESSION_SECRET", SECRET)]),
			Err(Error::Missing("DATABASE_URL"))
		));
		assert!(matches!(
			load(&[("DATABASE_URL", "postgres://localhost/forum"), ("SESSION_SECRET", "short")]),
			Err(Error::Invalid { key: "SESSION_SECRET", .. })
		));
		assert!(matches!(
			load(&[
				("DATABASE_URL", "postgres://localhost/forum"),
				("SESSION_SECRET", SECRET),
				("PORT", "http"),
			]),
			Err(Error::Invalid { key: "PORT", .. })
		));
	}
}
