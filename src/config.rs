use std::str::FromStr;

use crate::services::response::ServiceError;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	/// NATS server. Without it notifications only reach sockets of this process.
	pub queue_url: Option<String>,
	/// Postgres. Without it messages live in memory.
	pub database_url: Option<String>,
	pub allow_origins: Vec<String>,
	/// Buffered notifications per subject on the in-process hub.
	pub channel_capacity: usize,
	pub max_db_connections: u32,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ServiceError> {
		let queue_url = lookup("QUEUE_URL").filter(|url| !url.is_empty());
		let log_level = lookup("LOG_LEVEL").unwrap_or("info".to_string());
		let server_ip_port = lookup("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
		let allow_origins = lookup("ALLOW_ORIGINS")
			.unwrap_or("http://localhost:3000,http://localhost:3001".to_string())
			.split(',')
			.map(str::trim)
			.filter(|origin| !origin.is_empty())
			.map(String::from)
			.collect();
		let channel_capacity = parse_or(&lookup, "CHANNEL_CAPACITY", 100)?;
		let max_db_connections = parse_or(&lookup, "MAX_DB_CONNECTIONS", 30)?;

		Ok(Config {
			queue_url,
			log_level,
			server_ip_port,
			database_url,
			allow_origins,
			channel_capacity,
			max_db_connections,
		})
	}
}

fn parse_or<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: T,
) -> Result<T, ServiceError> {
	match lookup(key) {
		None => Ok(default),
		Some(raw) => raw.trim().parse().map_err(|_| ServiceError::ConfigError(format!("{key} is not a valid number: {raw}"))),
	}
}
