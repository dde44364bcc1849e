use std::sync::OnceLock;

use async_nats::Client;

use crate::{config::Config, services::response::ServiceError};

pub fn config() -> Result<&'static Config, ServiceError> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

pub async fn queue_client(url: &str) -> Result<&'static Client, ServiceError> {
	static CLIENT: OnceLock<Client> = OnceLock::new();

	let c = match CLIENT.get() {
		None => {
			let cl = async_nats::ConnectOptions::new().name("messaging").connect(url).await.map_err(|err| {
				tracing::error!("Could not connect to queue service at {}: {}", url, err);
				ServiceError::QueueServiceError
			})?;
			CLIENT.get_or_init(|| cl)
		}
		Some(c) => c,
	};
	Ok(c)
}
