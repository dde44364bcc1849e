pub mod routers;

use std::{error::Error, net::SocketAddr, str::FromStr};

use axum::{
	http::{HeaderValue, Method},
	Router,
};

use messaging::{bootstrap::Bootstrap, dependencies::config};
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv::dotenv().ok();
	let config = config()?;

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("messaging={},web={},tower_http=debug,axum::rejection=trace", config.log_level, config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Connection
	tracing::info!("Connections Are Being Pooled...");
	let chat_state = Bootstrap::chat_state(config).await?;

	let routers = routers::app(chat_state);

	let origins = config
		.allow_origins
		.iter()
		.map(|origin| origin.parse::<HeaderValue>())
		.collect::<Result<Vec<_>, _>>()?;

	let service_name = "/messaging";
	let app = Router::new()
		.nest_service(service_name, routers)
		.layer(
			CorsLayer::new()
				.allow_origin(AllowOrigin::list(origins))
				.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE]),
		)
		.layer(TraceLayer::new_for_http());

	let addr = SocketAddr::from_str(&config.server_ip_port)?;
	tracing::info!("Start Web Server on {}...", addr);
	axum::Server::bind(&addr).serve(app.into_make_service()).await?;
	Ok(())
}
