use std::sync::OnceLock;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::services::response::ServiceError;

pub async fn connection_pool(
	url: &str,
	max_connections: u32,
) -> Result<&'static PgPool, ServiceError> {
	static POOL: OnceLock<PgPool> = OnceLock::new();
	let p = match POOL.get() {
		None => {
			let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
			POOL.get_or_init(|| pool)
		}
		Some(pool) => pool,
	};
	Ok(p)
}

/// Applies the embedded `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), ServiceError> {
	sqlx::migrate!().run(pool).await?;
	Ok(())
}
