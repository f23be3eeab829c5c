use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context as _;
use common::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;

#[macro_export]
macro_rules! impl_global_traits {
	($struct:ty) => {
		impl common::global::GlobalCtx for $struct {
			#[inline(always)]
			fn ctx(&self) -> &common::context::Context {
				&self.ctx
			}
		}

		impl common::global::GlobalConfig for $struct {}
	};
}

pub async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Arc<sqlx::PgPool>> {
	let options = PgConnectOptions::from_str(&config.uri)
		.context("invalid database uri")?
		.disable_statement_logging();

	let db = PgPoolOptions::new()
		.max_connections(config.max_connections)
		.connect_with(options)
		.await
		.context("failed to connect to database")?;

	tracing::info!("connected to database");

	Ok(Arc::new(db))
}
