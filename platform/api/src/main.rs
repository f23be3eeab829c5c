use std::sync::Arc;

use anyhow::Context as _;
use binary_helper::global::setup_database;
use binary_helper::{bootstrap, impl_global_traits};
use common::context::Context;
use platform_api::config::{ApiConfig, SimulationConfig};
use platform_api::database::{MemoryStore, PgStore, Store, MEMORY_URI};
use platform_api::simulation::anonymous::ProofStore;

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
struct ExtConfig {
	/// The API configuration.
	api: ApiConfig,

	/// Latency and failure injection for the simulated features.
	simulation: SimulationConfig,
}

impl binary_helper::config::ConfigExtention for ExtConfig {
	const APP_NAME: &'static str = "platform-api";
}

type AppConfig = binary_helper::config::AppConfig<ExtConfig>;

struct GlobalState {
	ctx: Context,
	config: AppConfig,
	store: Arc<dyn Store>,
	proof_store: ProofStore,
}

impl_global_traits!(GlobalState);

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &ApiConfig {
		&self.config.extra.api
	}
}

impl common::global::GlobalConfigProvider<SimulationConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &SimulationConfig {
		&self.config.extra.simulation
	}
}

impl platform_api::global::ApiState for GlobalState {
	#[inline(always)]
	fn store(&self) -> &Arc<dyn Store> {
		&self.store
	}

	#[inline(always)]
	fn proof_store(&self) -> &ProofStore {
		&self.proof_store
	}
}

impl binary_helper::Global<AppConfig> for GlobalState {
	async fn new(ctx: Context, config: AppConfig) -> anyhow::Result<Self> {
		let store: Arc<dyn Store> = if config.database.uri == MEMORY_URI {
			tracing::warn!("using the in-memory store, data is lost on shutdown");
			Arc::new(MemoryStore::new())
		} else {
			let db = setup_database(&config.database).await?;
			let store = PgStore::new(db);
			store.migrate().await.context("failed to run migrations")?;
			Arc::new(store)
		};

		Ok(Self {
			ctx,
			config,
			store,
			proof_store: ProofStore::new(),
		})
	}
}

#[tokio::main]
pub async fn main() {
	if let Err(err) = bootstrap::<AppConfig, GlobalState, _>(|global| async move {
		platform_api::api::run(global).await.context("api")
	})
	.await
	{
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}
