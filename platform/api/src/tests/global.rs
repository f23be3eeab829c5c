use std::net::SocketAddr;
use std::sync::Arc;

use binary_helper::impl_global_traits;
use common::context::{Context, Handler};
use common::logging;

use crate::config::{ApiConfig, SimulationConfig};
use crate::database::{MemoryStore, Store};
use crate::global::ApiState;
use crate::simulation::anonymous::ProofStore;

pub struct GlobalState {
	ctx: Context,
	api: ApiConfig,
	simulation: SimulationConfig,
	store: Arc<dyn Store>,
	proof_store: ProofStore,
}

impl_global_traits!(GlobalState);

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	fn provide_config(&self) -> &ApiConfig {
		&self.api
	}
}

impl common::global::GlobalConfigProvider<SimulationConfig> for GlobalState {
	fn provide_config(&self) -> &SimulationConfig {
		&self.simulation
	}
}

impl ApiState for GlobalState {
	fn store(&self) -> &Arc<dyn Store> {
		&self.store
	}

	fn proof_store(&self) -> &ProofStore {
		&self.proof_store
	}
}

/// Simulation settings without latency, so tests do not wait.
pub fn instant_simulation() -> SimulationConfig {
	SimulationConfig {
		latency_ms: 0,
		simulate_error: false,
	}
}

pub fn api_config(port: u16) -> ApiConfig {
	ApiConfig {
		bind_address: SocketAddr::from(([127, 0, 0, 1], port)),
		..Default::default()
	}
}

pub fn mock_global_state(api: ApiConfig, simulation: SimulationConfig) -> (Arc<GlobalState>, Handler) {
	let (ctx, handler) = Context::new();

	logging::init("platform_api=debug", Default::default()).expect("failed to initialize logging");

	let global = Arc::new(GlobalState {
		ctx,
		api,
		simulation,
		store: Arc::new(MemoryStore::new()),
		proof_store: ProofStore::new(),
	});

	(global, handler)
}
