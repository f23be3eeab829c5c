use std::sync::Arc;

use crate::config::{ApiConfig, SimulationConfig};
use crate::database::Store;
use crate::simulation::anonymous::ProofStore;

pub trait ApiState {
	fn store(&self) -> &Arc<dyn Store>;
	fn proof_store(&self) -> &ProofStore;
}

pub trait ApiGlobal:
	common::global::GlobalCtx
	+ common::global::GlobalConfigProvider<ApiConfig>
	+ common::global::GlobalConfigProvider<SimulationConfig>
	+ common::global::GlobalConfig
	+ ApiState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> ApiGlobal for T where
	T: common::global::GlobalCtx
		+ common::global::GlobalConfigProvider<ApiConfig>
		+ common::global::GlobalConfigProvider<SimulationConfig>
		+ common::global::GlobalConfig
		+ ApiState
		+ Send
		+ Sync
		+ 'static
{
}
