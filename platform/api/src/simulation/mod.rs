//! Stand-ins for features the platform advertises but does not implement.
//! Nothing in here does real cryptography or text generation, every response
//! is marked as simulated.

use crate::config::SimulationConfig;
use crate::service::{Result, ServiceError};

pub mod anonymous;
pub mod collective;

/// Waits the configured latency, then fails if errors are being simulated.
async fn simulate(config: &SimulationConfig) -> Result<()> {
	let latency = config.latency();
	if !latency.is_zero() {
		tokio::time::sleep(latency).await;
	}

	if config.simulate_error {
		tracing::debug!("returning simulated error");
		return Err(ServiceError::Simulated);
	}

	Ok(())
}
