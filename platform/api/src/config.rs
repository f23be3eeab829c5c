use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Value of the Access-Control-Allow-Origin header
	pub cors_origin: String,

	/// Largest accepted request body, in bytes
	pub max_body_size: usize,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0], 4000)),
			cors_origin: "*".to_string(),
			max_body_size: 64 * 1024,
		}
	}
}

/// Settings of the simulated features (anonymous proofs and collective
/// queries). Neither does real work, they wait and answer from canned data.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Artificial latency added to every simulated call, in milliseconds
	pub latency_ms: u64,

	/// Makes every simulated call fail after the latency
	pub simulate_error: bool,
}

impl SimulationConfig {
	pub fn latency(&self) -> Duration {
		Duration::from_millis(self.latency_ms)
	}
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			latency_ms: 1500,
			simulate_error: false,
		}
	}
}
