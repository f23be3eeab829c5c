use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::simulate;
use crate::config::SimulationConfig;
use crate::service::{Result, ServiceError};

/// Length of a `0x` prefixed 32 byte hex value.
pub const HEX_VALUE_LENGTH: usize = 66;

/// Mock proof attached to an anonymously published poem. The commitment and
/// nullifier are random bytes, they prove nothing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousProof {
	pub poem_id: String,
	pub commitment: String,
	pub nullifier: String,
	pub content_hash: String,
	pub created_at: DateTime<Utc>,
}

fn random_hex() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("0x{}", hex::encode(bytes))
}

pub fn content_hash(content: &str) -> String {
	format!("0x{}", hex::encode(Sha256::digest(content.as_bytes())))
}

fn is_hex_value(value: &str) -> bool {
	value.len() == HEX_VALUE_LENGTH && value.starts_with("0x")
}

/// Format check only. Any pair of `0x` prefixed 66 character strings passes,
/// including ones this store never issued.
pub fn verify(commitment: &str, nullifier: &str) -> bool {
	is_hex_value(commitment) && is_hex_value(nullifier)
}

#[derive(Default)]
pub struct ProofStore {
	proofs: RwLock<HashMap<String, AnonymousProof>>,
}

impl ProofStore {
	pub fn new() -> Self {
		Self::default()
	}

	#[tracing::instrument(skip_all)]
	pub async fn generate(&self, config: &SimulationConfig, content: &str) -> Result<AnonymousProof> {
		if content.trim().is_empty() {
			return Err(ServiceError::BadRequest("content must not be empty".into()));
		}

		simulate(config).await?;

		let proof = AnonymousProof {
			poem_id: ulid::Ulid::new().to_string(),
			commitment: random_hex(),
			nullifier: random_hex(),
			content_hash: content_hash(content),
			created_at: Utc::now(),
		};

		self.proofs.write().await.insert(proof.poem_id.clone(), proof.clone());

		tracing::debug!(poem_id = %proof.poem_id, "generated simulated proof");

		Ok(proof)
	}

	pub async fn get(&self, poem_id: &str) -> Result<AnonymousProof> {
		self.proofs
			.read()
			.await
			.get(poem_id)
			.cloned()
			.ok_or(ServiceError::NotFound("anonymous poem"))
	}
}
