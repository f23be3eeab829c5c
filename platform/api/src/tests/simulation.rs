use std::time::Duration;

use crate::config::SimulationConfig;
use crate::service::ServiceError;
use crate::simulation::anonymous::{self, content_hash, ProofStore, HEX_VALUE_LENGTH};
use crate::simulation::collective;

fn instant() -> SimulationConfig {
	SimulationConfig {
		latency_ms: 0,
		simulate_error: false,
	}
}

fn is_lower_hex(value: &str) -> bool {
	value.len() == HEX_VALUE_LENGTH
		&& value.starts_with("0x")
		&& value[2..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[tokio::test]
async fn test_generate_proof() {
	let store = ProofStore::new();

	let proof = store.generate(&instant(), "hello").await.unwrap();
	assert!(is_lower_hex(&proof.commitment), "{}", proof.commitment);
	assert!(is_lower_hex(&proof.nullifier), "{}", proof.nullifier);
	assert_ne!(proof.commitment, proof.nullifier);
	assert_eq!(
		proof.content_hash,
		"0x2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
	);

	assert_eq!(store.get(&proof.poem_id).await.unwrap(), proof);
	assert!(anonymous::verify(&proof.commitment, &proof.nullifier));
}

#[tokio::test]
async fn test_get_unknown_proof() {
	let store = ProofStore::new();
	assert!(matches!(store.get("nope").await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_generate_rejects_empty_content() {
	let store = ProofStore::new();
	assert!(matches!(
		store.generate(&instant(), "  ").await,
		Err(ServiceError::BadRequest(_))
	));
}

#[tokio::test]
async fn test_simulated_error() {
	let config = SimulationConfig {
		latency_ms: 0,
		simulate_error: true,
	};

	let store = ProofStore::new();
	assert!(matches!(
		store.generate(&config, "hello").await,
		Err(ServiceError::Simulated)
	));
	assert!(matches!(
		collective::query(&config, "love").await,
		Err(ServiceError::Simulated)
	));
}

#[tokio::test]
async fn test_simulated_latency() {
	let config = SimulationConfig {
		latency_ms: 50,
		simulate_error: false,
	};

	let start = tokio::time::Instant::now();
	collective::query(&config, "love").await.unwrap();
	assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_verify_checks_format_only() {
	let valid = format!("0x{}", "a".repeat(64));
	let never_issued = format!("0x{}", "z".repeat(64));

	assert!(anonymous::verify(&valid, &valid));
	assert!(anonymous::verify(&never_issued, &valid));

	assert!(!anonymous::verify(&valid, &format!("0x{}", "a".repeat(63))));
	assert!(!anonymous::verify(&"a".repeat(66), &valid));
	assert!(!anonymous::verify(&valid, ""));
}

#[test]
fn test_content_hash() {
	assert_eq!(
		content_hash(""),
		"0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
	);
}

#[tokio::test]
async fn test_collective_query_templates() {
	let cases = [
		("What is love?", "love"),
		("My HEART aches", "love"),
		("Tell me about the ocean", "nature"),
		("why is the sky blue", "nature"),
		("a memory of summer", "time"),
		("what do we build together", "collective"),
	];

	for (question, theme) in cases {
		let response = collective::query(&instant(), question).await.unwrap();
		assert_eq!(response.theme, theme, "{question}");
		assert_eq!(response.question, question);
		assert!(!response.poem.is_empty());
	}
}

#[tokio::test]
async fn test_collective_query_rejects_empty_question() {
	assert!(matches!(
		collective::query(&instant(), "   ").await,
		Err(ServiceError::BadRequest(_))
	));
}
