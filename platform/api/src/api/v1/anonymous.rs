//! Anonymous publishing. The proofs are simulated, see
//! [`crate::simulation::anonymous`].

use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use super::{json_body, json_response, path_param, to_json};
use crate::api::error::{ApiError, Result};
use crate::config::SimulationConfig;
use crate::global::ApiGlobal;
use crate::simulation::anonymous;

#[derive(Debug, serde::Deserialize)]
struct CreateAnonymousPoem {
	content: String,
}

#[derive(Debug, serde::Deserialize)]
struct VerifyProof {
	commitment: String,
	nullifier: String,
}

pub async fn create<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let body: CreateAnonymousPoem = json_body(&global, &mut req).await?;

	let proof = global
		.proof_store()
		.generate(global.config::<SimulationConfig>(), &body.content)
		.await?;

	let mut body = to_json(proof)?;
	body["simulated"] = true.into();

	Ok(json_response(StatusCode::CREATED, body))
}

pub async fn get<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let poem_id = path_param(&req, "poem_id")?;

	let proof = global.proof_store().get(&poem_id).await?;

	let mut body = to_json(proof)?;
	body["simulated"] = true.into();

	Ok(json_response(StatusCode::OK, body))
}

/// Only checks the shape of the two values, see [`anonymous::verify`].
pub async fn verify<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let body: VerifyProof = json_body(&global, &mut req).await?;

	Ok(json_response(
		StatusCode::OK,
		json!({
			"valid": anonymous::verify(&body.commitment, &body.nullifier),
			"simulated": true,
		}),
	))
}
