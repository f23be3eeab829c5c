use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use super::{json_body, json_response};
use crate::api::error::{ApiError, Result};
use crate::config::SimulationConfig;
use crate::global::ApiGlobal;
use crate::simulation::collective;

#[derive(Debug, serde::Deserialize)]
struct CollectiveQuery {
	question: String,
}

pub async fn query<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let body: CollectiveQuery = json_body(&global, &mut req).await?;

	let response = collective::query(global.config::<SimulationConfig>(), &body.question).await?;

	Ok(json_response(
		StatusCode::OK,
		json!({
			"theme": response.theme,
			"poem": response.poem,
			"question": response.question,
			"simulated": true,
		}),
	))
}
