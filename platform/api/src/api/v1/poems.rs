use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use super::{json_body, json_response, page, paginated_response, path_param, require_caller, to_json};
use crate::api::error::{ApiError, Result};
use crate::global::ApiGlobal;
use crate::service::{NewPoem, PoemService};

pub async fn create<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let author_id = require_caller(&req)?;
	let body: NewPoem = json_body(&global, &mut req).await?;

	let poem = PoemService::new(global.store().clone()).create(&author_id, body).await?;

	Ok(json_response(StatusCode::CREATED, to_json(poem)?))
}

pub async fn get<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let poem_id = path_param(&req, "poem_id")?;

	let poem = PoemService::new(global.store().clone()).get(&poem_id).await?;

	Ok(json_response(StatusCode::OK, to_json(poem)?))
}

pub async fn list<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let page = page(&req)?;

	let poems = PoemService::new(global.store().clone()).list(page).await?;

	paginated_response(poems, "items")
}

pub async fn list_by_author<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let author_id = path_param(&req, "user_id")?;
	let page = page(&req)?;

	let poems = PoemService::new(global.store().clone())
		.list_by_author(&author_id, page)
		.await?;

	paginated_response(poems, "items")
}

pub async fn delete<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let caller = require_caller(&req)?;
	let poem_id = path_param(&req, "poem_id")?;

	PoemService::new(global.store().clone()).delete(&poem_id, &caller).await?;

	Ok(json_response(StatusCode::OK, json!({ "success": true })))
}
