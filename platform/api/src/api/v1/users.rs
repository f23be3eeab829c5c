use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request, Response, StatusCode};

use super::{json_body, json_response, path_param, to_json};
use crate::api::error::{ApiError, Result};
use crate::global::ApiGlobal;
use crate::service::UserService;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUser {
	username: String,
	#[serde(default)]
	display_name: Option<String>,
}

pub async fn create<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let body: CreateUser = json_body(&global, &mut req).await?;

	let user = UserService::new(global.store().clone())
		.create(&body.username, body.display_name.as_deref())
		.await?;

	Ok(json_response(StatusCode::CREATED, to_json(user)?))
}

pub async fn get<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let user_id = path_param(&req, "user_id")?;

	let user = UserService::new(global.store().clone()).get(&user_id).await?;

	Ok(json_response(StatusCode::OK, to_json(user)?))
}
