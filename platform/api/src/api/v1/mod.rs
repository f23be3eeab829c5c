use std::sync::Arc;

use common::http::ext::OptionExt;
use common::http::RouteError;
use common::make_response;
use hyper::body::HttpBody;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, Result};
use super::request_context::RequestContext;
use crate::config::ApiConfig;
use crate::global::ApiGlobal;
use crate::pagination::{Page, Paginated};

pub mod anonymous;
pub mod collective;
pub mod engagement;
pub mod health;
pub mod poems;
pub mod users;

use self::engagement::{Bookmarks, Likes};

pub fn routes<G: ApiGlobal>(_global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.get("/health", health::health)
		.get("/poems", poems::list::<G>)
		.post("/poems", poems::create::<G>)
		.get("/poems/:poem_id", poems::get::<G>)
		.delete("/poems/:poem_id", poems::delete::<G>)
		.post("/poems/:poem_id/likes", engagement::add::<G, Likes>)
		.delete("/poems/:poem_id/likes", engagement::remove::<G, Likes>)
		.get("/poems/:poem_id/likes", engagement::list_by_poem::<G, Likes>)
		.get("/poems/:poem_id/likes/check", engagement::check::<G, Likes>)
		.post("/poems/:poem_id/bookmarks", engagement::add::<G, Bookmarks>)
		.delete("/poems/:poem_id/bookmarks", engagement::remove::<G, Bookmarks>)
		.get("/poems/:poem_id/bookmarks", engagement::list_by_poem::<G, Bookmarks>)
		.get("/poems/:poem_id/bookmarks/check", engagement::check::<G, Bookmarks>)
		.post("/users", users::create::<G>)
		.get("/users/:user_id", users::get::<G>)
		.get("/users/:user_id/poems", poems::list_by_author::<G>)
		.get("/users/:user_id/likes", engagement::list_by_user::<G, Likes>)
		.get("/users/:user_id/bookmarks", engagement::list_by_user::<G, Bookmarks>)
		.post("/anonymous/poems", anonymous::create::<G>)
		.get("/anonymous/poems/:poem_id", anonymous::get::<G>)
		.post("/anonymous/verify", anonymous::verify::<G>)
		.post("/collective/query", collective::query::<G>)
		.build()
		.expect("failed to build router")
}

fn path_param(req: &Request<Body>, name: &str) -> Result<String> {
	req.param(name)
		.cloned()
		.map_err_route((StatusCode::BAD_REQUEST, "missing path parameter"))
}

fn page(req: &Request<Body>) -> Result<Page> {
	Ok(Page::from_query(req.uri().query())?)
}

/// The caller identity, if the request carried one.
fn caller(req: &Request<Body>) -> Option<String> {
	req.context::<RequestContext>().and_then(|ctx| ctx.user_id)
}

fn require_caller(req: &Request<Body>) -> Result<String> {
	caller(req).map_err_route((StatusCode::UNAUTHORIZED, "missing X-User-Id header"))
}

/// Reads the whole body and parses it as JSON, rejecting bodies larger than
/// the configured limit.
async fn json_body<G: ApiGlobal, T: DeserializeOwned>(global: &Arc<G>, req: &mut Request<Body>) -> Result<T> {
	let max_body_size = global.config::<ApiConfig>().max_body_size;

	let declared = req
		.headers()
		.get(hyper::header::CONTENT_LENGTH)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.parse::<usize>().ok());
	if declared.is_some_and(|len| len > max_body_size) {
		return Err((StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into());
	}

	// Chunked bodies carry no length, so the limit is enforced while reading.
	let mut stream = std::mem::take(req.body_mut());
	let mut body = Vec::with_capacity(declared.unwrap_or_default());
	while let Some(chunk) = stream.data().await {
		let chunk =
			chunk.map_err(|err| RouteError::<ApiError>::from((StatusCode::BAD_REQUEST, "failed to read request body", err)))?;
		if body.len() + chunk.len() > max_body_size {
			return Err((StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into());
		}
		body.extend_from_slice(&chunk);
	}

	serde_json::from_slice(&body)
		.map_err(|err| RouteError::<ApiError>::from((StatusCode::BAD_REQUEST, "invalid json body", err)))
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Body> {
	make_response!(status, body)
}

/// A single-key JSON object, for responses whose key depends on the route.
fn keyed(key: &str, value: serde_json::Value) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	map.insert(key.to_owned(), value);
	serde_json::Value::Object(map)
}

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value> {
	serde_json::to_value(value)
		.map_err(|err| RouteError::<ApiError>::from((StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response", err)))
}

fn paginated_response<T: Serialize>(rows: Paginated<T>, key: &str) -> Result<Response<Body>> {
	let body = rows
		.into_json(key)
		.map_err(|err| RouteError::<ApiError>::from((StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response", err)))?;

	Ok(json_response(StatusCode::OK, body))
}
