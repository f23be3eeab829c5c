use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use super::{caller, json_response, keyed, page, paginated_response, path_param, require_caller, to_json};
use crate::api::error::{ApiError, Result};
use crate::database::EngagementKind;
use crate::global::ApiGlobal;
use crate::service::EngagementService;

/// Route shapes shared by likes and bookmarks. Only the kind and the JSON
/// keys differ between the two.
pub trait EngagementRoute: Send + Sync + 'static {
	const KIND: EngagementKind;

	/// Key of the created row in the add response.
	const ITEM_KEY: &'static str;

	/// Key of the boolean in the check response.
	const CHECK_KEY: &'static str;

	/// Key of the rows in list responses.
	const LIST_KEY: &'static str;
}

pub struct Likes;

impl EngagementRoute for Likes {
	const CHECK_KEY: &'static str = "hasLiked";
	const ITEM_KEY: &'static str = "like";
	const KIND: EngagementKind = EngagementKind::Like;
	const LIST_KEY: &'static str = "items";
}

pub struct Bookmarks;

impl EngagementRoute for Bookmarks {
	const CHECK_KEY: &'static str = "hasBookmarked";
	const ITEM_KEY: &'static str = "bookmark";
	const KIND: EngagementKind = EngagementKind::Bookmark;
	const LIST_KEY: &'static str = "bookmarks";
}

fn service<G: ApiGlobal, K: EngagementRoute>(global: &G) -> EngagementService {
	EngagementService::new(global.store().clone(), K::KIND)
}

pub async fn add<G: ApiGlobal, K: EngagementRoute>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let user_id = require_caller(&req)?;
	let poem_id = path_param(&req, "poem_id")?;

	let row = service::<G, K>(&global).add(&user_id, &poem_id).await?;

	Ok(json_response(StatusCode::OK, keyed(K::ITEM_KEY, to_json(row)?)))
}

pub async fn remove<G: ApiGlobal, K: EngagementRoute>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let user_id = require_caller(&req)?;
	let poem_id = path_param(&req, "poem_id")?;

	service::<G, K>(&global).remove(&user_id, &poem_id).await?;

	Ok(json_response(StatusCode::OK, json!({ "success": true })))
}

/// Answers false for anonymous callers instead of rejecting them.
pub async fn check<G: ApiGlobal, K: EngagementRoute>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let poem_id = path_param(&req, "poem_id")?;

	let exists = match caller(&req) {
		Some(user_id) => service::<G, K>(&global).exists(&user_id, &poem_id).await?,
		None => false,
	};

	Ok(json_response(StatusCode::OK, keyed(K::CHECK_KEY, exists.into())))
}

pub async fn list_by_poem<G: ApiGlobal, K: EngagementRoute>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let poem_id = path_param(&req, "poem_id")?;
	let page = page(&req)?;

	let rows = service::<G, K>(&global).list_by_poem(&poem_id, page).await?;

	paginated_response(rows, K::LIST_KEY)
}

pub async fn list_by_user<G: ApiGlobal, K: EngagementRoute>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;
	let user_id = path_param(&req, "user_id")?;
	let page = page(&req)?;

	let rows = service::<G, K>(&global).list_by_user(&user_id, page).await?;

	paginated_response(rows, K::LIST_KEY)
}
