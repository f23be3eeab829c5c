use std::sync::Arc;

use common::http::RouteError;
use hyper::{Body, Request, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::global::ApiGlobal;

pub const USER_ID_HEADER: &str = "x-user-id";

const MAX_USER_ID_LENGTH: usize = 64;

fn valid_user_id(id: &str) -> bool {
	!id.is_empty() && id.len() <= MAX_USER_ID_LENGTH && id.bytes().all(|b| b.is_ascii_graphic())
}

async fn request_context(req: Request<Body>) -> Result<Request<Body>, RouteError<ApiError>> {
	let mut context = RequestContext::default();

	if let Some(header) = req.headers().get(USER_ID_HEADER) {
		let user_id = header
			.to_str()
			.ok()
			.map(str::trim)
			.filter(|id| valid_user_id(id))
			.ok_or((StatusCode::BAD_REQUEST, "invalid X-User-Id header"))?;

		context.user_id = Some(user_id.to_owned());
	}

	req.set_context(context);

	Ok(req)
}

pub fn request_context_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::pre(request_context)
}
