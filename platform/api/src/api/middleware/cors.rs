use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use common::http::RouteError;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Body, Response};
use routerify::{Middleware, RequestInfo};

use crate::api::error::ApiError;
use crate::config::ApiConfig;
use crate::global::ApiGlobal;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
type ErrorResponse = Pin<Box<dyn Future<Output = Response<Body>> + Send>>;

fn allowed_origin<G: ApiGlobal>(global: &Arc<G>) -> HeaderValue {
	let origin = &global.config::<ApiConfig>().cors_origin;

	HeaderValue::from_str(origin).unwrap_or_else(|_| {
		tracing::warn!(origin = %origin, "invalid cors origin, allowing any origin");
		HeaderValue::from_static("*")
	})
}

pub fn apply_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
	headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
	headers.insert(
		header::ACCESS_CONTROL_ALLOW_METHODS,
		HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
	);
	headers.insert(
		header::ACCESS_CONTROL_ALLOW_HEADERS,
		HeaderValue::from_static("Content-Type, X-User-Id"),
	);
	headers.insert(
		header::ACCESS_CONTROL_MAX_AGE,
		HeaderValue::from(Duration::from_secs(86400).as_secs()),
	);
}

pub fn cors_middleware<G: ApiGlobal>(global: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	let origin = allowed_origin(global);

	Middleware::post(move |mut resp| {
		apply_cors_headers(resp.headers_mut(), &origin);
		async move { Ok(resp) }
	})
}

/// Post middlewares do not run for failed requests, so the error handler adds
/// the same headers.
pub fn cors_error_handler<G: ApiGlobal>(
	global: &Arc<G>,
) -> impl Fn(BoxError, RequestInfo) -> ErrorResponse + Send + Sync + 'static {
	let origin = allowed_origin(global);

	move |err: BoxError, info: RequestInfo| {
		let origin = origin.clone();
		let resp: ErrorResponse = Box::pin(async move {
			let mut resp = common::http::error_handler::<ApiError>(err, info).await;
			apply_cors_headers(resp.headers_mut(), &origin);
			resp
		});
		resp
	}
}
