use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::{Body, Request, Response, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::{ApiError, Result};
use crate::config::ApiConfig;
use crate::global::ApiGlobal;

pub mod error;
pub mod middleware;
pub mod request_context;
pub mod v1;

async fn preflight(_: Request<Body>) -> Result<Response<Body>> {
	Ok(Response::builder()
		.status(StatusCode::NO_CONTENT)
		.body(Body::empty())
		.expect("failed to build response"))
}

async fn not_found(_: Request<Body>) -> Result<Response<Body>> {
	Ok(make_response!(
		StatusCode::NOT_FOUND,
		json!({
			"error": "not_found",
		})
	))
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		// Errors skip the post middlewares, this handler adds the CORS headers itself
		.err_handler_with_info(middleware::cors::cors_error_handler(global))
		// Reads the caller identity, a missing header is fine, a malformed one is not
		.middleware(middleware::request_context::request_context_middleware(global))
		.middleware(middleware::cors::cors_middleware(global))
		.scope("/v1", v1::routes(global))
		.options("/*", preflight)
		.any(not_found)
		.build()
		.expect("failed to build router")
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();
	tracing::info!("API listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router only keeps a Weak reference to the global state, open
	// keep-alive connections must not keep it alive once shutdown starts.
	let request_service = RequestServiceBuilder::new(routes(&global)).expect("failed to build request service");

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = request_service.build(addr);

				tracing::debug!("Accepted connection from {}", addr);

				tokio::spawn(async move {
					Http::new().serve_connection(socket, service).await.ok();
				});
			},
		}
	}
}
