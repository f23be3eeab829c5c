use common::http::RouteError;
use hyper::StatusCode;

use crate::pagination::PageError;
use crate::service::ServiceError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read http body: {0}")]
	ParseHttpBody(#[from] hyper::Error),
	#[error("failed to parse json body: {0}")]
	ParseJson(#[from] serde_json::Error),
	#[error("invalid pagination: {0}")]
	Pagination(#[from] PageError),
	#[error("service error: {0}")]
	Service(#[from] ServiceError),
}

impl From<ServiceError> for RouteError<ApiError> {
	#[track_caller]
	fn from(err: ServiceError) -> Self {
		let status = match &err {
			ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
			ServiceError::Conflict(_) => StatusCode::CONFLICT,
			ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ServiceError::Forbidden => StatusCode::FORBIDDEN,
			ServiceError::Simulated => StatusCode::SERVICE_UNAVAILABLE,
			ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};

		// store errors are logged with their source, clients only see a generic message
		let message = match &err {
			ServiceError::Store(_) => "Internal Server Error".to_owned(),
			_ => err.to_string(),
		};

		Self::from((status, message, err))
	}
}

impl From<PageError> for RouteError<ApiError> {
	#[track_caller]
	fn from(err: PageError) -> Self {
		Self::from((StatusCode::BAD_REQUEST, err.to_string(), err))
	}
}
