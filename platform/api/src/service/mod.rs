use crate::database::StoreError;

mod engagement;
mod poem;
mod user;

pub use engagement::EngagementService;
pub use poem::{NewPoem, PoemService};
pub use user::UserService;

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("{0}")]
	Conflict(&'static str),
	#[error("{0}")]
	BadRequest(String),
	#[error("forbidden")]
	Forbidden,
	#[error("simulated failure")]
	Simulated,
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
