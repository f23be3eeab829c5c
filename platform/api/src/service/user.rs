use std::sync::Arc;

use chrono::Utc;

use super::{Result, ServiceError};
use crate::database::{validate_username, Store, User};

pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

#[derive(Clone)]
pub struct UserService {
	store: Arc<dyn Store>,
}

impl UserService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	/// The display name falls back to the username.
	#[tracing::instrument(skip(self))]
	pub async fn create(&self, username: &str, display_name: Option<&str>) -> Result<User> {
		validate_username(username).map_err(|err| ServiceError::BadRequest(err.into()))?;

		let display_name = display_name.map(str::trim).filter(|name| !name.is_empty()).unwrap_or(username);
		if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
			return Err(ServiceError::BadRequest(format!(
				"Display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters long"
			)));
		}

		let user = User {
			id: ulid::Ulid::new().to_string(),
			username: username.to_owned(),
			display_name: display_name.to_owned(),
			created_at: Utc::now(),
		};

		self.store
			.create_user(user)
			.await?
			.ok_or(ServiceError::Conflict("Username already taken"))
	}

	pub async fn get(&self, user_id: &str) -> Result<User> {
		self.store.user_by_id(user_id).await?.ok_or(ServiceError::NotFound("user"))
	}
}
