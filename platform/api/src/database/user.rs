use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub username: String,
	pub display_name: String,
	pub created_at: DateTime<Utc>,
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
	if username.len() < 3 {
		return Err("Username must be at least 3 characters long");
	}

	if username.len() > 20 {
		return Err("Username must be at most 20 characters long");
	}

	if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err("Username must only contain alphanumeric characters and underscores");
	}

	Ok(())
}
