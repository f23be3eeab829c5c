use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poem {
	pub id: String,
	pub author_id: String,
	pub title: String,
	pub content: String,
	pub metadata: serde_json::Value,
	pub like_count: i64,
	pub bookmark_count: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Poem {
	/// A fresh poem with both counters at zero.
	pub fn new(id: String, author_id: String, title: String, content: String, metadata: serde_json::Value) -> Self {
		let now = Utc::now();

		Self {
			id,
			author_id,
			title,
			content,
			metadata,
			like_count: 0,
			bookmark_count: 0,
			created_at: now,
			updated_at: now,
		}
	}
}
