use std::sync::Arc;

use super::{Result, ServiceError};
use crate::database::{Poem, Store};
use crate::pagination::{Page, Paginated};

pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewPoem {
	pub title: String,
	pub content: String,
	#[serde(default)]
	pub metadata: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct PoemService {
	store: Arc<dyn Store>,
}

impl PoemService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	#[tracing::instrument(skip(self, poem), fields(title = %poem.title))]
	pub async fn create(&self, author_id: &str, poem: NewPoem) -> Result<Poem> {
		let title = poem.title.trim();
		if title.is_empty() {
			return Err(ServiceError::BadRequest("title must not be empty".into()));
		}

		if title.chars().count() > MAX_TITLE_LENGTH {
			return Err(ServiceError::BadRequest(format!(
				"title must be at most {MAX_TITLE_LENGTH} characters long"
			)));
		}

		if poem.content.trim().is_empty() {
			return Err(ServiceError::BadRequest("content must not be empty".into()));
		}

		let metadata = match poem.metadata {
			None | Some(serde_json::Value::Null) => serde_json::json!({}),
			Some(metadata @ serde_json::Value::Object(_)) => metadata,
			Some(_) => return Err(ServiceError::BadRequest("metadata must be an object".into())),
		};

		let poem = Poem::new(
			ulid::Ulid::new().to_string(),
			author_id.to_owned(),
			title.to_owned(),
			poem.content,
			metadata,
		);

		Ok(self.store.create_poem(poem).await?)
	}

	pub async fn get(&self, poem_id: &str) -> Result<Poem> {
		self.store.poem_by_id(poem_id).await?.ok_or(ServiceError::NotFound("poem"))
	}

	pub async fn list(&self, page: Page) -> Result<Paginated<Poem>> {
		self.list_filtered(None, page).await
	}

	pub async fn list_by_author(&self, author_id: &str, page: Page) -> Result<Paginated<Poem>> {
		self.list_filtered(Some(author_id), page).await
	}

	async fn list_filtered(&self, author_id: Option<&str>, page: Page) -> Result<Paginated<Poem>> {
		let (items, total) = tokio::try_join!(
			self.store.list_poems(author_id, page),
			self.store.count_poems(author_id),
		)?;

		Ok(Paginated::new(items, total, page))
	}

	/// Only the author may delete a poem.
	#[tracing::instrument(skip(self))]
	pub async fn delete(&self, poem_id: &str, caller: &str) -> Result<()> {
		let poem = self.get(poem_id).await?;

		if poem.author_id != caller {
			return Err(ServiceError::Forbidden);
		}

		if !self.store.delete_poem(poem_id).await? {
			return Err(ServiceError::NotFound("poem"));
		}

		Ok(())
	}
}
