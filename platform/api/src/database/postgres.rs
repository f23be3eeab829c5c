use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AddEngagement, Engagement, EngagementFilter, EngagementKind, Poem, Result, Store, User};
use crate::pagination::Page;

/// SQLSTATE raised when an engagement references a poem that no longer exists.
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PgStore {
	db: Arc<PgPool>,
}

impl PgStore {
	pub fn new(db: Arc<PgPool>) -> Self {
		Self { db }
	}

	/// Applies the migrations shipped with the crate.
	pub async fn migrate(&self) -> Result<()> {
		sqlx::migrate!("./migrations").run(self.db.as_ref()).await?;
		Ok(())
	}
}

#[async_trait]
impl Store for PgStore {
	#[tracing::instrument(skip_all, fields(username = %user.username))]
	async fn create_user(&self, user: User) -> Result<Option<User>> {
		Ok(sqlx::query_as(
			"INSERT INTO users (id, username, display_name, created_at) VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING RETURNING *",
		)
		.bind(&user.id)
		.bind(&user.username)
		.bind(&user.display_name)
		.bind(user.created_at)
		.fetch_optional(self.db.as_ref())
		.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn user_by_id(&self, id: &str) -> Result<Option<User>> {
		Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	#[tracing::instrument(skip_all, fields(poem_id = %poem.id))]
	async fn create_poem(&self, poem: Poem) -> Result<Poem> {
		Ok(sqlx::query_as(
			"INSERT INTO poems (id, author_id, title, content, metadata, like_count, bookmark_count, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
		)
		.bind(&poem.id)
		.bind(&poem.author_id)
		.bind(&poem.title)
		.bind(&poem.content)
		.bind(&poem.metadata)
		.bind(poem.like_count)
		.bind(poem.bookmark_count)
		.bind(poem.created_at)
		.bind(poem.updated_at)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn poem_by_id(&self, id: &str) -> Result<Option<Poem>> {
		Ok(sqlx::query_as("SELECT * FROM poems WHERE id = $1")
			.bind(id)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn list_poems(&self, author_id: Option<&str>, page: Page) -> Result<Vec<Poem>> {
		Ok(sqlx::query_as(
			"SELECT * FROM poems WHERE ($1::VARCHAR IS NULL OR author_id = $1) ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
		)
		.bind(author_id)
		.bind(page.limit())
		.bind(page.offset())
		.fetch_all(self.db.as_ref())
		.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn count_poems(&self, author_id: Option<&str>) -> Result<i64> {
		Ok(
			sqlx::query_scalar("SELECT COUNT(*) FROM poems WHERE ($1::VARCHAR IS NULL OR author_id = $1)")
				.bind(author_id)
				.fetch_one(self.db.as_ref())
				.await?,
		)
	}

	#[tracing::instrument(skip(self))]
	async fn delete_poem(&self, id: &str) -> Result<bool> {
		// likes and bookmarks go with it through ON DELETE CASCADE
		let result = sqlx::query("DELETE FROM poems WHERE id = $1")
			.bind(id)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self))]
	async fn add_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<AddEngagement> {
		let mut tx = self.db.begin().await?;

		let row: Option<Engagement> = match sqlx::query_as(&format!(
			"INSERT INTO {} (user_id, poem_id, created_at) VALUES ($1, $2, NOW()) ON CONFLICT DO NOTHING RETURNING user_id, poem_id, created_at",
			kind.table()
		))
		.bind(user_id)
		.bind(poem_id)
		.fetch_optional(&mut *tx)
		.await
		{
			Ok(row) => row,
			// The poem is gone; the failed transaction rolls back on drop.
			Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
				return Ok(AddEngagement::PoemMissing);
			}
			Err(err) => return Err(err.into()),
		};

		let Some(row) = row else {
			tx.rollback().await?;
			return Ok(AddEngagement::Exists);
		};

		sqlx::query(&format!(
			"UPDATE poems SET {0} = {0} + 1, updated_at = NOW() WHERE id = $1",
			kind.counter_column()
		))
		.bind(poem_id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(AddEngagement::Added(row))
	}

	#[tracing::instrument(skip(self))]
	async fn remove_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool> {
		let mut tx = self.db.begin().await?;

		let result = sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1 AND poem_id = $2", kind.table()))
			.bind(user_id)
			.bind(poem_id)
			.execute(&mut *tx)
			.await?;

		if result.rows_affected() == 0 {
			tx.rollback().await?;
			return Ok(false);
		}

		sqlx::query(&format!(
			"UPDATE poems SET {0} = GREATEST({0} - 1, 0), updated_at = NOW() WHERE id = $1",
			kind.counter_column()
		))
		.bind(poem_id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(true)
	}

	#[tracing::instrument(skip(self))]
	async fn engagement_exists(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool> {
		Ok(sqlx::query_scalar(&format!(
			"SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1 AND poem_id = $2)",
			kind.table()
		))
		.bind(user_id)
		.bind(poem_id)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn list_engagements(
		&self,
		kind: EngagementKind,
		filter: EngagementFilter<'_>,
		page: Page,
	) -> Result<Vec<Engagement>> {
		Ok(sqlx::query_as(&format!(
			"SELECT user_id, poem_id, created_at FROM {} WHERE {} = $1 ORDER BY created_at DESC, {} DESC LIMIT $2 OFFSET $3",
			kind.table(),
			filter.column(),
			filter.tiebreak_column(),
		))
		.bind(filter.value())
		.bind(page.limit())
		.bind(page.offset())
		.fetch_all(self.db.as_ref())
		.await?)
	}

	#[tracing::instrument(skip(self))]
	async fn count_engagements(&self, kind: EngagementKind, filter: EngagementFilter<'_>) -> Result<i64> {
		Ok(sqlx::query_scalar(&format!(
			"SELECT COUNT(*) FROM {} WHERE {} = $1",
			kind.table(),
			filter.column()
		))
		.bind(filter.value())
		.fetch_one(self.db.as_ref())
		.await?)
	}
}
