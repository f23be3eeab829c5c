use async_trait::async_trait;

use crate::pagination::Page;

mod engagement;
mod memory;
mod poem;
mod postgres;
mod user;

pub use engagement::{AddEngagement, Engagement, EngagementFilter, EngagementKind};
pub use memory::MemoryStore;
pub use poem::Poem;
pub use postgres::PgStore;
pub use user::{validate_username, User};

/// Database uri that selects the in-process store instead of Postgres.
pub const MEMORY_URI: &str = "memory://";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Persistence for users, poems and engagements.
///
/// Every mutating engagement call is atomic: the row and the poem counter
/// change together or not at all.
#[async_trait]
pub trait Store: Send + Sync + 'static {
	/// Returns `None` when the username is already taken.
	async fn create_user(&self, user: User) -> Result<Option<User>>;

	async fn user_by_id(&self, id: &str) -> Result<Option<User>>;

	async fn create_poem(&self, poem: Poem) -> Result<Poem>;

	async fn poem_by_id(&self, id: &str) -> Result<Option<Poem>>;

	/// Newest first, optionally restricted to one author.
	async fn list_poems(&self, author_id: Option<&str>, page: Page) -> Result<Vec<Poem>>;

	async fn count_poems(&self, author_id: Option<&str>) -> Result<i64>;

	/// Deletes the poem with its likes and bookmarks. Returns false when the
	/// poem did not exist.
	async fn delete_poem(&self, id: &str) -> Result<bool>;

	/// Inserts the pair and increments the poem counter. The poem existence
	/// check happens in the same atomic step as the insert.
	async fn add_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<AddEngagement>;

	/// Deletes the pair and decrements the poem counter. Returns false when
	/// the pair did not exist.
	async fn remove_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool>;

	async fn engagement_exists(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool>;

	async fn list_engagements(
		&self,
		kind: EngagementKind,
		filter: EngagementFilter<'_>,
		page: Page,
	) -> Result<Vec<Engagement>>;

	async fn count_engagements(&self, kind: EngagementKind, filter: EngagementFilter<'_>) -> Result<i64>;
}
