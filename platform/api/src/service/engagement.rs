use std::sync::Arc;

use super::{Result, ServiceError};
use crate::database::{AddEngagement, Engagement, EngagementFilter, EngagementKind, Store};
use crate::pagination::{Page, Paginated};

/// Likes and bookmarks. One service type serves both, the kind picks the
/// table and the poem counter.
#[derive(Clone)]
pub struct EngagementService {
	store: Arc<dyn Store>,
	kind: EngagementKind,
}

impl EngagementService {
	pub fn new(store: Arc<dyn Store>, kind: EngagementKind) -> Self {
		Self { store, kind }
	}

	pub fn likes(store: Arc<dyn Store>) -> Self {
		Self::new(store, EngagementKind::Like)
	}

	pub fn bookmarks(store: Arc<dyn Store>) -> Self {
		Self::new(store, EngagementKind::Bookmark)
	}

	pub fn kind(&self) -> EngagementKind {
		self.kind
	}

	fn conflict(&self) -> ServiceError {
		match self.kind {
			EngagementKind::Like => ServiceError::Conflict("Poem already liked"),
			EngagementKind::Bookmark => ServiceError::Conflict("Poem already bookmarked"),
		}
	}

	fn missing(&self) -> ServiceError {
		match self.kind {
			EngagementKind::Like => ServiceError::NotFound("like"),
			EngagementKind::Bookmark => ServiceError::NotFound("bookmark"),
		}
	}

	async fn ensure_poem(&self, poem_id: &str) -> Result<()> {
		match self.store.poem_by_id(poem_id).await? {
			Some(_) => Ok(()),
			None => Err(ServiceError::NotFound("poem")),
		}
	}

	#[tracing::instrument(skip(self), fields(kind = %self.kind))]
	pub async fn add(&self, user_id: &str, poem_id: &str) -> Result<Engagement> {
		let row = match self.store.add_engagement(self.kind, user_id, poem_id).await? {
			AddEngagement::Added(row) => row,
			AddEngagement::Exists => return Err(self.conflict()),
			AddEngagement::PoemMissing => return Err(ServiceError::NotFound("poem")),
		};

		tracing::debug!("engagement added");

		Ok(row)
	}

	#[tracing::instrument(skip(self), fields(kind = %self.kind))]
	pub async fn remove(&self, user_id: &str, poem_id: &str) -> Result<()> {
		if !self.store.remove_engagement(self.kind, user_id, poem_id).await? {
			return Err(self.missing());
		}

		tracing::debug!("engagement removed");

		Ok(())
	}

	pub async fn exists(&self, user_id: &str, poem_id: &str) -> Result<bool> {
		Ok(self.store.engagement_exists(self.kind, user_id, poem_id).await?)
	}

	#[tracing::instrument(skip(self), fields(kind = %self.kind))]
	pub async fn list_by_poem(&self, poem_id: &str, page: Page) -> Result<Paginated<Engagement>> {
		self.ensure_poem(poem_id).await?;
		self.list(EngagementFilter::Poem(poem_id), page).await
	}

	#[tracing::instrument(skip(self), fields(kind = %self.kind))]
	pub async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Paginated<Engagement>> {
		self.list(EngagementFilter::User(user_id), page).await
	}

	async fn list(&self, filter: EngagementFilter<'_>, page: Page) -> Result<Paginated<Engagement>> {
		let (items, total) = tokio::try_join!(
			self.store.list_engagements(self.kind, filter, page),
			self.store.count_engagements(self.kind, filter),
		)?;

		Ok(Paginated::new(items, total, page))
	}
}
