use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{AddEngagement, Engagement, EngagementFilter, EngagementKind, Poem, Result, Store, User};
use crate::pagination::Page;

#[derive(Default)]
struct Tables {
	users: HashMap<String, User>,
	poems: HashMap<String, Poem>,
	likes: Vec<Engagement>,
	bookmarks: Vec<Engagement>,
}

impl Tables {
	fn engagements(&self, kind: EngagementKind) -> &Vec<Engagement> {
		match kind {
			EngagementKind::Like => &self.likes,
			EngagementKind::Bookmark => &self.bookmarks,
		}
	}

	fn engagements_mut(&mut self, kind: EngagementKind) -> &mut Vec<Engagement> {
		match kind {
			EngagementKind::Like => &mut self.likes,
			EngagementKind::Bookmark => &mut self.bookmarks,
		}
	}

	fn counter_mut(poem: &mut Poem, kind: EngagementKind) -> &mut i64 {
		match kind {
			EngagementKind::Like => &mut poem.like_count,
			EngagementKind::Bookmark => &mut poem.bookmark_count,
		}
	}
}

fn window<T>(rows: Vec<T>, page: Page) -> Vec<T> {
	rows.into_iter()
		.skip(page.offset() as usize)
		.take(page.limit() as usize)
		.collect()
}

/// Store kept in process memory. All tables sit behind one lock, so every
/// call is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
	tables: Mutex<Tables>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl Store for MemoryStore {
	async fn create_user(&self, user: User) -> Result<Option<User>> {
		let mut tables = self.tables.lock().await;

		if tables.users.contains_key(&user.id) || tables.users.values().any(|u| u.username == user.username) {
			return Ok(None);
		}

		tables.users.insert(user.id.clone(), user.clone());
		Ok(Some(user))
	}

	async fn user_by_id(&self, id: &str) -> Result<Option<User>> {
		Ok(self.tables.lock().await.users.get(id).cloned())
	}

	async fn create_poem(&self, poem: Poem) -> Result<Poem> {
		self.tables.lock().await.poems.insert(poem.id.clone(), poem.clone());
		Ok(poem)
	}

	async fn poem_by_id(&self, id: &str) -> Result<Option<Poem>> {
		Ok(self.tables.lock().await.poems.get(id).cloned())
	}

	async fn list_poems(&self, author_id: Option<&str>, page: Page) -> Result<Vec<Poem>> {
		let tables = self.tables.lock().await;

		let mut poems = tables
			.poems
			.values()
			.filter(|p| author_id.map_or(true, |id| p.author_id == id))
			.cloned()
			.collect::<Vec<_>>();
		poems.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));

		Ok(window(poems, page))
	}

	async fn count_poems(&self, author_id: Option<&str>) -> Result<i64> {
		let tables = self.tables.lock().await;

		Ok(tables
			.poems
			.values()
			.filter(|p| author_id.map_or(true, |id| p.author_id == id))
			.count() as i64)
	}

	async fn delete_poem(&self, id: &str) -> Result<bool> {
		let mut tables = self.tables.lock().await;

		if tables.poems.remove(id).is_none() {
			return Ok(false);
		}

		tables.likes.retain(|row| row.poem_id != id);
		tables.bookmarks.retain(|row| row.poem_id != id);

		Ok(true)
	}

	async fn add_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<AddEngagement> {
		let mut tables = self.tables.lock().await;

		if !tables.poems.contains_key(poem_id) {
			return Ok(AddEngagement::PoemMissing);
		}

		if tables
			.engagements(kind)
			.iter()
			.any(|row| row.user_id == user_id && row.poem_id == poem_id)
		{
			return Ok(AddEngagement::Exists);
		}

		let row = Engagement {
			user_id: user_id.to_owned(),
			poem_id: poem_id.to_owned(),
			created_at: Utc::now(),
		};
		tables.engagements_mut(kind).push(row.clone());

		if let Some(poem) = tables.poems.get_mut(poem_id) {
			*Tables::counter_mut(poem, kind) += 1;
			poem.updated_at = row.created_at;
		}

		Ok(AddEngagement::Added(row))
	}

	async fn remove_engagement(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool> {
		let mut tables = self.tables.lock().await;

		let rows = tables.engagements_mut(kind);
		let Some(idx) = rows.iter().position(|row| row.user_id == user_id && row.poem_id == poem_id) else {
			return Ok(false);
		};
		rows.remove(idx);

		if let Some(poem) = tables.poems.get_mut(poem_id) {
			let counter = Tables::counter_mut(poem, kind);
			*counter = (*counter - 1).max(0);
			poem.updated_at = Utc::now();
		}

		Ok(true)
	}

	async fn engagement_exists(&self, kind: EngagementKind, user_id: &str, poem_id: &str) -> Result<bool> {
		Ok(self
			.tables
			.lock()
			.await
			.engagements(kind)
			.iter()
			.any(|row| row.user_id == user_id && row.poem_id == poem_id))
	}

	async fn list_engagements(
		&self,
		kind: EngagementKind,
		filter: EngagementFilter<'_>,
		page: Page,
	) -> Result<Vec<Engagement>> {
		let tables = self.tables.lock().await;

		let mut rows = tables
			.engagements(kind)
			.iter()
			.filter(|row| filter.matches(row))
			.cloned()
			.collect::<Vec<_>>();
		rows.sort_by_key(|row| {
			let tiebreak = match filter {
				EngagementFilter::Poem(_) => row.user_id.clone(),
				EngagementFilter::User(_) => row.poem_id.clone(),
			};
			Reverse((row.created_at, tiebreak))
		});

		Ok(window(rows, page))
	}

	async fn count_engagements(&self, kind: EngagementKind, filter: EngagementFilter<'_>) -> Result<i64> {
		Ok(self
			.tables
			.lock()
			.await
			.engagements(kind)
			.iter()
			.filter(|row| filter.matches(row))
			.count() as i64)
	}
}
