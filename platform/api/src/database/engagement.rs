use std::fmt;

use chrono::{DateTime, Utc};

/// The two kinds of user-to-poem relation. Both share one table layout and
/// differ only in the table and the poem counter they maintain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementKind {
	Like,
	Bookmark,
}

impl EngagementKind {
	pub const fn table(self) -> &'static str {
		match self {
			Self::Like => "likes",
			Self::Bookmark => "bookmarks",
		}
	}

	pub const fn counter_column(self) -> &'static str {
		match self {
			Self::Like => "like_count",
			Self::Bookmark => "bookmark_count",
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Like => "like",
			Self::Bookmark => "bookmark",
		}
	}
}

impl fmt::Display for EngagementKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
	pub user_id: String,
	pub poem_id: String,
	pub created_at: DateTime<Utc>,
}

/// Outcome of inserting an engagement pair.
#[derive(Debug, Clone, PartialEq)]
pub enum AddEngagement {
	Added(Engagement),
	/// The pair was already present. Nothing changed.
	Exists,
	/// The poem does not exist (or was deleted concurrently). Nothing changed.
	PoemMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementFilter<'a> {
	Poem(&'a str),
	User(&'a str),
}

impl EngagementFilter<'_> {
	pub(crate) const fn column(&self) -> &'static str {
		match self {
			Self::Poem(_) => "poem_id",
			Self::User(_) => "user_id",
		}
	}

	/// Column that breaks ties between rows created at the same instant.
	pub(crate) const fn tiebreak_column(&self) -> &'static str {
		match self {
			Self::Poem(_) => "user_id",
			Self::User(_) => "poem_id",
		}
	}

	pub(crate) fn value(&self) -> &str {
		match self {
			Self::Poem(id) | Self::User(id) => *id,
		}
	}

	pub(crate) fn matches(&self, row: &Engagement) -> bool {
		match self {
			Self::Poem(id) => row.poem_id == *id,
			Self::User(id) => row.user_id == *id,
		}
	}
}
