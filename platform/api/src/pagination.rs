use serde_json::{Map, Value};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(thiserror::Error, Debug)]
pub enum PageError {
	#[error("page must be a number: {0}")]
	InvalidPage(String),
	#[error("limit must be a number: {0}")]
	InvalidLimit(String),
}

/// Offset pagination window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	page: i64,
	limit: i64,
}

impl Default for Page {
	fn default() -> Self {
		Self {
			page: DEFAULT_PAGE,
			limit: DEFAULT_LIMIT,
		}
	}
}

impl Page {
	/// Pages below 1 become 1, limits are clamped to `1..=MAX_LIMIT`.
	pub fn new(page: i64, limit: i64) -> Self {
		Self {
			page: page.max(1),
			limit: limit.clamp(1, MAX_LIMIT),
		}
	}

	/// Reads `page` and `limit` from a url query string. Missing keys take
	/// their defaults, values that are not integers are rejected.
	pub fn from_query(query: Option<&str>) -> Result<Self, PageError> {
		let mut page = DEFAULT_PAGE;
		let mut limit = DEFAULT_LIMIT;

		for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
			match key.as_ref() {
				"page" => page = value.trim().parse().map_err(|_| PageError::InvalidPage(value.to_string()))?,
				"limit" => limit = value.trim().parse().map_err(|_| PageError::InvalidLimit(value.to_string()))?,
				_ => {}
			}
		}

		Ok(Self::new(page, limit))
	}

	pub fn page(&self) -> i64 {
		self.page
	}

	pub fn limit(&self) -> i64 {
		self.limit
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1).saturating_mul(self.limit)
	}
}

/// One page of rows together with the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
	pub items: Vec<T>,
	pub total: i64,
	pub page: Page,
}

impl<T> Paginated<T> {
	pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
		Self { items, total, page }
	}

	pub fn total_pages(&self) -> i64 {
		(self.total + self.page.limit - 1) / self.page.limit
	}

	pub fn has_next(&self) -> bool {
		self.page.page.saturating_mul(self.page.limit) < self.total
	}

	pub fn has_previous(&self) -> bool {
		self.page.page > 1
	}
}

impl<T: serde::Serialize> Paginated<T> {
	/// Renders the page as a JSON object with the rows stored under `key`.
	pub fn into_json(self, key: &str) -> Result<Value, serde_json::Error> {
		let mut body = Map::new();

		body.insert("total".into(), self.total.into());
		body.insert("page".into(), self.page.page.into());
		body.insert("limit".into(), self.page.limit.into());
		body.insert("totalPages".into(), self.total_pages().into());
		body.insert("hasNext".into(), self.has_next().into());
		body.insert("hasPrevious".into(), self.has_previous().into());
		body.insert(key.to_owned(), serde_json::to_value(self.items)?);

		Ok(Value::Object(body))
	}
}
