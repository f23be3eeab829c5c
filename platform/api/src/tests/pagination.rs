use crate::pagination::{Page, PageError, Paginated, DEFAULT_LIMIT, MAX_LIMIT};

#[test]
fn test_page_defaults() {
	let page = Page::from_query(None).unwrap();
	assert_eq!(page.page(), 1);
	assert_eq!(page.limit(), DEFAULT_LIMIT);
	assert_eq!(page.offset(), 0);

	assert_eq!(Page::from_query(Some("other=1")).unwrap(), Page::default());
}

#[test]
fn test_page_from_query() {
	let page = Page::from_query(Some("page=3&limit=20")).unwrap();
	assert_eq!(page.page(), 3);
	assert_eq!(page.limit(), 20);
	assert_eq!(page.offset(), 40);
}

#[test]
fn test_page_clamping() {
	let page = Page::from_query(Some("page=0&limit=1000")).unwrap();
	assert_eq!(page.page(), 1);
	assert_eq!(page.limit(), MAX_LIMIT);

	let page = Page::from_query(Some("page=-4&limit=0")).unwrap();
	assert_eq!(page.page(), 1);
	assert_eq!(page.limit(), 1);
}

#[test]
fn test_page_invalid() {
	assert!(matches!(Page::from_query(Some("page=two")), Err(PageError::InvalidPage(_))));
	assert!(matches!(Page::from_query(Some("limit=1.5")), Err(PageError::InvalidLimit(_))));
}

#[test]
fn test_paginated_flags() {
	let rows = Paginated::new(vec![1; 10], 25, Page::new(1, 10));
	assert_eq!(rows.total_pages(), 3);
	assert!(rows.has_next());
	assert!(!rows.has_previous());

	let rows = Paginated::new(vec![1; 5], 25, Page::new(3, 10));
	assert!(!rows.has_next());
	assert!(rows.has_previous());

	// exact multiple of the limit
	let rows = Paginated::new(vec![1; 10], 20, Page::new(2, 10));
	assert_eq!(rows.total_pages(), 2);
	assert!(!rows.has_next());

	let rows = Paginated::<i32>::new(vec![], 0, Page::default());
	assert_eq!(rows.total_pages(), 0);
	assert!(!rows.has_next());
}

#[test]
fn test_paginated_json() {
	let body = Paginated::new(vec!["a", "b"], 3, Page::new(1, 2)).into_json("bookmarks").unwrap();

	assert_eq!(
		body,
		serde_json::json!({
			"bookmarks": ["a", "b"],
			"total": 3,
			"page": 1,
			"limit": 2,
			"totalPages": 2,
			"hasNext": true,
			"hasPrevious": false,
		})
	);
}
