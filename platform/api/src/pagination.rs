//! Page slicing for the listing endpoints.
//!
//! Pages are 1-indexed. A requested page past the end CLAMPS TO THE LAST
//! page (and anything below 1 clamps to the first), so stale deep links
//! keep resolving instead of erroring.

use serde::Serialize;

/// The resolved window of one page over a counted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
	pub number: u64,
	pub total_pages: u64,
	pub offset: u64,
	pub limit: u64,
}

impl PageSpec {
	pub fn clamped(total_items: u64, per_page: u64, requested: u64) -> Self {
		let per_page = per_page.max(1);
		// An empty result set still has one (empty) page.
		let total_pages = (total_items.div_ceil(per_page)).max(1);
		let number = requested.clamp(1, total_pages);

		Self {
			number,
			total_pages,
			offset: (number - 1) * per_page,
			limit: per_page,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
	pub number: u64,
	pub per_page: u64,
	pub total_items: u64,
	pub total_pages: u64,
	pub has_next: bool,
	pub has_previous: bool,
	pub items: Vec<T>,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, spec: PageSpec, total_items: u64) -> Self {
		Self {
			number: spec.number,
			per_page: spec.limit,
			total_items,
			total_pages: spec.total_pages,
			has_next: spec.number < spec.total_pages,
			has_previous: spec.number > 1,
			items,
		}
	}

	pub fn empty(per_page: u64) -> Self {
		Self::new(Vec::new(), PageSpec::clamped(0, per_page, 1), 0)
	}
}

/// Reads the 1-indexed `page` query parameter. Missing or malformed
/// values fall back to page 1.
pub fn requested_page(query: Option<&str>) -> u64 {
	let Some(query) = query else { return 1 };

	url::form_urlencoded::parse(query.as_bytes())
		.find(|(key, _)| key == "page")
		.and_then(|(_, value)| value.parse::<u64>().ok())
		.filter(|page| *page >= 1)
		.unwrap_or(1)
}
