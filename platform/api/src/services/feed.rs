use std::sync::Arc;

use crate::database::{Post, Ulid};
use crate::pagination::{Page, PageSpec};
use crate::store::{DataStore, PostFilter, StoreError};

/// Builds the personal feed: the posts of every author the viewer
/// follows, merged newest first.
#[derive(Clone)]
pub struct FeedService {
	store: Arc<dyn DataStore>,
}

impl FeedService {
	pub fn new(store: Arc<dyn DataStore>) -> Self {
		Self { store }
	}

	pub async fn feed_page(&self, viewer_id: Ulid, per_page: u64, requested: u64) -> Result<Page<Post>, StoreError> {
		let authors = self.store.followed_author_ids(viewer_id).await?;
		if authors.is_empty() {
			// No follows means an empty feed, skip the count query.
			return Ok(Page::empty(per_page));
		}

		let filter = PostFilter::Authors(authors);
		let total = self.store.count_posts(&filter).await?;
		let spec = PageSpec::clamped(total, per_page, requested);
		let posts = self.store.list_posts(&filter, spec.limit, spec.offset).await?;

		Ok(Page::new(posts, spec, total))
	}
}
