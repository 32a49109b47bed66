use std::sync::Arc;

use crate::cache::ListingCache;
use crate::config::AppConfig;
use crate::store::DataStore;

/// Shared state every handler can reach. The HTTP layer is generic over
/// this trait so the test suite can stand up a server against an
/// in-memory store.
pub trait ApiGlobal: Send + Sync + 'static {
	fn config(&self) -> &AppConfig;
	fn ctx(&self) -> &common::context::Context;
	fn store(&self) -> &Arc<dyn DataStore>;
	fn listing_cache(&self) -> &ListingCache;
}

pub struct ServerGlobal {
	pub config: AppConfig,
	pub ctx: common::context::Context,
	pub store: Arc<dyn DataStore>,
	pub listing_cache: ListingCache,
}

impl ServerGlobal {
	pub fn new(config: AppConfig, ctx: common::context::Context, store: Arc<dyn DataStore>) -> Self {
		let listing_cache = ListingCache::new(std::time::Duration::from_secs(config.api.listing_cache_ttl_secs));

		Self {
			config,
			ctx,
			store,
			listing_cache,
		}
	}
}

impl ApiGlobal for ServerGlobal {
	fn config(&self) -> &AppConfig {
		&self.config
	}

	fn ctx(&self) -> &common::context::Context {
		&self.ctx
	}

	fn store(&self) -> &Arc<dyn DataStore> {
		&self.store
	}

	fn listing_cache(&self) -> &ListingCache {
		&self.listing_cache
	}
}
