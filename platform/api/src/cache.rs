//! TTL snapshot cache for the home listing.
//!
//! The cache holds exactly one rendered response and serves it verbatim
//! until the TTL lapses. Writes do not invalidate it, so a freshly
//! published post may be absent from the listing for up to one TTL. That
//! staleness window is accepted behavior, not a bug.

use std::time::{Duration, Instant};

use bytes::Bytes;
use hyper::StatusCode;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct CachedPage {
	pub status: StatusCode,
	pub body: Bytes,
	stored_at: Instant,
}

pub struct ListingCache {
	ttl: Duration,
	slot: RwLock<Option<CachedPage>>,
}

impl ListingCache {
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			slot: RwLock::new(None),
		}
	}

	/// Returns the snapshot if one is stored and still within its TTL.
	/// Expired entries are left in place, the next `set` overwrites them.
	pub async fn get(&self) -> Option<CachedPage> {
		let slot = self.slot.read().await;
		slot.as_ref()
			.filter(|page| page.stored_at.elapsed() < self.ttl)
			.cloned()
	}

	pub async fn set(&self, status: StatusCode, body: Bytes) {
		let mut slot = self.slot.write().await;
		*slot = Some(CachedPage {
			status,
			body,
			stored_at: Instant::now(),
		});
	}

	/// Drops the snapshot immediately. Operator escape hatch, nothing in
	/// the request path calls this.
	pub async fn clear(&self) {
		let mut slot = self.slot.write().await;
		*slot = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_serves_snapshot_within_ttl() {
		let cache = ListingCache::new(Duration::from_secs(60));
		assert!(cache.get().await.is_none());

		cache.set(StatusCode::OK, Bytes::from_static(b"v1")).await;

		let page = cache.get().await.unwrap();
		assert_eq!(page.status, StatusCode::OK);
		assert_eq!(page.body, Bytes::from_static(b"v1"));

		// A second set replaces the snapshot.
		cache.set(StatusCode::OK, Bytes::from_static(b"v2")).await;
		assert_eq!(cache.get().await.unwrap().body, Bytes::from_static(b"v2"));
	}

	#[tokio::test]
	async fn test_expires_after_ttl() {
		let cache = ListingCache::new(Duration::from_millis(20));
		cache.set(StatusCode::OK, Bytes::from_static(b"v1")).await;
		assert!(cache.get().await.is_some());

		tokio::time::sleep(Duration::from_millis(40)).await;
		assert!(cache.get().await.is_none());
	}

	#[tokio::test]
	async fn test_clear_drops_snapshot() {
		let cache = ListingCache::new(Duration::from_secs(60));
		cache.set(StatusCode::OK, Bytes::from_static(b"v1")).await;
		cache.clear().await;
		assert!(cache.get().await.is_none());
	}
}
