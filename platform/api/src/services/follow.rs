use std::sync::Arc;

use crate::database::Ulid;
use crate::store::{DataStore, StoreError};

/// Mutations and lookups on the follow graph.
///
/// Self-follows and duplicate follows are silently ignored rather than
/// rejected, so the endpoints stay idempotent under double-submits.
#[derive(Clone)]
pub struct FollowManager {
	store: Arc<dyn DataStore>,
}

impl FollowManager {
	pub fn new(store: Arc<dyn DataStore>) -> Self {
		Self { store }
	}

	/// Makes `user_id` follow `author_id`. Returns whether a new edge was
	/// created. Self-follows never create an edge.
	pub async fn follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		if user_id == author_id {
			return Ok(false);
		}

		self.store.insert_follow(user_id, author_id).await
	}

	/// Removes the edge if present. Unfollowing someone you do not follow
	/// is a no-op.
	pub async fn unfollow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		self.store.delete_follow(user_id, author_id).await
	}

	pub async fn is_following(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		self.store.follow_exists(user_id, author_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::database::User;
	use crate::store::MemoryStore;

	async fn seeded_users(store: &Arc<dyn DataStore>) -> (Ulid, Ulid) {
		let a = User::new("mario".into(), "password123");
		let b = User::new("supermario".into(), "password123");
		store.create_user(&a).await.unwrap();
		store.create_user(&b).await.unwrap();
		(a.id, b.id)
	}

	#[tokio::test]
	async fn test_follow_is_idempotent() {
		let store: Arc<dyn DataStore> = Arc::new(MemoryStore::default());
		let (mario, luigi) = seeded_users(&store).await;
		let follows = FollowManager::new(store);

		assert!(follows.follow(mario, luigi).await.unwrap());
		assert!(!follows.follow(mario, luigi).await.unwrap());
		assert!(follows.is_following(mario, luigi).await.unwrap());
		// Follows are directed.
		assert!(!follows.is_following(luigi, mario).await.unwrap());
	}

	#[tokio::test]
	async fn test_self_follow_is_a_no_op() {
		let store: Arc<dyn DataStore> = Arc::new(MemoryStore::default());
		let (mario, _) = seeded_users(&store).await;
		let follows = FollowManager::new(store);

		assert!(!follows.follow(mario, mario).await.unwrap());
		assert!(!follows.is_following(mario, mario).await.unwrap());
	}

	#[tokio::test]
	async fn test_unfollow() {
		let store: Arc<dyn DataStore> = Arc::new(MemoryStore::default());
		let (mario, luigi) = seeded_users(&store).await;
		let follows = FollowManager::new(store);

		follows.follow(mario, luigi).await.unwrap();
		assert!(follows.unfollow(mario, luigi).await.unwrap());
		assert!(!follows.unfollow(mario, luigi).await.unwrap());
		assert!(!follows.is_following(mario, luigi).await.unwrap());
	}
}
