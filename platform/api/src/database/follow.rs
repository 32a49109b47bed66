use chrono::{DateTime, Utc};

use super::Ulid;

/// A directed follow edge: `user_id` receives `author_id`'s posts in their
/// feed. The `(user_id, author_id)` pair is unique at the storage layer,
/// which is what closes the concurrent duplicate-follow race.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Follow {
	/// The user following.
	pub user_id: Ulid,
	/// The author being followed.
	pub author_id: Ulid,
	/// The time the edge was created.
	pub created_at: DateTime<Utc>,
}
