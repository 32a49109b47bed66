use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow, serde::Serialize)]
pub struct Comment {
	/// The unique identifier for the comment.
	pub id: Ulid,
	/// The post the comment belongs to. Comments are deleted with their post.
	pub post_id: Ulid,
	/// The author of the comment. Comments are deleted with their author.
	pub author_id: Ulid,
	/// The body text of the comment.
	pub text: String,
	/// The time the comment was created. Set once at creation.
	pub created: DateTime<Utc>,
}

impl Comment {
	pub fn new(post_id: Ulid, author_id: Ulid, text: String) -> Self {
		Self {
			id: Ulid::new(),
			post_id,
			author_id,
			text,
			created: Utc::now(),
		}
	}
}
