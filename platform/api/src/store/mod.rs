use async_trait::async_trait;

use crate::database::{Comment, Group, Post, Session, Ulid, User};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("{0} is already taken")]
	Conflict(&'static str),
}

/// Which posts a listing query selects. Every variant is ordered newest
/// first (`pub_date` desc, id desc as tie-break).
#[derive(Debug, Clone)]
pub enum PostFilter {
	All,
	Group(Ulid),
	Author(Ulid),
	Authors(Vec<Ulid>),
}

/// Repository over the relational data store. The HTTP layer and the
/// services only ever talk to this trait; [`PgStore`] backs deployments
/// and [`MemoryStore`] backs the test suite with the same cascade and
/// uniqueness semantics.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
	// users
	async fn create_user(&self, user: &User) -> Result<(), StoreError>;
	async fn user_by_id(&self, id: Ulid) -> Result<Option<User>, StoreError>;
	async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
	/// Deletes the user and cascades: their posts (and those posts'
	/// comments), their comments, their sessions and both directions of
	/// their follow edges.
	async fn delete_user(&self, id: Ulid) -> Result<bool, StoreError>;

	// sessions
	async fn create_session(&self, session: &Session) -> Result<(), StoreError>;
	async fn session_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;

	// groups
	async fn create_group(&self, group: &Group) -> Result<(), StoreError>;
	async fn group_by_id(&self, id: Ulid) -> Result<Option<Group>, StoreError>;
	async fn group_by_slug(&self, slug: &str) -> Result<Option<Group>, StoreError>;
	/// Deletes the group. Referencing posts survive with a null group.
	async fn delete_group(&self, id: Ulid) -> Result<bool, StoreError>;

	// posts
	async fn create_post(&self, post: &Post) -> Result<(), StoreError>;
	async fn post_by_id(&self, id: Ulid) -> Result<Option<Post>, StoreError>;
	/// Updates the mutable fields of a post. `pub_date` and `author_id`
	/// are immutable.
	async fn update_post(&self, id: Ulid, text: &str, group_id: Option<Ulid>, image: Option<&str>) -> Result<bool, StoreError>;
	async fn delete_post(&self, id: Ulid) -> Result<bool, StoreError>;
	async fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError>;
	async fn list_posts(&self, filter: &PostFilter, limit: u64, offset: u64) -> Result<Vec<Post>, StoreError>;

	// comments
	async fn create_comment(&self, comment: &Comment) -> Result<(), StoreError>;
	/// Comments of a post, newest first.
	async fn comments_for_post(&self, post_id: Ulid) -> Result<Vec<Comment>, StoreError>;

	// follows
	/// Inserts the edge unless it already exists. Returns whether a row
	/// was created. The unique index absorbs concurrent duplicates.
	async fn insert_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError>;
	async fn delete_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError>;
	async fn follow_exists(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError>;
	async fn followed_author_ids(&self, user_id: Ulid) -> Result<Vec<Ulid>, StoreError>;
}
