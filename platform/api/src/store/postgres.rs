use async_trait::async_trait;

use super::{DataStore, PostFilter, StoreError};
use crate::database::{Comment, Group, Post, Session, Ulid, User};

/// Postgres-backed store. The schema lives in `migrations/`; the follow
/// pair uniqueness and all cascade/set-null rules are enforced there, so
/// every method here stays a single round-trip.
pub struct PgStore {
	db: sqlx::PgPool,
}

impl PgStore {
	pub fn new(db: sqlx::PgPool) -> Self {
		Self { db }
	}
}

fn conflict(field: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
	move |err| match &err {
		sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(field),
		_ => StoreError::Database(err),
	}
}

#[async_trait]
impl DataStore for PgStore {
	async fn create_user(&self, user: &User) -> Result<(), StoreError> {
		sqlx::query("INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)")
			.bind(user.id)
			.bind(&user.username)
			.bind(&user.password_hash)
			.bind(user.created_at)
			.execute(&self.db)
			.await
			.map_err(conflict("username"))?;
		Ok(())
	}

	async fn user_by_id(&self, id: Ulid) -> Result<Option<User>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM users WHERE username = $1")
			.bind(username)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn delete_user(&self, id: Ulid) -> Result<bool, StoreError> {
		// Posts, comments, sessions and both follow directions go with the
		// user via the FK cascades in the schema.
		let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.db).await?;
		Ok(result.rows_affected() == 1)
	}

	async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
		sqlx::query("INSERT INTO sessions (id, user_id, token, created_at) VALUES ($1, $2, $3, $4)")
			.bind(session.id)
			.bind(session.user_id)
			.bind(&session.token)
			.bind(session.created_at)
			.execute(&self.db)
			.await
			.map_err(conflict("token"))?;
		Ok(())
	}

	async fn session_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM sessions WHERE token = $1")
			.bind(token)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn create_group(&self, group: &Group) -> Result<(), StoreError> {
		sqlx::query("INSERT INTO \"groups\" (id, title, slug, description) VALUES ($1, $2, $3, $4)")
			.bind(group.id)
			.bind(&group.title)
			.bind(&group.slug)
			.bind(&group.description)
			.execute(&self.db)
			.await
			.map_err(conflict("group"))?;
		Ok(())
	}

	async fn group_by_id(&self, id: Ulid) -> Result<Option<Group>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM \"groups\" WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn group_by_slug(&self, slug: &str) -> Result<Option<Group>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM \"groups\" WHERE slug = $1")
			.bind(slug)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn delete_group(&self, id: Ulid) -> Result<bool, StoreError> {
		// posts.group_id is ON DELETE SET NULL, the posts themselves stay.
		let result = sqlx::query("DELETE FROM \"groups\" WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;
		Ok(result.rows_affected() == 1)
	}

	async fn create_post(&self, post: &Post) -> Result<(), StoreError> {
		sqlx::query("INSERT INTO posts (id, author_id, group_id, text, image, pub_date) VALUES ($1, $2, $3, $4, $5, $6)")
			.bind(post.id)
			.bind(post.author_id)
			.bind(post.group_id)
			.bind(&post.text)
			.bind(&post.image)
			.bind(post.pub_date)
			.execute(&self.db)
			.await?;
		Ok(())
	}

	async fn post_by_id(&self, id: Ulid) -> Result<Option<Post>, StoreError> {
		Ok(sqlx::query_as("SELECT * FROM posts WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn update_post(&self, id: Ulid, text: &str, group_id: Option<Ulid>, image: Option<&str>) -> Result<bool, StoreError> {
		let result = sqlx::query("UPDATE posts SET text = $2, group_id = $3, image = $4 WHERE id = $1")
			.bind(id)
			.bind(text)
			.bind(group_id)
			.bind(image)
			.execute(&self.db)
			.await?;
		Ok(result.rows_affected() == 1)
	}

	async fn delete_post(&self, id: Ulid) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM posts WHERE id = $1").bind(id).execute(&self.db).await?;
		Ok(result.rows_affected() == 1)
	}

	async fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
		let count: i64 = match filter {
			PostFilter::All => {
				sqlx::query_scalar("SELECT COUNT(*) FROM posts").fetch_one(&self.db).await?
			}
			PostFilter::Group(id) => {
				sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
					.bind(id)
					.fetch_one(&self.db)
					.await?
			}
			PostFilter::Author(id) => {
				sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
					.bind(id)
					.fetch_one(&self.db)
					.await?
			}
			PostFilter::Authors(ids) => {
				sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ANY($1)")
					.bind(ids)
					.fetch_one(&self.db)
					.await?
			}
		};

		Ok(count as u64)
	}

	async fn list_posts(&self, filter: &PostFilter, limit: u64, offset: u64) -> Result<Vec<Post>, StoreError> {
		let limit = limit as i64;
		let offset = offset as i64;

		let posts = match filter {
			PostFilter::All => {
				sqlx::query_as("SELECT * FROM posts ORDER BY pub_date DESC, id DESC LIMIT $1 OFFSET $2")
					.bind(limit)
					.bind(offset)
					.fetch_all(&self.db)
					.await?
			}
			PostFilter::Group(id) => {
				sqlx::query_as("SELECT * FROM posts WHERE group_id = $1 ORDER BY pub_date DESC, id DESC LIMIT $2 OFFSET $3")
					.bind(id)
					.bind(limit)
					.bind(offset)
					.fetch_all(&self.db)
					.await?
			}
			PostFilter::Author(id) => {
				sqlx::query_as("SELECT * FROM posts WHERE author_id = $1 ORDER BY pub_date DESC, id DESC LIMIT $2 OFFSET $3")
					.bind(id)
					.bind(limit)
					.bind(offset)
					.fetch_all(&self.db)
					.await?
			}
			PostFilter::Authors(ids) => {
				sqlx::query_as("SELECT * FROM posts WHERE author_id = ANY($1) ORDER BY pub_date DESC, id DESC LIMIT $2 OFFSET $3")
					.bind(ids)
					.bind(limit)
					.bind(offset)
					.fetch_all(&self.db)
					.await?
			}
		};

		Ok(posts)
	}

	async fn create_comment(&self, comment: &Comment) -> Result<(), StoreError> {
		sqlx::query("INSERT INTO comments (id, post_id, author_id, text, created) VALUES ($1, $2, $3, $4, $5)")
			.bind(comment.id)
			.bind(comment.post_id)
			.bind(comment.author_id)
			.bind(&comment.text)
			.bind(comment.created)
			.execute(&self.db)
			.await?;
		Ok(())
	}

	async fn comments_for_post(&self, post_id: Ulid) -> Result<Vec<Comment>, StoreError> {
		Ok(
			sqlx::query_as("SELECT * FROM comments WHERE post_id = $1 ORDER BY created DESC, id DESC")
				.bind(post_id)
				.fetch_all(&self.db)
				.await?,
		)
	}

	async fn insert_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		let result = sqlx::query(
			"INSERT INTO follows (user_id, author_id, created_at) VALUES ($1, $2, NOW()) ON CONFLICT (user_id, author_id) DO NOTHING",
		)
		.bind(user_id)
		.bind(author_id)
		.execute(&self.db)
		.await?;
		Ok(result.rows_affected() == 1)
	}

	async fn delete_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
			.bind(user_id)
			.bind(author_id)
			.execute(&self.db)
			.await?;
		Ok(result.rows_affected() == 1)
	}

	async fn follow_exists(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		Ok(
			sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)")
				.bind(user_id)
				.bind(author_id)
				.fetch_one(&self.db)
				.await?,
		)
	}

	async fn followed_author_ids(&self, user_id: Ulid) -> Result<Vec<Ulid>, StoreError> {
		Ok(sqlx::query_scalar("SELECT author_id FROM follows WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(&self.db)
			.await?)
	}
}
