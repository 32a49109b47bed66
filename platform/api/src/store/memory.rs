use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{DataStore, PostFilter, StoreError};
use crate::database::{Comment, Follow, Group, Post, Session, Ulid, User};

/// In-process store mirroring the relational semantics of [`super::PgStore`]:
/// pair-unique follow edges, cascade deletes and group detachment all behave
/// the same. Backs the test suite so the full HTTP stack runs without a
/// database.
#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
	users: HashMap<Ulid, User>,
	sessions: HashMap<Ulid, Session>,
	groups: HashMap<Ulid, Group>,
	posts: HashMap<Ulid, Post>,
	comments: HashMap<Ulid, Comment>,
	// keyed by the unique (user, author) pair
	follows: HashMap<(Ulid, Ulid), Follow>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Tables {
	fn matching_posts(&self, filter: &PostFilter) -> Vec<Post> {
		let mut posts: Vec<Post> = self
			.posts
			.values()
			.filter(|post| match filter {
				PostFilter::All => true,
				PostFilter::Group(id) => post.group_id == Some(*id),
				PostFilter::Author(id) => post.author_id == *id,
				PostFilter::Authors(ids) => ids.contains(&post.author_id),
			})
			.cloned()
			.collect();

		posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
		posts
	}

	fn delete_post_row(&mut self, id: Ulid) -> bool {
		if self.posts.remove(&id).is_none() {
			return false;
		}
		self.comments.retain(|_, comment| comment.post_id != id);
		true
	}
}

#[async_trait]
impl DataStore for MemoryStore {
	async fn create_user(&self, user: &User) -> Result<(), StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.users.values().any(|u| u.username == user.username) {
			return Err(StoreError::Conflict("username"));
		}
		tables.users.insert(user.id, user.clone());
		Ok(())
	}

	async fn user_by_id(&self, id: Ulid) -> Result<Option<User>, StoreError> {
		Ok(self.inner.lock().unwrap().users.get(&id).cloned())
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
		Ok(self
			.inner
			.lock()
			.unwrap()
			.users
			.values()
			.find(|u| u.username == username)
			.cloned())
	}

	async fn delete_user(&self, id: Ulid) -> Result<bool, StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.users.remove(&id).is_none() {
			return Ok(false);
		}

		let post_ids: Vec<Ulid> = tables
			.posts
			.values()
			.filter(|post| post.author_id == id)
			.map(|post| post.id)
			.collect();
		for post_id in post_ids {
			tables.delete_post_row(post_id);
		}

		tables.comments.retain(|_, comment| comment.author_id != id);
		tables.sessions.retain(|_, session| session.user_id != id);
		tables.follows.retain(|(user, author), _| *user != id && *author != id);

		Ok(true)
	}

	async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.sessions.values().any(|s| s.token == session.token) {
			return Err(StoreError::Conflict("token"));
		}
		tables.sessions.insert(session.id, session.clone());
		Ok(())
	}

	async fn session_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
		Ok(self
			.inner
			.lock()
			.unwrap()
			.sessions
			.values()
			.find(|s| s.token == token)
			.cloned())
	}

	async fn create_group(&self, group: &Group) -> Result<(), StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.groups.values().any(|g| g.title == group.title || g.slug == group.slug) {
			return Err(StoreError::Conflict("group"));
		}
		tables.groups.insert(group.id, group.clone());
		Ok(())
	}

	async fn group_by_id(&self, id: Ulid) -> Result<Option<Group>, StoreError> {
		Ok(self.inner.lock().unwrap().groups.get(&id).cloned())
	}

	async fn group_by_slug(&self, slug: &str) -> Result<Option<Group>, StoreError> {
		Ok(self
			.inner
			.lock()
			.unwrap()
			.groups
			.values()
			.find(|g| g.slug == slug)
			.cloned())
	}

	async fn delete_group(&self, id: Ulid) -> Result<bool, StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.groups.remove(&id).is_none() {
			return Ok(false);
		}
		// Posts survive the group, detached.
		for post in tables.posts.values_mut() {
			if post.group_id == Some(id) {
				post.group_id = None;
			}
		}
		Ok(true)
	}

	async fn create_post(&self, post: &Post) -> Result<(), StoreError> {
		self.inner.lock().unwrap().posts.insert(post.id, post.clone());
		Ok(())
	}

	async fn post_by_id(&self, id: Ulid) -> Result<Option<Post>, StoreError> {
		Ok(self.inner.lock().unwrap().posts.get(&id).cloned())
	}

	async fn update_post(&self, id: Ulid, text: &str, group_id: Option<Ulid>, image: Option<&str>) -> Result<bool, StoreError> {
		let mut tables = self.inner.lock().unwrap();
		match tables.posts.get_mut(&id) {
			Some(post) => {
				post.text = text.to_string();
				post.group_id = group_id;
				post.image = image.map(str::to_string);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	async fn delete_post(&self, id: Ulid) -> Result<bool, StoreError> {
		Ok(self.inner.lock().unwrap().delete_post_row(id))
	}

	async fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
		Ok(self.inner.lock().unwrap().matching_posts(filter).len() as u64)
	}

	async fn list_posts(&self, filter: &PostFilter, limit: u64, offset: u64) -> Result<Vec<Post>, StoreError> {
		Ok(self
			.inner
			.lock()
			.unwrap()
			.matching_posts(filter)
			.into_iter()
			.skip(offset as usize)
			.take(limit as usize)
			.collect())
	}

	async fn create_comment(&self, comment: &Comment) -> Result<(), StoreError> {
		self.inner.lock().unwrap().comments.insert(comment.id, comment.clone());
		Ok(())
	}

	async fn comments_for_post(&self, post_id: Ulid) -> Result<Vec<Comment>, StoreError> {
		let mut comments: Vec<Comment> = self
			.inner
			.lock()
			.unwrap()
			.comments
			.values()
			.filter(|comment| comment.post_id == post_id)
			.cloned()
			.collect();
		comments.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
		Ok(comments)
	}

	async fn insert_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		let mut tables = self.inner.lock().unwrap();
		if tables.follows.contains_key(&(user_id, author_id)) {
			return Ok(false);
		}
		tables.follows.insert(
			(user_id, author_id),
			Follow {
				user_id,
				author_id,
				created_at: Utc::now(),
			},
		);
		Ok(true)
	}

	async fn delete_follow(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		Ok(self.inner.lock().unwrap().follows.remove(&(user_id, author_id)).is_some())
	}

	async fn follow_exists(&self, user_id: Ulid, author_id: Ulid) -> Result<bool, StoreError> {
		Ok(self.inner.lock().unwrap().follows.contains_key(&(user_id, author_id)))
	}

	async fn followed_author_ids(&self, user_id: Ulid) -> Result<Vec<Ulid>, StoreError> {
		Ok(self
			.inner
			.lock()
			.unwrap()
			.follows
			.keys()
			.filter(|(user, _)| *user == user_id)
			.map(|(_, author)| *author)
			.collect())
	}
}
