use std::sync::Arc;

use tokio::sync::RwLock;

use super::auth::AuthData;

/// Per-request state shared between the auth middleware and the
/// handlers through the request extensions.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<Option<AuthData>>>);

impl RequestContext {
	pub async fn set_auth(&self, data: AuthData) {
		let mut guard = self.0.write().await;
		*guard = Some(data);
	}

	pub async fn auth(&self) -> Option<AuthData> {
		self.0.read().await.clone()
	}
}
