use tokio_util::sync::CancellationToken;

/// A cancellation context handed to long running tasks. Tasks poll
/// [`Context::done`] and wind down when the owning [`Handler`] cancels.
#[derive(Clone)]
pub struct Context {
	token: CancellationToken,
}

impl Context {
	pub fn new() -> (Self, Handler) {
		let token = CancellationToken::new();
		(Self { token: token.clone() }, Handler { token })
	}

	pub async fn done(&self) {
		self.token.cancelled().await;
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

pub struct Handler {
	token: CancellationToken,
}

impl Handler {
	pub async fn cancel(self) {
		self.token.cancel();
	}
}

#[cfg(test)]
mod tests {
	use super::Context;

	#[tokio::test]
	async fn test_context_cancel() {
		let (ctx, handler) = Context::new();
		assert!(!ctx.is_done());

		handler.cancel().await;

		assert!(ctx.is_done());
		ctx.done().await;
	}
}
