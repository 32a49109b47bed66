use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type ErrorHandlerFut<O> = Pin<Box<dyn Future<Output = hyper::Response<O>> + Send + 'static>>;

pub type ErrorHandler<O, E> = Arc<dyn Fn(hyper::Request<()>, E) -> ErrorHandlerFut<O> + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub struct RouteParams(pub Box<[(String, String)]>);

#[derive(Debug)]
pub(crate) struct RouteInfo {
	pub route: usize,
	pub middleware: Vec<usize>,
	pub error_handler: Option<usize>,
}
