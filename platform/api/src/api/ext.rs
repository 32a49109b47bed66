use std::sync::{Arc, Weak};

use common::http::ext::OptionExt;
use hyper::StatusCode;

use super::error::Result;
use crate::global::ApiGlobal;

pub trait RequestExt {
	fn get_global<G: ApiGlobal>(&self) -> Result<Arc<G>>;
}

impl<B> RequestExt for hyper::Request<B> {
	fn get_global<G: ApiGlobal>(&self) -> Result<Arc<G>> {
		self.extensions()
			.get::<Weak<G>>()
			.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "global state missing"))?
			.upgrade()
			.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to upgrade global state"))
	}
}
