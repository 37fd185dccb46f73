use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i32),
	#[error("not allowed to change post {0}")]
	NotAuthor(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/posts",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route("/posts/popular", get_with(get_popular_posts, get_popular_posts_docs))
		.api_route(
			"/posts/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route("/users/:id/posts", get_with(get_user_posts, get_user_posts_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::FORBIDDEN,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let (code, post) = match self {
			Self::UnknownPost(post) => ("unknown_post", post),
			Self::NotAuthor(post) => ("not_author", post),
		};

		error::Message::new(code)
			.content(self.to_string())
			.detail("post", post)
			.into_vec()
	}
}
