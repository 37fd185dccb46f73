use aide::axum::{
	routing::{get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i32),
	#[error("unknown comment {0}")]
	UnknownComment(i32),
	#[error("not allowed to change comment {0}")]
	NotAuthor(i32),
	#[error("comment {0} is not a top-level comment on this post")]
	InvalidParent(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/posts/:id/comments",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/comments/:id",
			put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::FORBIDDEN,
			Self::InvalidParent(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(match self {
			Self::UnknownPost(..) => "unknown_post",
			Self::UnknownComment(..) => "unknown_comment",
			Self::NotAuthor(..) => "not_author",
			Self::InvalidParent(..) => "invalid_parent",
		})
		.content(self.to_string());

		match self {
			Self::UnknownPost(post) => message.detail("post", post),
			Self::UnknownComment(comment) | Self::NotAuthor(comment) => {
				message.detail("comment", comment)
			}
			Self::InvalidParent(parent) => message.field("parent").detail("comment", parent),
		}
		.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn comment(app: &TestServer, post: i32, body: Value) -> Value {
		let response = app
			.post(&format!("/posts/{post}/comments"))
			.json(&body)
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);
		response.json::<Value>()
	}

	#[sqlx::test]
	async fn test_comment_threads(pool: PgPool) {
		let state = state(pool);
		let alice = client(&state);
		let bob = client(&state);

		register(&alice, "alice", "pw1").await;
		register(&bob, "bob", "pw2").await;

		let post = create_post(&alice, "T", "B").await;

		let first = comment(&alice, post, json!({ "body": "first" })).await;

		assert_eq!(first["parent"], Value::Null);
		assert_eq!(first["post_id"], post);
		assert_eq!(first["author_username"], "alice");

		let reply = comment(&bob, post, json!({ "body": "reply", "parent": first["id"] })).await;
		comment(&bob, post, json!({ "body": "second" })).await;

		let threads = alice
			.get(&format!("/posts/{post}/comments"))
			.await
			.json::<Value>();

		assert_eq!(threads.as_array().unwrap().len(), 2);
		assert_eq!(threads[0]["body"], "first");
		assert_eq!(threads[0]["age"], "0 seconds ago");
		assert_eq!(threads[0]["replies"][0]["id"], reply["id"]);
		assert_eq!(threads[0]["replies"][0]["author_username"], "bob");
		assert_eq!(threads[1]["body"], "second");
		assert_eq!(threads[1]["replies"], json!([]));
	}

	#[sqlx::test]
	async fn test_reply_parent_must_be_top_level_on_same_post(pool: PgPool) {
		let state = state(pool);
		let app = client(&state);

		register(&app, "alice", "pw1").await;

		let post = create_post(&app, "T", "B").await;
		let other = create_post(&app, "T", "B").await;

		let top = comment(&app, post, json!({ "body": "top" })).await;
		let reply = comment(&app, post, json!({ "body": "reply", "parent": top["id"] })).await;
		let missing = json!(999);

		for (post, parent) in [(post, &reply["id"]), (other, &top["id"]), (post, &missing)] {
			let response = app
				.post(&format!("/posts/{post}/comments"))
				.json(&json!({ "body": "nested", "parent": parent }))
				.await;

			assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
			assert_eq!(response.json::<Value>()["errors"][0]["code"], "invalid_parent");
		}
	}

	#[sqlx::test]
	async fn test_comments_on_unknown_post(pool: PgPool) {
		let state = state(pool);
		let app = client(&state);

		register(&app, "alice", "pw1").await;

		assert_eq!(
			app.get("/posts/7/comments").await.status_code(),
			StatusCode::NOT_FOUND
		);

		let response = app
			.post("/posts/7/comments")
			.json(&json!({ "body": "hello" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "unknown_post");

		let post = create_post(&app, "T", "B").await;
		let response = app
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "body": "" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
	}

	#[sqlx::test]
	async fn test_update_and_delete_comment(pool: PgPool) {
		let state = state(pool);
		let alice = client(&state);
		let bob = client(&state);

		register(&alice, "alice", "pw1").await;
		register(&bob, "bob", "pw2").await;

		let post = create_post(&alice, "T", "B").await;
		let top = comment(&alice, post, json!({ "body": "top" })).await;
		let id = &top["id"];

		comment(&bob, post, json!({ "body": "reply", "parent": id })).await;

		let response = bob
			.put(&format!("/comments/{id}"))
			.json(&json!({ "body": "edited" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

		let response = alice
			.put(&format!("/comments/{id}"))
			.json(&json!({ "body": "edited" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["message"], "Comment updated");

		let threads = alice
			.get(&format!("/posts/{post}/comments"))
			.await
			.json::<Value>();

		assert_eq!(threads[0]["body"], "edited");

		assert_eq!(
			bob.delete(&format!("/comments/{id}")).await.status_code(),
			StatusCode::FORBIDDEN
		);

		let response = alice.delete(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["message"], "Comment deleted");

		// replies go with their parent
		let threads = alice
			.get(&format!("/posts/{post}/comments"))
			.await
			.json::<Value>();

		assert_eq!(threads, json!([]));

		let response = alice.delete(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "unknown_comment");
	}
}
