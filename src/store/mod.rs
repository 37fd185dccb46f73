//! Data access for users, posts, comments and votes.
//!
//! Handlers only talk to the [`Repository`] traits; all SQL lives in [`postgres`].

pub mod postgres;

use async_trait::async_trait;

use crate::route::{
	auth::model::{Level, User},
	comment::model::{Comment, CreateCommentInput},
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

pub type Result<T> = std::result::Result<T, sqlx::Error>;

/// Which posts to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
	All,
	Author(i32),
	Topic(String),
}

/// How listed posts are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
	/// Highest id first.
	Newest,
	/// Highest vote score first, ties broken by highest id.
	Popular,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
	/// Creates a user, or returns `None` if the username is already taken.
	///
	/// An existing user is never modified.
	async fn create_user(&self, username: &str, password: &str, level: Level) -> Result<Option<User>>;

	async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
	async fn list_posts(&self, filter: PostFilter, order: PostOrder) -> Result<Vec<Post>>;

	async fn post(&self, id: i32) -> Result<Option<Post>>;

	async fn create_post(&self, author_id: i32, input: CreatePostInput) -> Result<Post>;

	/// Applies the fields present in `input`, returning `None` if the post does not exist.
	async fn update_post(&self, id: i32, input: UpdatePostInput) -> Result<Option<Post>>;

	/// Deletes the post along with its comments and votes.
	///
	/// Returns `false` if the post did not exist.
	async fn delete_post(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
	/// Every comment on the post, replies included, in id order.
	async fn comments_for_post(&self, post_id: i32) -> Result<Vec<Comment>>;

	async fn comment(&self, id: i32) -> Result<Option<Comment>>;

	async fn create_comment(
		&self,
		post_id: i32,
		author_id: i32,
		input: CreateCommentInput,
	) -> Result<Comment>;

	async fn update_comment(&self, id: i32, body: &str) -> Result<Option<Comment>>;

	/// Deletes the comment and its replies.
	///
	/// Returns `false` if the comment did not exist.
	async fn delete_comment(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait VoteRepository: Send + Sync {
	/// Records the user's vote on a post, replacing any previous vote atomically.
	async fn upsert_vote(&self, user_id: i32, post_id: i32, value: i32) -> Result<()>;

	/// Removes the user's vote on a post, returning `false` if there was none.
	async fn retract_vote(&self, user_id: i32, post_id: i32) -> Result<bool>;
}

/// Everything the handlers need from the store.
pub trait Repository: UserRepository + PostRepository + CommentRepository + VoteRepository {}

impl<T> Repository for T where T: UserRepository + PostRepository + CommentRepository + VoteRepository {}
