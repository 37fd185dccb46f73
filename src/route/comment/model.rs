use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::age;

/// A single comment, as stored.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Comment {
	pub id: i32,
	pub body: String,
	/// The top-level comment this is a reply to.
	pub parent: Option<i32>,
	pub post_id: i32,
	pub author_id: i32,
	pub author_username: String,
	pub created_at: DateTime<Utc>,
}

/// A comment along with how long ago it was written.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CommentView {
	#[serde(flatten)]
	pub comment: Comment,
	/// For example `3 hours ago`.
	pub age: String,
}

impl CommentView {
	pub fn new(comment: Comment, now: DateTime<Utc>) -> Self {
		Self {
			age: age::format(comment.created_at, now),
			comment,
		}
	}
}

/// A top-level comment and its direct replies.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CommentThread {
	#[serde(flatten)]
	pub comment: CommentView,
	pub replies: Vec<CommentView>,
}

/// Groups the comments of one post into threads.
///
/// Only top-level comments start a thread, and only comments whose parent is
/// that top-level comment are listed as its replies. Replies to replies are
/// dropped. Both levels keep the order of `comments`.
pub fn threads(comments: Vec<Comment>, now: DateTime<Utc>) -> Vec<CommentThread> {
	let (top, replies): (Vec<_>, Vec<_>) = comments
		.into_iter()
		.partition(|comment| comment.parent.is_none());

	top.into_iter()
		.map(|comment| {
			let replies = replies
				.iter()
				.filter(|reply| reply.parent == Some(comment.id) && reply.post_id == comment.post_id)
				.cloned()
				.map(|reply| CommentView::new(reply, now))
				.collect();

			CommentThread {
				comment: CommentView::new(comment, now),
				replies,
			}
		})
		.collect()
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreateCommentInput {
	#[validate(length(min = 1))]
	pub body: String,
	/// The id of a top-level comment on the same post to reply to.
	pub parent: Option<i32>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdateCommentInput {
	#[validate(length(min = 1))]
	pub body: String,
}
