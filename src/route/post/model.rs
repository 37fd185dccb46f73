use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single post, created by a user.
///
/// The vote score is the sum of every vote currently recorded for the post,
/// computed when the post is read.
#[model]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The title of the post.
	#[validate(length(min = 1, max = 200))]
	pub title: String,
	/// The content of the post.
	#[validate(length(min = 1))]
	pub body: String,
	/// An optional topic used to group posts.
	pub topic: Option<String>,
	/// The sum of all votes on the post.
	#[serde(skip_deserializing)]
	pub vote_score: i64,
	/// The user that created the post.
	#[serde(skip_deserializing)]
	pub author_id: i32,
	/// The author's username, or `Anonymous` if the account no longer exists.
	#[serde(skip_deserializing)]
	pub author_username: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct PostQuery {
	/// Only return posts with this topic.
	#[validate(length(min = 1))]
	pub topic: Option<String>,
}
