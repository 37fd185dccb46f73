use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// A vote on a post by the authenticated user.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct VoteInput {
	pub post_id: i32,
	/// `1` for an upvote, `-1` for a downvote, `0` to remove the vote.
	#[validate(range(min = -1, max = 1))]
	pub value: i32,
}
