use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

use super::{
	CommentRepository, PostFilter, PostOrder, PostRepository, Result, UserRepository,
	VoteRepository,
};
use crate::route::{
	auth::model::{Level, User},
	comment::model::{Comment, CreateCommentInput},
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

/// Selects posts with their author's name and vote score.
///
/// Must be followed by an optional `WHERE` clause and [`POST_GROUP`].
const POST_SELECT: &str = r#"
	SELECT
		post.id,
		post.title,
		post.body,
		post.topic,
		post.user_id AS author_id,
		post.created_at,
		COALESCE("user".username, 'Anonymous') AS author_username,
		COALESCE(SUM(vote.value), 0)::BIGINT AS vote_score
	FROM post
	LEFT JOIN "user" ON "user".id = post.user_id
	LEFT JOIN vote ON vote.post_id = post.id
"#;

const POST_GROUP: &str = r#"GROUP BY post.id, "user".username"#;

const COMMENT_SELECT: &str = r#"
	SELECT
		comment.id,
		comment.body,
		comment.parent_id AS parent,
		comment.post_id,
		comment.user_id AS author_id,
		comment.created_at,
		COALESCE("user".username, 'Anonymous') AS author_username
	FROM comment
	LEFT JOIN "user" ON "user".id = comment.user_id
"#;

/// The [`Repository`](super::Repository) backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

impl<'r> FromRow<'r, PgRow> for Post {
	fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
		Ok(Self {
			id: row.try_get("id")?,
			title: row.try_get("title")?,
			body: row.try_get("body")?,
			topic: row.try_get("topic")?,
			vote_score: row.try_get("vote_score")?,
			author_id: row.try_get("author_id")?,
			author_username: row.try_get("author_username")?,
			created_at: row.try_get("created_at")?,
		})
	}
}

impl PostOrder {
	fn sql(self) -> &'static str {
		match self {
			Self::Newest => "ORDER BY post.id DESC",
			Self::Popular => "ORDER BY vote_score DESC, post.id DESC",
		}
	}
}

#[async_trait]
impl UserRepository for PgStore {
	async fn create_user(&self, username: &str, password: &str, level: Level) -> Result<Option<User>> {
		sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (username, password, level) VALUES ($1, $2, $3)
				ON CONFLICT (username) DO NOTHING
				RETURNING *
			"#,
		)
		.bind(username)
		.bind(password)
		.bind(i16::from(level))
		.fetch_optional(&self.pool)
		.await
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE username = $1"#)
			.bind(username)
			.fetch_optional(&self.pool)
			.await
	}
}

#[async_trait]
impl PostRepository for PgStore {
	async fn list_posts(&self, filter: PostFilter, order: PostOrder) -> Result<Vec<Post>> {
		let (author, topic) = match filter {
			PostFilter::All => (None, None),
			PostFilter::Author(author) => (Some(author), None),
			PostFilter::Topic(topic) => (None, Some(topic)),
		};

		let query = format!(
			"{POST_SELECT}
			WHERE ($1::INTEGER IS NULL OR post.user_id = $1)
				AND ($2::TEXT IS NULL OR post.topic = $2)
			{POST_GROUP}
			{}",
			order.sql()
		);

		sqlx::query_as::<_, Post>(&query)
			.bind(author)
			.bind(topic)
			.fetch_all(&self.pool)
			.await
	}

	async fn post(&self, id: i32) -> Result<Option<Post>> {
		sqlx::query_as::<_, Post>(&format!("{POST_SELECT} WHERE post.id = $1 {POST_GROUP}"))
			.bind(id)
			.fetch_optional(&self.pool)
			.await
	}

	async fn create_post(&self, author_id: i32, input: CreatePostInput) -> Result<Post> {
		let id = sqlx::query_scalar::<_, i32>(
			r#"
				INSERT INTO post (title, body, topic, user_id)
				VALUES ($1, $2, $3, $4)
				RETURNING id
			"#,
		)
		.bind(input.title)
		.bind(input.body)
		.bind(input.topic)
		.bind(author_id)
		.fetch_one(&self.pool)
		.await?;

		self.post(id).await?.ok_or(sqlx::Error::RowNotFound)
	}

	async fn update_post(&self, id: i32, input: UpdatePostInput) -> Result<Option<Post>> {
		let updated = sqlx::query_scalar::<_, i32>(
			r#"
				UPDATE post
				SET
					title = COALESCE($1, title),
					body = COALESCE($2, body),
					topic = CASE WHEN $3 THEN $4 ELSE topic END
				WHERE id = $5
				RETURNING id
			"#,
		)
		.bind(input.title)
		.bind(input.body)
		.bind(input.topic.is_some())
		.bind(input.topic.flatten())
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		match updated {
			Some(id) => self.post(id).await,
			None => Ok(None),
		}
	}

	async fn delete_post(&self, id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}

#[async_trait]
impl CommentRepository for PgStore {
	async fn comments_for_post(&self, post_id: i32) -> Result<Vec<Comment>> {
		sqlx::query_as::<_, Comment>(&format!(
			"{COMMENT_SELECT} WHERE comment.post_id = $1 ORDER BY comment.id"
		))
		.bind(post_id)
		.fetch_all(&self.pool)
		.await
	}

	async fn comment(&self, id: i32) -> Result<Option<Comment>> {
		sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE comment.id = $1"))
			.bind(id)
			.fetch_optional(&self.pool)
			.await
	}

	async fn create_comment(
		&self,
		post_id: i32,
		author_id: i32,
		input: CreateCommentInput,
	) -> Result<Comment> {
		let id = sqlx::query_scalar::<_, i32>(
			r#"
				INSERT INTO comment (body, parent_id, user_id, post_id)
				VALUES ($1, $2, $3, $4)
				RETURNING id
			"#,
		)
		.bind(input.body)
		.bind(input.parent)
		.bind(author_id)
		.bind(post_id)
		.fetch_one(&self.pool)
		.await?;

		self.comment(id).await?.ok_or(sqlx::Error::RowNotFound)
	}

	async fn update_comment(&self, id: i32, body: &str) -> Result<Option<Comment>> {
		let updated = sqlx::query_scalar::<_, i32>(
			"UPDATE comment SET body = $1 WHERE id = $2 RETURNING id",
		)
		.bind(body)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		match updated {
			Some(id) => self.comment(id).await,
			None => Ok(None),
		}
	}

	async fn delete_comment(&self, id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM comment WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}

#[async_trait]
impl VoteRepository for PgStore {
	async fn upsert_vote(&self, user_id: i32, post_id: i32, value: i32) -> Result<()> {
		sqlx::query(
			r#"
				INSERT INTO vote (user_id, post_id, value) VALUES ($1, $2, $3)
				ON CONFLICT (user_id, post_id) DO UPDATE SET value = EXCLUDED.value
			"#,
		)
		.bind(user_id)
		.bind(post_id)
		.bind(value)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn retract_vote(&self, user_id: i32, post_id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM vote WHERE user_id = $1 AND post_id = $2")
			.bind(user_id)
			.bind(post_id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
