//! Persistence layer.
//!
//! Every write is a single statement. Relationships are plain foreign key
//! columns; author and commenter names are joined in by the read queries.

use uuid::Uuid;

use crate::{
	form::{CommentInput, PostInput},
	model::{Comment, Post, Session, User},
	Database,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unique constraint violated on {0}")]
	ConstraintViolation(&'static str),
	#[error("sqlx error: {0}")]
	Sqlx(#[from] sqlx::Error),
}

/// Maps a unique constraint failure to [`Error::ConstraintViolation`] on `field`.
fn unique(field: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
	move |error| match error {
		sqlx::Error::Database(ref database) if database.is_unique_violation() => {
			Error::ConstraintViolation(field)
		}
		error => Error::Sqlx(error),
	}
}

const SELECT_POST: &str = r#"
	SELECT post.id, post.author_id, post.title, post.subtitle, post.date, post.body, post.img_url,
		"user".name AS author_name
	FROM post
	JOIN "user" ON "user".id = post.author_id
"#;

const SELECT_COMMENT: &str = r#"
	SELECT comment.id, comment.text, "user".name AS author_name, "user".email AS author_email
	FROM comment
	JOIN "user" ON "user".id = comment.author_id
"#;

pub async fn create_user(
	database: &Database,
	name: &str,
	email: &str,
	password_hash: &str,
) -> Result<User, Error> {
	sqlx::query_as::<_, User>(
		r#"INSERT INTO "user" (name, email, password) VALUES ($1, $2, $3) RETURNING *"#,
	)
	.bind(name)
	.bind(email)
	.bind(password_hash)
	.fetch_one(database)
	.await
	.map_err(unique("email"))
}

pub async fn find_user_by_email(database: &Database, email: &str) -> Result<Option<User>, Error> {
	Ok(
		sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
			.bind(email)
			.fetch_optional(database)
			.await?,
	)
}

pub async fn find_user_by_id(database: &Database, id: i64) -> Result<Option<User>, Error> {
	Ok(
		sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
			.bind(id)
			.fetch_optional(database)
			.await?,
	)
}

/// Creates a post owned by `author_id`. Fails with a constraint violation
/// on `title` if another post already uses it.
pub async fn create_post(
	database: &Database,
	author_id: i64,
	date: &str,
	input: &PostInput,
) -> Result<Post, Error> {
	let id = sqlx::query_scalar::<_, i64>(
		r#"
			INSERT INTO post (author_id, title, subtitle, date, body, img_url)
			VALUES ($1, $2, $3, $4, $5, $6)
			RETURNING id
		"#,
	)
	.bind(author_id)
	.bind(&input.title)
	.bind(&input.subtitle)
	.bind(date)
	.bind(&input.body)
	.bind(&input.img_url)
	.fetch_one(database)
	.await
	.map_err(unique("title"))?;

	find_post_by_id(database, id)
		.await?
		.ok_or(Error::Sqlx(sqlx::Error::RowNotFound))
}

pub async fn list_all_posts(database: &Database) -> Result<Vec<Post>, Error> {
	Ok(
		sqlx::query_as::<_, Post>(&format!("{SELECT_POST} ORDER BY post.id"))
			.fetch_all(database)
			.await?,
	)
}

pub async fn list_posts_by_author(database: &Database, author_id: i64) -> Result<Vec<Post>, Error> {
	Ok(
		sqlx::query_as::<_, Post>(&format!(
			"{SELECT_POST} WHERE post.author_id = $1 ORDER BY post.id"
		))
		.bind(author_id)
		.fetch_all(database)
		.await?,
	)
}

pub async fn find_post_by_id(database: &Database, id: i64) -> Result<Option<Post>, Error> {
	Ok(
		sqlx::query_as::<_, Post>(&format!("{SELECT_POST} WHERE post.id = $1"))
			.bind(id)
			.fetch_optional(database)
			.await?,
	)
}

/// Overwrites the editable fields and the author of a post. The date is
/// left as it was. Returns `false` if no post has the id.
pub async fn update_post(
	database: &Database,
	id: i64,
	author_id: i64,
	input: &PostInput,
) -> Result<bool, Error> {
	let result = sqlx::query(
		r#"
			UPDATE post
			SET title = $1, subtitle = $2, img_url = $3, body = $4, author_id = $5
			WHERE id = $6
		"#,
	)
	.bind(&input.title)
	.bind(&input.subtitle)
	.bind(&input.img_url)
	.bind(&input.body)
	.bind(author_id)
	.bind(id)
	.execute(database)
	.await
	.map_err(unique("title"))?;

	Ok(result.rows_affected() > 0)
}

/// Deletes a post and, through the foreign key cascade, its comments.
/// Returns `false` if no post has the id.
pub async fn delete_post(database: &Database, id: i64) -> Result<bool, Error> {
	let result = sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(id)
		.execute(database)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn create_comment(
	database: &Database,
	post_id: i64,
	author_id: i64,
	input: &CommentInput,
) -> Result<Comment, Error> {
	let id = sqlx::query_scalar::<_, i64>(
		"INSERT INTO comment (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
	)
	.bind(post_id)
	.bind(author_id)
	.bind(&input.text)
	.fetch_one(database)
	.await?;

	Ok(
		sqlx::query_as::<_, Comment>(&format!("{SELECT_COMMENT} WHERE comment.id = $1"))
			.bind(id)
			.fetch_one(database)
			.await?,
	)
}

pub async fn list_comments_for_post(
	database: &Database,
	post_id: i64,
) -> Result<Vec<Comment>, Error> {
	Ok(
		sqlx::query_as::<_, Comment>(&format!(
			"{SELECT_COMMENT} WHERE comment.post_id = $1 ORDER BY comment.id"
		))
		.bind(post_id)
		.fetch_all(database)
		.await?,
	)
}

pub async fn create_session(database: &Database, user_id: i64) -> Result<Session, Error> {
	Ok(
		sqlx::query_as::<_, Session>(
			"INSERT INTO session (id, user_id, created_at) VALUES ($1, $2, $3) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(user_id)
		.bind(chrono::Utc::now())
		.fetch_one(database)
		.await?,
	)
}

pub async fn find_session(database: &Database, id: Uuid) -> Result<Option<Session>, Error> {
	Ok(
		sqlx::query_as::<_, Session>("SELECT * FROM session WHERE id = $1")
			.bind(id)
			.fetch_optional(database)
			.await?,
	)
}

pub async fn delete_session(database: &Database, id: Uuid) -> Result<(), Error> {
	sqlx::query("DELETE FROM session WHERE id = $1")
		.bind(id)
		.execute(database)
		.await?;

	Ok(())
}

/// Deletes every session created before `cutoff`, returning how many went.
pub async fn delete_sessions_before(
	database: &Database,
	cutoff: chrono::DateTime<chrono::Utc>,
) -> Result<u64, Error> {
	let result = sqlx::query("DELETE FROM session WHERE created_at < $1")
		.bind(cutoff)
		.execute(database)
		.await?;

	Ok(result.rows_affected())
}
