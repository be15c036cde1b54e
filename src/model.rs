use md5::{Digest, Md5};
use uuid::Uuid;

/// A registered account, as far as authentication needs it.
///
/// The `password` field holds a PHC-format Argon2 hash, never the plaintext.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub password: String,
}

/// A blog post, joined with the name of its author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
	pub id: i64,
	pub author_id: i64,
	pub title: String,
	pub subtitle: String,
	/// Human-readable creation date, fixed when the post is created.
	pub date: String,
	/// Rich text (HTML) produced by the editor.
	pub body: String,
	pub img_url: String,
	pub author_name: String,
}

/// A reader's reply to a post, joined with the commenter's name and email.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
	pub id: i64,
	pub text: String,
	pub author_name: String,
	pub author_email: String,
}

impl Comment {
	pub fn avatar_url(&self) -> String {
		gravatar_url(&self.author_email)
	}
}

/// Gravatar image for `email`: 100px, rated R at most, retro fallback.
pub fn gravatar_url(email: &str) -> String {
	let hash = Md5::digest(email.trim().to_lowercase().as_bytes());

	format!("https://www.gravatar.com/avatar/{hash:x}?s=100&d=retro&r=r")
}

/// A server-side session row. The id is what the signed cookie carries.
#[derive(Debug, sqlx::FromRow)]
pub struct Session {
	pub id: Uuid,
	pub user_id: i64,
	pub created_at: chrono::DateTime<chrono::Utc>,
}
