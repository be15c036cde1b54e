//! Password hashing, session lifecycle and the administrator guard.

use std::sync::Arc;

use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};
use cookie::{Cookie, Key};
use uuid::Uuid;

use crate::{config::Config, database, extract::CurrentUser, model, session, Database, Error};

/// Hashes a password with Argon2id and a fresh random salt, returning the
/// PHC string that is stored in the `user.password` column.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
) -> Result<String, argon2::password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a stored PHC string. A malformed hash never matches.
pub fn verify_password(hasher: &Argon2, password: &str, hash: &str) -> bool {
	PasswordHash::new(hash)
		.is_ok_and(|parsed| hasher.verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Binds a new session to `user` and returns the signed cookie that carries it.
/// The session it replaces, if any, is dropped.
pub async fn start_session(
	database: &Database,
	key: &Key,
	config: &Config,
	user: &model::User,
	replaces: Option<Uuid>,
) -> Result<Cookie<'static>, database::Error> {
	if let Some(previous) = replaces {
		database::delete_session(database, previous).await?;
	}

	let session = database::create_session(database, user.id).await?;

	tracing::info!(user_id = user.id, "session started");

	Ok(session::create_cookie(key, session.id, config.secure_cookies))
}

/// Drops the session row and returns the cookie that clears it in the browser.
pub async fn end_session(
	database: &Database,
	session_id: Uuid,
) -> Result<Cookie<'static>, database::Error> {
	database::delete_session(database, session_id).await?;

	Ok(session::clear_cookie())
}

/// The administrator, placed in the request extensions by [`require_admin`].
#[derive(Debug, Clone)]
pub struct Admin(pub model::User);

/// Middleware guarding the post management routes.
///
/// Anonymous requests and requests from any account other than the configured
/// administrator are answered with 403 before the wrapped handler runs.
pub async fn require_admin(
	State(config): State<Arc<Config>>,
	user: CurrentUser,
	mut request: Request,
	next: Next,
) -> Result<Response, Error> {
	let CurrentUser::Authenticated { user, .. } = user else {
		return Err(Error::Forbidden);
	};

	if user.id != config.admin_id {
		tracing::warn!(user_id = user.id, path = %request.uri().path(), "non-admin on admin route");
		return Err(Error::Forbidden);
	}

	request.extensions_mut().insert(Admin(user));

	Ok(next.run(request).await)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_hash_and_verify() {
		let hasher = Argon2::default();
		let hash = hash_password(&hasher, "correct horse").unwrap();

		assert!(hash.starts_with("$argon2id$"));
		assert!(verify_password(&hasher, "correct horse", &hash));

		for other in ["", "correct horse ", "Correct horse", "correct", "correct horse battery"] {
			assert!(!verify_password(&hasher, other, &hash));
		}
	}

	#[test]
	fn test_salts_are_random() {
		let hasher = Argon2::default();
		let first = hash_password(&hasher, "same").unwrap();
		let second = hash_password(&hasher, "same").unwrap();

		assert_ne!(first, second);
		assert!(verify_password(&hasher, "same", &first));
		assert!(verify_password(&hasher, "same", &second));
	}

	#[test]
	fn test_malformed_hash_never_matches() {
		assert!(!verify_password(&Argon2::default(), "", "not a hash"));
	}
}
