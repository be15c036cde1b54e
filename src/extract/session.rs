use std::sync::Arc;

use axum::{
	extract::{FromRef, FromRequestParts},
	http::{request, HeaderMap},
};
use cookie::Key;
use uuid::Uuid;

use crate::{config::Config, database, error::Error, model, session, Database};

/// The user behind the request, resolved from the signed session cookie.
///
/// A missing, tampered, expired or dangling session is [`CurrentUser::Anonymous`],
/// never a rejection. Expired session rows are deleted on sight.
///
/// ```rust
/// async fn route(user: CurrentUser) {
///   println!("{}", user.is_authenticated());
/// }
/// ```
#[derive(Debug)]
pub enum CurrentUser {
	Anonymous,
	Authenticated { session_id: Uuid, user: model::User },
}

impl CurrentUser {
	pub fn user(&self) -> Option<&model::User> {
		match self {
			Self::Anonymous => None,
			Self::Authenticated { user, .. } => Some(user),
		}
	}

	pub fn session_id(&self) -> Option<Uuid> {
		match self {
			Self::Anonymous => None,
			Self::Authenticated { session_id, .. } => Some(*session_id),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.user().is_some()
	}

	pub fn is_admin(&self, admin_id: i64) -> bool {
		self.user().is_some_and(|user| user.id == admin_id)
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
	Database: FromRef<S>,
	Key: FromRef<S>,
	Arc<Config>: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		Self::from_headers(
			&parts.headers,
			&Database::from_ref(state),
			&Key::from_ref(state),
			&Arc::<Config>::from_ref(state),
		)
		.await
	}
}

impl CurrentUser {
	/// Resolves the session cookie in `headers`.
	pub async fn from_headers(
		headers: &HeaderMap,
		database: &Database,
		key: &Key,
		config: &Config,
	) -> Result<Self, Error> {
		let Some(session_id) = session::session_id(headers, key) else {
			return Ok(Self::Anonymous);
		};

		let Some(session) = database::find_session(database, session_id).await? else {
			return Ok(Self::Anonymous);
		};

		if session.created_at + config.session_ttl < chrono::Utc::now() {
			tracing::debug!(%session_id, "session expired");
			database::delete_session(database, session_id).await?;

			return Ok(Self::Anonymous);
		}

		Ok(match database::find_user_by_id(database, session.user_id).await? {
			Some(user) => Self::Authenticated { session_id, user },
			None => Self::Anonymous,
		})
	}
}
