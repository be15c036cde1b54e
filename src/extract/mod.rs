mod flash;
mod session;

pub use flash::Flash;
pub use session::CurrentUser;

use axum::extract::{FromRequest, Request};
use serde::de;

use crate::{error::Error, form::FormErrors};

/// Extractor that deserializes a url-encoded form body and validates it.
///
/// A malformed body is rejected, but failed validation is not: the handler
/// gets the submitted values back alongside the field errors so that it can
/// re-render the form.
///
/// ```rust
/// async fn route(form: Form<LoginInput>) {
///   match form {
///     Form::Valid(input) => { /* ... */ }
///     Form::Invalid(input, errors) => { /* ... */ }
///   }
/// }
/// ```
#[derive(Debug)]
pub enum Form<T> {
	Valid(T),
	Invalid(T, FormErrors),
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let input = axum::extract::Form::<T>::from_request(req, state).await?.0;

		Ok(match input.validate() {
			Ok(()) => Self::Valid(input),
			Err(errors) => Self::Invalid(input, errors.into()),
		})
	}
}
