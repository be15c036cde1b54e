use axum::{
	extract::FromRequestParts,
	http::{header, request},
	response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;

use crate::flash::{self, Message};

/// Extracts the pending flash message, if any.
///
/// Returning the extractor as part of the response clears the cookie, so the
/// message is shown exactly once.
///
/// ```rust
/// async fn route(flash: Flash) -> impl IntoResponse {
///   let text = flash.text();
///   (flash, Html(format!("{text:?}")))
/// }
/// ```
#[derive(Debug, Default)]
pub struct Flash(pub Option<Message>);

impl Flash {
	pub fn text(&self) -> Option<&'static str> {
		self.0.map(Message::text)
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Flash
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let message = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == flash::COOKIE_NAME)
			.and_then(|cookie| Message::from_code(cookie.value()));

		Ok(Self(message))
	}
}

impl IntoResponseParts for Flash {
	type Error = Infallible;

	fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
		if self.0.is_some() {
			if let Ok(value) = flash::clear_cookie().to_string().parse() {
				res.headers_mut().append(header::SET_COOKIE, value);
			}
		}

		Ok(res)
	}
}
