//! One-time notices carried to the next page in a cookie.
//!
//! The cookie only holds a short code; the text lives here so that a
//! client cannot inject arbitrary markup into a page.

use cookie::{Cookie, SameSite};

pub const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
	EmailTaken,
	LoginToComment,
}

impl Message {
	pub fn code(self) -> &'static str {
		match self {
			Self::EmailTaken => "email_taken",
			Self::LoginToComment => "login_to_comment",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		match code {
			"email_taken" => Some(Self::EmailTaken),
			"login_to_comment" => Some(Self::LoginToComment),
			_ => None,
		}
	}

	pub fn text(self) -> &'static str {
		match self {
			Self::EmailTaken => {
				"This email is already registered. You should log in instead."
			}
			Self::LoginToComment => "You need to log in or register to comment.",
		}
	}
}

pub fn create_cookie(message: Message) -> Cookie<'static> {
	Cookie::build((COOKIE_NAME, message.code()))
		.http_only(true)
		.same_site(SameSite::Lax)
		.path("/")
		.into()
}

pub fn clear_cookie() -> Cookie<'static> {
	Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_codes_round_trip() {
		for message in [Message::EmailTaken, Message::LoginToComment] {
			assert_eq!(Message::from_code(message.code()), Some(message));
		}

		assert_eq!(Message::from_code("<script>"), None);
		assert_eq!(Message::from_code(""), None);
	}
}
