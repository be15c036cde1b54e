//! Form schemas and the field-level error map used to re-render them.
//!
//! Every input struct defaults missing fields to empty strings so that an
//! omitted field fails its `required` constraint instead of the whole body
//! failing to deserialize.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::model;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
	#[validate(length(min = 1, message = "Please enter your name."))]
	pub name: String,
	#[validate(
		length(
			min = 1,
			max = 250,
			message = "Please enter an email of at most 250 characters."
		),
		email(message = "Please enter a valid email address.")
	)]
	pub email: String,
	#[validate(length(
		min = 1,
		max = 250,
		message = "Please enter a password of at most 250 characters."
	))]
	pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginInput {
	#[validate(
		length(min = 1, message = "Please enter your email."),
		email(message = "Please enter a valid email address.")
	)]
	pub email: String,
	#[validate(length(min = 1, message = "Please enter your password."))]
	pub password: String,
}

/// Used for both creating and editing a post.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PostInput {
	#[validate(length(
		min = 1,
		max = 250,
		message = "Please enter a title of at most 250 characters."
	))]
	pub title: String,
	#[validate(length(
		min = 1,
		max = 250,
		message = "Please enter a subtitle of at most 250 characters."
	))]
	pub subtitle: String,
	#[validate(url(message = "Please enter a valid image URL."))]
	pub img_url: String,
	#[validate(length(min = 1, message = "Please write the post body."))]
	pub body: String,
}

impl From<&model::Post> for PostInput {
	fn from(post: &model::Post) -> Self {
		Self {
			title: post.title.clone(),
			subtitle: post.subtitle.clone(),
			img_url: post.img_url.clone(),
			body: post.body.clone(),
		}
	}
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CommentInput {
	#[validate(length(min = 1, message = "Please write a comment."))]
	pub text: String,
}

/// Field name to the first message reported for that field.
#[derive(Debug, Default)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
	pub fn field(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn insert(&mut self, field: &str, message: impl Into<String>) {
		self.0.insert(field.to_owned(), message.into());
	}
}

impl From<ValidationErrors> for FormErrors {
	fn from(errors: ValidationErrors) -> Self {
		let errors = errors
			.field_errors()
			.into_iter()
			.filter_map(|(field, errors)| {
				let error = errors.first()?;
				let message = error
					.message
					.clone()
					.unwrap_or_else(|| error.code.clone());

				Some((field.to_string(), message.into_owned()))
			})
			.collect();

		Self(errors)
	}
}
