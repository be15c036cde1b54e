use axum::{http::StatusCode, routing::get, Router};

use crate::AppState;

pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("There is no post with id {0}.")]
	UnknownPost(i64),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}
}

/// Routes open to every visitor.
pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/", get(list_posts))
		.route("/post/:id", get(show_post).post(comment))
}

/// Post management. These must be layered behind the admin guard.
pub fn admin_routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/new-post", get(new_post_page).post(new_post))
		.route("/edit-post/:id", get(edit_post_page).post(edit_post))
		.route("/delete/:id", get(delete_post).post(delete_post))
}

#[cfg(test)]
mod test {
	use md5::{Digest, Md5};

	use crate::test::*;

	/// Registers the administrator (the first account) and returns its client.
	async fn admin(pool: &Database) -> TestServer {
		let admin = app(pool.clone());

		register(&admin, "Admin", "admin@example.com", "admin-password").await;
		admin
	}

	#[sqlx::test]
	async fn test_admin_creates_and_lists_posts(pool: Database) {
		let admin = admin(&pool).await;

		let page = admin.get("/new-post").await;

		assert_eq!(page.status_code(), StatusCode::OK);

		let response = create_post(&admin, "First post").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/");

		let index = admin.get("/").await.text();

		assert!(index.contains("First post"));
		assert!(index.contains("Posted by Admin"));
		assert!(index.contains("href=\"/new-post\""));

		let post = admin.get("/post/1").await;

		assert_eq!(post.status_code(), StatusCode::OK);
		assert!(post.text().contains("<p>Body of First post</p>"));
	}

	#[sqlx::test]
	async fn test_admin_routes_forbid_others(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "Kept").await;

		let anonymous = app(pool.clone());
		let reader = app(pool.clone());

		register(&reader, "Reader", "reader@example.com", "reader-password").await;

		for client in [&anonymous, &reader] {
			assert_eq!(client.get("/new-post").await.status_code(), StatusCode::FORBIDDEN);
			assert_eq!(
				create_post(client, "Sneaky").await.status_code(),
				StatusCode::FORBIDDEN
			);
			assert_eq!(client.get("/edit-post/1").await.status_code(), StatusCode::FORBIDDEN);
			assert_eq!(
				client
					.post("/edit-post/1")
					.form(&post_form("Renamed"))
					.await
					.status_code(),
				StatusCode::FORBIDDEN
			);
			assert_eq!(client.get("/delete/1").await.status_code(), StatusCode::FORBIDDEN);
			assert_eq!(client.post("/delete/1").await.status_code(), StatusCode::FORBIDDEN);
		}

		assert_eq!(count(&pool, "post").await, 1);

		let title: String = sqlx::query_scalar("SELECT title FROM post WHERE id = 1")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(title, "Kept");
		assert!(!reader.get("/").await.text().contains("href=\"/new-post\""));
	}

	#[sqlx::test]
	async fn test_post_page_links_more_from_author(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "First").await;

		let page = admin.get("/post/1").await.text();

		assert!(!page.contains("More from Admin"));

		create_post(&admin, "Second").await;

		let page = admin.get("/post/1").await.text();

		assert!(page.contains("More from Admin"));
		assert!(page.contains("href=\"/post/2\""));
		assert!(!page.contains("href=\"/post/1\""));
	}

	#[sqlx::test]
	async fn test_error_pages_keep_navigation(pool: Database) {
		let admin = admin(&pool).await;
		let reader = app(pool.clone());

		register(&reader, "Reader", "reader@example.com", "reader-password").await;

		let response = reader.get("/new-post").await;

		assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
		assert!(response.text().contains("href=\"/logout\""));

		let response = admin.get("/post/42").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert!(response.text().contains("href=\"/logout\""));

		let response = app(pool.clone()).get("/new-post").await;

		assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
		assert!(response.text().contains("href=\"/login\""));
	}

	#[sqlx::test]
	async fn test_anonymous_comment_redirects_to_login(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "Open for comments").await;

		let anonymous = app(pool.clone());

		for text in ["Hello", ""] {
			let response = anonymous.post("/post/1").form(&[("text", text)]).await;

			assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
			assert_eq!(response.header("location"), "/login");
		}

		// Not even a form body.
		let response = anonymous.post("/post/1").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/login");

		assert_eq!(count(&pool, "comment").await, 0);
		assert!(anonymous
			.get("/login")
			.await
			.text()
			.contains("You need to log in or register to comment."));
	}

	#[sqlx::test]
	async fn test_comment_end_to_end(pool: Database) {
		let admin = admin(&pool).await;
		let reader = app(pool.clone());

		register(&reader, "Alice", "alice@example.com", "alice-password").await;
		reader.get("/logout").await;

		create_post(&admin, "Discussed").await;

		assert_eq!(
			login(&reader, "alice@example.com", "alice-password")
				.await
				.status_code(),
			StatusCode::SEE_OTHER
		);

		let response = reader
			.post("/post/1")
			.form(&[("text", "Great <b>read</b>")])
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let page = app(pool.clone()).get("/post/1").await.text();

		assert!(page.contains("Great &lt;b&gt;read&lt;/b&gt;"));
		assert!(page.contains("Alice"));

		let avatar = format!("{:x}", Md5::digest(b"alice@example.com"));

		assert!(page.contains(&format!("https://www.gravatar.com/avatar/{avatar}")));
		assert_eq!(count(&pool, "comment").await, 1);

		let response = reader.post("/post/1").form(&[("text", "")]).await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(response.text().contains("Please write a comment."));
		assert_eq!(count(&pool, "comment").await, 1);
	}

	#[sqlx::test]
	async fn test_edit_keeps_date_and_takes_authorship(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "Original").await;

		// Hand the post to another account to observe the author being reassigned.
		let other = app(pool.clone());

		register(&other, "Other", "other@example.com", "other-password").await;
		sqlx::query("UPDATE post SET author_id = 2, date = 'January 01, 2024'")
			.execute(&pool)
			.await
			.unwrap();

		let form = admin.get("/edit-post/1").await.text();

		assert!(form.contains("value=\"Original\""));

		let response = admin
			.post("/edit-post/1")
			.form(&post_form("Edited"))
			.await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/post/1");

		let page = admin.get("/post/1").await.text();

		assert!(page.contains("Edited"));
		assert!(page.contains("Posted by Admin on January 01, 2024"));
	}

	#[sqlx::test]
	async fn test_duplicate_title_is_rejected_with_message(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "Taken").await;
		create_post(&admin, "Free").await;

		let response = create_post(&admin, "Taken").await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(response.text().contains("A post with this title already exists."));

		let response = admin.post("/edit-post/2").form(&post_form("Taken")).await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(count(&pool, "post").await, 2);
	}

	#[sqlx::test]
	async fn test_invalid_post_form_is_rerendered(pool: Database) {
		let admin = admin(&pool).await;

		let response = admin
			.post("/new-post")
			.form(&[
				("title", "Kept title"),
				("subtitle", ""),
				("img_url", "not a url"),
				("body", "<p>Body</p>"),
			])
			.await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

		let page = response.text();

		assert!(page.contains("value=\"Kept title\""));
		assert!(page.contains("Please enter a valid image URL."));
		assert_eq!(count(&pool, "post").await, 0);
	}

	#[sqlx::test]
	async fn test_delete_post_twice(pool: Database) {
		let admin = admin(&pool).await;

		create_post(&admin, "Doomed").await;
		admin.post("/post/1").form(&[("text", "First!")]).await;

		assert_eq!(count(&pool, "comment").await, 1);

		let response = admin.get("/delete/1").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/");
		assert_eq!(count(&pool, "post").await, 0);
		assert_eq!(count(&pool, "comment").await, 0);

		assert_eq!(admin.get("/delete/1").await.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(admin.get("/post/1").await.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(count(&pool, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_missing_posts_are_not_found(pool: Database) {
		let admin = admin(&pool).await;

		assert_eq!(admin.get("/post/42").await.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(admin.get("/edit-post/42").await.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			admin
				.post("/edit-post/42")
				.form(&post_form("Ghost"))
				.await
				.status_code(),
			StatusCode::NOT_FOUND
		);
	}
}
