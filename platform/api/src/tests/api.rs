use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use common::context::Handler;
use hyper::StatusCode;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use super::global::{api_config, instant_simulation, mock_global_state, GlobalState};
use crate::api::run;
use crate::config::ApiConfig;
use crate::database::Poem;
use crate::global::ApiState;

struct TestServer {
	global: Arc<GlobalState>,
	handler: Handler,
	handle: JoinHandle<anyhow::Result<()>>,
	client: reqwest::Client,
	addr: SocketAddr,
	base: String,
}

impl TestServer {
	async fn start() -> Self {
		Self::start_with(|_| {}).await
	}

	async fn start_with(configure: impl FnOnce(&mut ApiConfig)) -> Self {
		let port = portpicker::pick_unused_port().expect("failed to pick port");
		let mut api = api_config(port);
		configure(&mut api);
		let addr = api.bind_address;
		let (global, handler) = mock_global_state(api, instant_simulation());

		let handle = tokio::spawn(run(global.clone()));

		// We need to wait for the server to start
		tokio::time::sleep(Duration::from_millis(300)).await;

		Self {
			global,
			handler,
			handle,
			client: reqwest::Client::new(),
			addr,
			base: format!("http://127.0.0.1:{port}/v1"),
		}
	}

	async fn seed_poem(&self, id: &str, author_id: &str) {
		self.global
			.store()
			.create_poem(Poem::new(
				id.to_owned(),
				author_id.to_owned(),
				"Title".to_owned(),
				"Content".to_owned(),
				json!({}),
			))
			.await
			.expect("failed to seed poem");
	}

	async fn request(&self, method: reqwest::Method, path: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
		let mut req = self.client.request(method, format!("{}{}", self.base, path));
		if let Some(user) = user {
			req = req.header("X-User-Id", user);
		}
		if let Some(body) = body {
			req = req.json(&body);
		}

		let resp = req.send().await.expect("failed to send request");
		let status = resp.status();
		let body = resp.json().await.unwrap_or(Value::Null);

		(status, body)
	}

	async fn get(&self, path: &str, user: Option<&str>) -> (StatusCode, Value) {
		self.request(reqwest::Method::GET, path, user, None).await
	}

	async fn post(&self, path: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
		self.request(reqwest::Method::POST, path, user, Some(body)).await
	}

	async fn delete(&self, path: &str, user: Option<&str>) -> (StatusCode, Value) {
		self.request(reqwest::Method::DELETE, path, user, None).await
	}

	/// Sends a chunked POST over a raw connection and returns the start of the
	/// response. Without `finish` the body is left open, so a response can
	/// only arrive if the server stops reading early.
	async fn post_chunked(&self, path: &str, chunks: &[&[u8]], finish: bool) -> String {
		let mut stream = TcpStream::connect(self.addr).await.expect("failed to connect");

		let head = format!(
			"POST /v1{path} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n",
			self.addr
		);
		stream.write_all(head.as_bytes()).await.expect("failed to write head");
		for chunk in chunks {
			stream
				.write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
				.await
				.expect("failed to write chunk size");
			stream.write_all(chunk).await.expect("failed to write chunk");
			stream.write_all(b"\r\n").await.expect("failed to write chunk end");
		}
		if finish {
			stream.write_all(b"0\r\n\r\n").await.expect("failed to write last chunk");
		}

		let mut buf = vec![0; 1024];
		let n = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut buf))
			.await
			.expect("server did not answer")
			.expect("failed to read response");

		String::from_utf8_lossy(&buf[..n]).into_owned()
	}

	async fn shutdown(self) {
		// The client uses Keep-Alive, so we need to drop it to release the global context
		drop(self.client);
		drop(self.global);

		tokio::time::timeout(Duration::from_secs(1), self.handler.cancel())
			.await
			.expect("failed to cancel context");
		tokio::time::timeout(Duration::from_secs(1), self.handle)
			.await
			.expect("failed to cancel api")
			.expect("api failed")
			.expect("api failed");
	}
}

#[tokio::test]
async fn test_health() {
	let server = TestServer::start().await;

	let resp = server
		.client
		.get(format!("{}/health", server.base))
		.send()
		.await
		.expect("failed to get health");

	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(
		resp.headers().get("access-control-allow-origin").map(|v| v.as_bytes()),
		Some(&b"*"[..])
	);
	let body = resp.text().await.expect("failed to read body");
	assert_eq!(body, "{\"status\":\"ok\"}");

	server.shutdown().await;
}

#[tokio::test]
async fn test_not_found() {
	let server = TestServer::start().await;

	let resp = server
		.client
		.get(format!("{}/does/not/exist", server.base))
		.send()
		.await
		.expect("failed to send request");

	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	assert!(resp.headers().contains_key("access-control-allow-origin"));
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({ "error": "not_found" }));

	server.shutdown().await;
}

#[tokio::test]
async fn test_like_scenario() {
	let server = TestServer::start().await;
	server.seed_poem("p1", "author").await;

	let (status, body) = server.post("/poems/p1/likes", Some("u1"), json!({})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["like"]["userId"], "u1");
	assert_eq!(body["like"]["poemId"], "p1");

	let (status, body) = server.get("/poems/p1/likes/check", Some("u1")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "hasLiked": true }));

	let (status, body) = server.post("/poems/p1/likes", Some("u1"), json!({})).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["success"], false);

	let (_, poem) = server.get("/poems/p1", None).await;
	assert_eq!(poem["likeCount"], 1);

	let (status, body) = server.delete("/poems/p1/likes", Some("u1")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "success": true }));

	let (status, _) = server.delete("/poems/p1/likes", Some("u1")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, poem) = server.get("/poems/p1", None).await;
	assert_eq!(poem["likeCount"], 0);

	server.shutdown().await;
}

#[tokio::test]
async fn test_bookmark_scenario() {
	let server = TestServer::start().await;
	server.seed_poem("p1", "author").await;
	server.seed_poem("p2", "author").await;

	let (status, body) = server.post("/poems/p1/bookmarks", Some("u1"), json!({})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["bookmark"]["poemId"], "p1");

	let (status, body) = server.get("/users/u1/bookmarks", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total"], 1);
	let bookmarks = body["bookmarks"].as_array().expect("bookmarks should be an array");
	assert_eq!(bookmarks.iter().filter(|b| b["poemId"] == "p1").count(), 1);

	let (_, body) = server.get("/poems/p1/bookmarks/check", Some("u1")).await;
	assert_eq!(body, json!({ "hasBookmarked": true }));

	let (_, body) = server.get("/poems/p2/bookmarks/check", Some("u1")).await;
	assert_eq!(body, json!({ "hasBookmarked": false }));

	server.shutdown().await;
}

#[tokio::test]
async fn test_engagement_errors() {
	let server = TestServer::start().await;
	server.seed_poem("p1", "author").await;

	let (status, _) = server.post("/poems/p1/likes", None, json!({})).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let (status, _) = server.post("/poems/missing/likes", Some("u1"), json!({})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = server.get("/poems/missing/likes", None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = server.get("/poems/p1/likes?page=abc", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	// anonymous callers have not liked anything
	let (status, body) = server.get("/poems/p1/likes/check", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "hasLiked": false }));

	server.shutdown().await;
}

#[tokio::test]
async fn test_likes_pagination() {
	let server = TestServer::start().await;
	server.seed_poem("p1", "author").await;

	for i in 0..12 {
		let (status, _) = server.post("/poems/p1/likes", Some(format!("user{i}").as_str()), json!({})).await;
		assert_eq!(status, StatusCode::OK);
	}

	let (status, body) = server.get("/poems/p1/likes?page=2&limit=5", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["items"].as_array().map(Vec::len), Some(5));
	assert_eq!(body["total"], 12);
	assert_eq!(body["page"], 2);
	assert_eq!(body["limit"], 5);
	assert_eq!(body["totalPages"], 3);
	assert_eq!(body["hasNext"], true);
	assert_eq!(body["hasPrevious"], true);

	let (_, body) = server.get("/users/user3/likes", None).await;
	assert_eq!(body["total"], 1);
	assert_eq!(body["items"][0]["poemId"], "p1");

	server.shutdown().await;
}

#[tokio::test]
async fn test_poems_and_users() {
	let server = TestServer::start().await;

	let (status, user) = server
		.post("/users", None, json!({ "username": "troy", "displayName": "Troy" }))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(user["displayName"], "Troy");

	let user_id = user["id"].as_str().expect("user id").to_owned();
	let (status, fetched) = server.get(&format!("/users/{user_id}"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(fetched, user);

	let (status, _) = server.post("/users", None, json!({ "username": "troy" })).await;
	assert_eq!(status, StatusCode::CONFLICT);

	let (status, _) = server.post("/users", None, json!({ "username": "x" })).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = server
		.post("/poems", None, json!({ "title": "Dawn", "content": "light" }))
		.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let (status, poem) = server
		.post(
			"/poems",
			Some(user_id.as_str()),
			json!({ "title": "Dawn", "content": "light", "metadata": { "form": "haiku" } }),
		)
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(poem["authorId"], user_id.as_str());
	assert_eq!(poem["metadata"]["form"], "haiku");
	assert_eq!(poem["likeCount"], 0);

	let poem_id = poem["id"].as_str().expect("poem id").to_owned();

	let (_, list) = server.get(&format!("/users/{user_id}/poems"), None).await;
	assert_eq!(list["total"], 1);
	assert_eq!(list["items"][0]["id"], poem_id.as_str());

	let (status, _) = server.delete(&format!("/poems/{poem_id}"), Some("someone_else")).await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = server.delete(&format!("/poems/{poem_id}"), Some(user_id.as_str())).await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = server.get(&format!("/poems/{poem_id}"), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = server.post("/poems", Some(user_id.as_str()), json!("not an object")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	server.shutdown().await;
}

#[tokio::test]
async fn test_simulated_endpoints() {
	let server = TestServer::start().await;

	let (status, proof) = server.post("/anonymous/poems", None, json!({ "content": "hello" })).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(proof["simulated"], true);
	assert_eq!(proof["commitment"].as_str().map(str::len), Some(66));

	let poem_id = proof["poemId"].as_str().expect("poem id").to_owned();
	let (status, fetched) = server.get(&format!("/anonymous/poems/{poem_id}"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(fetched, proof);

	let (status, body) = server
		.post(
			"/anonymous/verify",
			None,
			json!({ "commitment": proof["commitment"], "nullifier": proof["nullifier"] }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "valid": true, "simulated": true }));

	let (_, body) = server
		.post("/anonymous/verify", None, json!({ "commitment": "0x12", "nullifier": "0x34" }))
		.await;
	assert_eq!(body["valid"], false);

	let (status, body) = server
		.post("/collective/query", None, json!({ "question": "What is love?" }))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["theme"], "love");
	assert_eq!(body["question"], "What is love?");
	assert_eq!(body["simulated"], true);

	let (status, _) = server.post("/collective/query", None, json!({ "question": "" })).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_user_header() {
	let server = TestServer::start().await;

	let (status, _) = server.get("/health", Some("has space")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	server.shutdown().await;
}

#[tokio::test]
async fn test_body_limit_with_content_length() {
	let server = TestServer::start_with(|api| api.max_body_size = 1024).await;

	let question = "a".repeat(2048);
	let (status, body) = server
		.post("/collective/query", None, json!({ "question": question }))
		.await;
	assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
	assert_eq!(body["message"], "request body too large");

	// small bodies still go through
	let (status, _) = server
		.post("/collective/query", None, json!({ "question": "What is love?" }))
		.await;
	assert_eq!(status, StatusCode::OK);

	server.shutdown().await;
}

#[tokio::test]
async fn test_body_limit_with_chunked_body() {
	let server = TestServer::start_with(|api| api.max_body_size = 1024).await;

	let filler = [b' '; 800];
	let resp = server.post_chunked("/collective/query", &[&filler[..], &filler[..]], false).await;
	assert!(resp.starts_with("HTTP/1.1 413"), "{resp}");

	let resp = server
		.post_chunked("/collective/query", &[&b"{\"question\": "[..], &b"\"What is love?\"}"[..]], true)
		.await;
	assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");

	server.shutdown().await;
}
