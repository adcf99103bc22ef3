#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use xchange_api::config::AppConfig;
use xchange_api::database::Stores;
use xchange_api::state::AppState;

/// Router over a fresh in-memory store. Each test gets its own data.
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("xchange_api=debug")
            .with_test_writer()
            .try_init();

        let mut config = AppConfig::development();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;

        let state = AppState::new(config, Stores::memory());
        Self {
            router: xchange_api::app(state),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-access-token", token);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::PUT, uri, Some(token), None).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register an account and return its token
    pub async fn register(&self, name: &str, email: &str) -> Result<String> {
        let res = self
            .post(
                "/user/general",
                None,
                json!({ "name": name, "email": email, "password": "secret1" }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "register failed: {}", res.body);
        token_of(&res)
    }

    /// Create a post owned by the token's user and return its id
    pub async fn create_post(&self, token: &str, title: &str) -> Result<String> {
        let res = self
            .post(
                "/posts",
                Some(token),
                json!({
                    "category": "furniture",
                    "title": title,
                    "description": "Free to a good home",
                    "preferredLocation": "Downtown"
                }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "create post failed: {}", res.body);
        id_of(&res.body)
    }

    /// Comment on a post and return the new comment's id
    pub async fn comment(&self, token: &str, post_id: &str, text: &str) -> Result<String> {
        let res = self
            .post(&format!("/posts/comment/{}", post_id), Some(token), json!({ "text": text }))
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "comment failed: {}", res.body);
        let last = res
            .body
            .as_array()
            .and_then(|comments| comments.last())
            .context("no comments returned")?;
        id_of(last)
    }
}

pub fn token_of(res: &TestResponse) -> Result<String> {
    res.body["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}

pub fn id_of(value: &Value) -> Result<String> {
    value["id"]
        .as_str()
        .map(str::to_string)
        .context("value has no id")
}
