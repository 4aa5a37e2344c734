//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per record-server endpoint.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

#[allow(dead_code)]
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
    api_key: Option<String>,
}

#[allow(dead_code)]
impl TestClient {
    /// Creates a client that sends no API key
    pub fn new(base_url: String) -> Self {
        Self::with_api_key(base_url, None)
    }

    /// Creates a client sending the key the test server is configured with
    pub fn authenticated(base_url: String) -> Self {
        Self::with_api_key(base_url, Some(TEST_API_KEY))
    }

    pub fn with_api_key(base_url: String, api_key: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            api_key: api_key.map(str::to_string),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.header("X-API-Key", key),
            None => builder,
        }
    }

    pub async fn home(&self) -> Response {
        self.request(reqwest::Method::GET, "/")
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn list_records(&self) -> Response {
        self.request(reqwest::Method::GET, "/data")
            .send()
            .await
            .expect("List records request failed")
    }

    /// Lists records and returns the parsed JSON array, asserting success
    pub async fn list_records_json(&self) -> Vec<Value> {
        let response = self.list_records().await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response
            .json::<Vec<Value>>()
            .await
            .expect("Records list is not a JSON array")
    }

    pub async fn add_record(&self, value: &str) -> Response {
        self.add_record_body(json!({ "value": value })).await
    }

    pub async fn add_record_body(&self, body: Value) -> Response {
        self.request(reqwest::Method::POST, "/data")
            .json(&body)
            .send()
            .await
            .expect("Add record request failed")
    }

    pub async fn update_record(&self, id: i64, value: &str) -> Response {
        self.update_record_body(id, json!({ "value": value })).await
    }

    pub async fn update_record_body(&self, id: i64, body: Value) -> Response {
        self.request(reqwest::Method::PUT, &format!("/data/{}", id))
            .json(&body)
            .send()
            .await
            .expect("Update record request failed")
    }

    pub async fn delete_record(&self, id: i64) -> Response {
        self.request(reqwest::Method::DELETE, &format!("/data/{}", id))
            .send()
            .await
            .expect("Delete record request failed")
    }

    /// Sends a raw body with an arbitrary content type to the given path
    pub async fn send_raw(
        &self,
        method: reqwest::Method,
        path: &str,
        content_type: &str,
        body: &'static str,
    ) -> Response {
        self.request(method, path)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .expect("Raw request failed")
    }
}
