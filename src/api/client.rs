//! Shared HTTP Client
//!
//! [`Transport`] is the seam between the typed service methods and the
//! network. [`HttpTransport`] sends through reqwest (browser fetch on
//! wasm32, cookie session included); tests substitute a recording mock.

use std::rc::Rc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::retry::{browser_sleep, retry_transient, RetryPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

// ========================
// Query Parameters
// ========================

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Ordered query string pairs. Array values are repeated keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// `None` is skipped
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.push(key, v);
        }
        self
    }

    /// `None` and empty strings are skipped
    pub fn push_non_empty(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.push(key, v),
            _ => self,
        }
    }

    pub fn push_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for v in values {
            self.push(key, v);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_VALUE),
                    utf8_percent_encode(v, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

// ========================
// Requests / Responses
// ========================

/// A file attached to a multipart request
#[derive(Clone, Debug, PartialEq)]
pub struct UploadPart {
    pub field: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(UploadPart),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(ApiError::decode)?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// JSON body as sent, for assertions
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// ========================
// reqwest transport
// ========================

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: absolute_base(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path, used for links the browser opens directly
    pub fn url_for(&self, path: &str, query: &QueryParams) -> String {
        join_url(&self.base_url, path, query)
    }
}

/// Relative bases are resolved against the page origin
fn absolute_base(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}{}", origin, trimmed)
}

pub fn join_url(base: &str, path: &str, query: &QueryParams) -> String {
    let mut url = format!("{}{}", base.trim_end_matches('/'), path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.to_query_string());
    }
    url
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = join_url(&self.base_url, &request.path, &request.query);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(part) => {
                let file = reqwest::multipart::Part::bytes(part.bytes)
                    .file_name(part.filename)
                    .mime_str(&part.mime)
                    .map_err(ApiError::decode)?;
                builder.multipart(reqwest::multipart::Form::new().part(part.field, file))
            }
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout()
    } else if err.is_decode() || err.is_body() {
        ApiError::decode(err)
    } else {
        ApiError::network(err)
    }
}

// ========================
// Typed client
// ========================

/// Typed request helpers over a [`Transport`]. Service methods for each
/// backend domain live in sibling modules as `impl` blocks on this type.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: Rc<T>,
    on_unauthorized: Option<Rc<dyn Fn()>>,
    retry: RetryPolicy,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            on_unauthorized: self.on_unauthorized.clone(),
            retry: self.retry.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Rc::new(transport),
            on_unauthorized: None,
            retry: RetryPolicy::single_attempt(),
        }
    }

    /// Retry network, timeout and server failures under `policy`
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Hook run whenever a response comes back 401
    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_unauthorized = Some(Rc::new(hook));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send and check the status; the raw body is returned on success.
    /// Transient failures are retried under the client's policy.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        retry_transient(&self.retry, || self.execute_once(request.clone()), browser_sleep).await
    }

    async fn execute_once(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }
        if response.status == 401 {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }
        let err = ApiError::from_response(response.status, &response.body);
        log::warn!("[Api] {:?} {} -> {}: {}", method, path, response.status, err.message);
        Err(err)
    }

    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.execute(request).await?;
        decode(&response.body)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: QueryParams) -> Result<R, ApiError> {
        self.send_json(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    pub async fn get_bytes(&self, path: &str, query: QueryParams) -> Result<Vec<u8>, ApiError> {
        let request = ApiRequest::new(Method::Get, path).with_query(query);
        Ok(self.execute(request).await?.body)
    }

    pub async fn post<B, R>(&self, path: &str, query: QueryParams, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path)
            .with_query(query)
            .with_json(body)?;
        self.send_json(request).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(ApiRequest::new(Method::Put, path).with_json(body)?)
            .await
    }

    pub async fn patch<B, R>(&self, path: &str, query: QueryParams, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Patch, path)
            .with_query(query)
            .with_json(body)?;
        self.send_json(request).await
    }

    /// DELETE with an optional JSON body (reasons travel in the body)
    pub async fn delete<B, R>(&self, path: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = ApiRequest::new(Method::Delete, path);
        if let Some(body) = body {
            request = request.with_json(body)?;
        }
        self.send_json(request).await
    }

    pub async fn upload<R: DeserializeOwned>(&self, path: &str, part: UploadPart) -> Result<R, ApiError> {
        let mut request = ApiRequest::new(Method::Post, path);
        request.body = RequestBody::Multipart(part);
        self.send_json(request).await
    }
}

/// Empty bodies decode as JSON `null`
fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R, ApiError> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(ApiError::decode)?
    };
    serde_json::from_value(value).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use crate::api::mock::MockTransport;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_query_params_skip_none_and_repeat_arrays() {
        let mut q = QueryParams::new();
        q.push("page", 1)
            .push_opt::<&str>("search", None)
            .push_non_empty("location", Some(""))
            .push_non_empty("notes", Some("a b"))
            .push_all("status_in", ["ordered", "received"]);

        assert_eq!(q.get("page"), Some("1"));
        assert!(!q.contains("search"));
        assert!(!q.contains("location"));
        assert_eq!(q.get_all("status_in"), vec!["ordered", "received"]);
        assert_eq!(
            q.to_query_string(),
            "page=1&notes=a%20b&status_in=ordered&status_in=received"
        );
    }

    #[test]
    fn test_join_url() {
        let mut q = QueryParams::new();
        q.push("days", 30);
        assert_eq!(join_url("http://h/api/", "/items/stale", &q), "http://h/api/items/stale?days=30");
        assert_eq!(join_url("http://h/api", "/auth/me", &QueryParams::new()), "http://h/api/auth/me");
    }

    #[tokio::test]
    async fn test_non_success_becomes_api_error() {
        let mock = MockTransport::new();
        mock.reply(404, json!({"detail": "Item not found"}));
        let api = ApiClient::new(mock.clone());

        let err = api
            .get::<Value>("/items/x", QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Item not found");
    }

    #[tokio::test]
    async fn test_unauthorized_runs_hook() {
        let mock = MockTransport::new();
        mock.reply(401, json!({"detail": "Not authenticated"}));
        mock.reply(403, json!({"detail": "Forbidden"}));
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let api = ApiClient::new(mock.clone()).with_unauthorized_hook(move || counter.set(counter.get() + 1));

        assert!(api.get::<Value>("/auth/me", QueryParams::new()).await.is_err());
        assert!(api.get::<Value>("/admin/users", QueryParams::new()).await.is_err());
        assert_eq!(hits.get(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let mock = MockTransport::new();
        mock.reply_raw(204, Vec::new());
        let api = ApiClient::new(mock.clone());

        let out: () = api
            .delete::<Value, ()>("/items/1", None)
            .await
            .unwrap();
        assert_eq!(out, ());
        assert_eq!(mock.last_request().method, Method::Delete);
    }

    #[tokio::test]
    async fn test_bad_json_is_unknown_error() {
        let mock = MockTransport::new();
        mock.reply_raw(200, b"<html>".to_vec());
        let api = ApiClient::new(mock.clone());

        let err = api.get::<Value>("/items", QueryParams::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay_ms: 0,
            backoff_multiplier: 2,
        }
    }

    #[tokio::test]
    async fn test_transient_server_error_is_retried() {
        let mock = MockTransport::new();
        mock.reply(503, json!({"detail": "Service Unavailable"}));
        mock.reply(200, json!({"ok": true}));
        let api = ApiClient::new(mock.clone()).with_retry(no_wait());

        let out: Value = api
            .post("/items", QueryParams::new(), &json!({"description": "x"}))
            .await
            .unwrap();
        assert_eq!(out, json!({"ok": true}));
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mock = MockTransport::new();
        mock.reply(400, json!({"detail": "Bad request"}));
        let api = ApiClient::new(mock.clone()).with_retry(no_wait());

        let err = api.get::<Value>("/items", QueryParams::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_default_client_tries_once() {
        let mock = MockTransport::new();
        mock.reply(503, json!({"detail": "down"}));
        let api = ApiClient::new(mock.clone());

        assert!(api.get::<Value>("/items", QueryParams::new()).await.is_err());
        assert_eq!(mock.requests().len(), 1);
    }
}
