use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::error::{FetchError, FetchResult};
use super::http::{HttpClient, HttpRequest, Method, ReqwestClient};
use super::query::{build_url, QueryParams};
use crate::auth::{StoreError, TokenStorage};
use crate::transcode::{camelize_owned, decamelize_owned};

/// Options for a single [`ApiClient::request`] call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers; these win over the defaults on conflict
    pub headers: HeaderMap,
    /// camelCase body, decamelized before sending
    pub body: Option<Value>,
    pub params: Option<QueryParams>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            headers: HeaderMap::new(),
            body: None,
            params: None,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Backend REST client
///
/// Generic over the HTTP client implementation for testability. Holds no
/// mutable state, so one instance can serve concurrent calls.
pub struct ApiClient<H: HttpClient = ReqwestClient> {
    http: H,
    base_url: Url,
    tokens: Arc<dyn TokenStorage>,
}

impl ApiClient<ReqwestClient> {
    /// Creates a new API client with the default HTTP implementation
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStorage>) -> Self {
        Self::with_http_client(base_url, tokens, ReqwestClient::new())
    }
}

impl<H: HttpClient> ApiClient<H> {
    /// Creates a new API client with a custom HTTP implementation
    pub fn with_http_client(base_url: Url, tokens: Arc<dyn TokenStorage>, http: H) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Returns the base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Reads the bearer token, treating any storage failure as "no token"
    async fn auth_token(&self) -> Option<String> {
        match self.tokens.load().await {
            Ok(token) => Some(token),
            Err(StoreError::NoToken) => None,
            Err(e) => {
                tracing::warn!("Error reading auth token: {}", e);
                None
            }
        }
    }

    /// Builds the headers for a request
    async fn build_headers(&self, overrides: HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.auth_token().await {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Stored auth token is not a valid header value, skipping"),
            }
        }

        for name in overrides.keys() {
            headers.remove(name);
            for value in overrides.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        headers
    }

    /// Performs one request and normalizes every outcome into a [`FetchResult`]
    ///
    /// HTTP error statuses and transport failures come back as `Err`; nothing
    /// here panics or retries.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> FetchResult<T> {
        let RequestOptions {
            method,
            headers,
            body,
            params,
        } = options;

        let url = build_url(&self.base_url, endpoint, params.as_ref())
            .map_err(|e| FetchError::invalid_request(format!("Invalid URL for {endpoint}: {e}")))?;

        tracing::debug!(method = method.as_str(), url = %url, "Sending API request");

        let headers = self.build_headers(headers).await;
        let body = match body {
            Some(value) => Some(
                serde_json::to_string(&decamelize_owned(value))
                    .map_err(|e| FetchError::invalid_request(format!("Failed to encode body: {e}")))?,
            ),
            None => None,
        };

        let response = match self
            .http
            .send(HttpRequest {
                method,
                url: url.clone(),
                headers,
                body,
            })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, "API request failed: {}", e);
                return Err(FetchError::transport(e.to_string()));
            }
        };

        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "API error response");
            let message = if response.body.trim().is_empty() {
                response.status_line()
            } else {
                response.body.clone()
            };
            return Err(FetchError::status(response.status, message));
        }

        tracing::debug!(url = %url, status = response.status, "API request succeeded");

        let wire: Value = if response.body.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            response
                .json()
                .map_err(|e| FetchError::decode(format!("Failed to parse response: {e}")))?
        };

        serde_json::from_value(camelize_owned(wire))
            .map_err(|e| FetchError::decode(format!("Unexpected response shape: {e}")))
    }

    /// GET with query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> FetchResult<T> {
        self.request(endpoint, RequestOptions::new(Method::Get).params(params.clone()))
            .await
    }

    /// POST with a camelCase body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> FetchResult<T> {
        let options = RequestOptions::new(Method::Post).body(encode_body(body)?);
        self.request(endpoint, options).await
    }

    /// PUT with a camelCase body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> FetchResult<T> {
        let options = RequestOptions::new(Method::Put).body(encode_body(body)?);
        self.request(endpoint, options).await
    }

    /// DELETE
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> FetchResult<T> {
        self.request(endpoint, RequestOptions::new(Method::Delete))
            .await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> FetchResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| FetchError::invalid_request(format!("Failed to encode body: {e}")))
}

impl<H: HttpClient + Clone> Clone for ApiClient<H> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            tokens: self.tokens.clone(),
        }
    }
}
