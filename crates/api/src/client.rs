use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::token::TokenStore;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The backend answered with a non-success status. `message` carries the
    /// body's `error` field when one was decodable, otherwise it is empty.
    #[error("backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The response decoded but could not be mapped into a domain value.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> String {
        self.error.or(self.message).unwrap_or_default()
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// Thin wrapper around `reqwest::Client` that knows the backend base URL and
/// attaches the bearer token to every request while one is stored.
///
/// No token simply means no `Authorization` header; the backend decides what
/// is reachable anonymously.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        let token = self.tokens.token();
        debug!(%method, %url, authenticated = token.is_some(), "api request");
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .map(ErrorBody::into_message)
            .unwrap_or_default();
        Err(ApiError::Status { status, message })
    }

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-success statuses, or
    /// an undecodable body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-success statuses, or
    /// an undecodable body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// POST `body` as JSON to `path`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success statuses.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-success statuses, or
    /// an undecodable body.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// DELETE `path`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success statuses.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// POST a multipart form to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-success statuses, or
    /// an undecodable body.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .request(Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::InMemoryTokenStore;

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let client = ApiClient::new(
            "http://localhost:5000/api/",
            Arc::new(InMemoryTokenStore::new()),
        );
        assert_eq!(
            client.url("/admin/fields"),
            "http://localhost:5000/api/admin/fields"
        );
        assert_eq!(client.url("fields"), "http://localhost:5000/api/fields");
    }

    #[test]
    fn error_body_prefers_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"invalid OTP","message":"nope"}"#).unwrap();
        assert_eq!(body.into_message(), "invalid OTP");

        let body: ErrorBody = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        assert_eq!(body.into_message(), "nope");

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_message(), "");
    }
}
