mod auth;
mod fields;
mod payments;
mod questions;

use std::sync::Arc;

use crate::client::ApiClient;
use crate::token::TokenStore;

/// The real backend: every trait call becomes one HTTP request through
/// [`ApiClient`]. Paths live in the per-concern modules next to the wire
/// DTOs they produce and consume.
#[derive(Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client: ApiClient::new(base_url, tokens),
        }
    }

    #[must_use]
    pub fn from_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }
}
