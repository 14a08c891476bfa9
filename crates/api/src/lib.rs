#![forbid(unsafe_code)]

pub mod backend;
pub mod client;
pub mod http;
pub mod token;

pub use backend::{AuthApi, FieldsApi, InMemoryBackend, PaymentsApi, QuestionsApi};
pub use client::{ApiClient, ApiError};
pub use http::HttpBackend;
pub use token::{FileTokenStore, InMemoryTokenStore, TokenStore, TokenStoreError};
