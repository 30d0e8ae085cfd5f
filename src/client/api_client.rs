use crate::models::{CreateUserRequest, DonateRequest, User, UsersPage};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Request never got an HTTP answer
    Network(String),
    /// Service answered with a non-success status
    Api { status: u16, message: String },
    /// Answer could not be decoded
    Decode(String),
    /// Rejected locally, nothing was sent
    InvalidInput(String),
}

impl ClientError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ClientError::InvalidInput(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Typed access to the directory endpoints
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn user_path(code: &str) -> String {
        format!("/api/user/{}", urlencoding::encode(code))
    }

    pub async fn user_by_code(&self, code: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .get(self.url(&Self::user_path(code)))
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, ClientError> {
        let body = CreateUserRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        };
        let response = self
            .http
            .post(self.url("/api/user"))
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }

    pub async fn users(&self, page: u64, limit: u64) -> Result<UsersPage, ClientError> {
        let response = self
            .http
            .get(self.url("/api/users"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }

    pub async fn leaderboard(&self) -> Result<Vec<User>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/leaderboard"))
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }

    pub async fn donate(&self, code: &str, amount: i64) -> Result<User, ClientError> {
        let path = format!("{}/donate", Self::user_path(code));
        let response = self
            .http
            .put(self.url(&path))
            .json(&DonateRequest { amount })
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await.map_err(network_error)?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Service error text when the body carries one, the status reason otherwise
fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorPayload>(body)
        .map(|payload| payload.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
