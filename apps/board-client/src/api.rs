//! HTTP client for the Board API.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use board_shared::ErrorResponse;
use board_shared::dto::{
    CreatePostRequest, CreatePostResponse, CurrentUserResponse, DashboardResponse,
    HealthResponse, LoginRequest, LoginResponse, PostsResponse, RegisterRequest,
    RegisterResponse, UsersResponse, VersionResponse,
};

use crate::error::ClientError;

/// Server used when `BOARD_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Thin typed wrapper over the REST API.
///
/// Once a token is set it is sent as `Authorization: Bearer <token>` on every
/// request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("board-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.send_json(Method::POST, "/api/register", body).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.send_json(Method::POST, "/api/login", body).await
    }

    pub async fn me(&self) -> Result<CurrentUserResponse, ClientError> {
        self.get("/api/me").await
    }

    pub async fn users(&self) -> Result<UsersResponse, ClientError> {
        self.get("/api/users").await
    }

    pub async fn posts(&self) -> Result<PostsResponse, ClientError> {
        self.get("/api/posts").await
    }

    pub async fn create_post(
        &self,
        body: &CreatePostRequest,
    ) -> Result<CreatePostResponse, ClientError> {
        self.send_json(Method::POST, "/api/posts", body).await
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse, ClientError> {
        self.get("/api/dashboard").await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }

    pub async fn version(&self) -> Result<VersionResponse, ClientError> {
        self.get("/version").await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path).json(body).send().await?;
        decode(response).await
    }
}

/// Decode a success body, or turn the server's error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string(),
    };
    tracing::debug!(status = status.as_u16(), %message, "API request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
