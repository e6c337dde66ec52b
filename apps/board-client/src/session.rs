//! Authentication state of the client.

use board_shared::dto::{LoginRequest, RegisterRequest, UserResponse};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::store::TokenStore;

/// Who is signed in, backed by the persisted token.
pub struct Session<S: TokenStore> {
    api: ApiClient,
    store: S,
    authenticated: bool,
    user: Option<UserResponse>,
}

impl<S: TokenStore> Session<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            authenticated: false,
            user: None,
        }
    }

    /// Pick up a persisted token and check it with the server.
    ///
    /// A rejected token is discarded. When the server cannot be reached the
    /// token is kept and the session stays authenticated.
    pub async fn restore(&mut self) -> Result<bool, ClientError> {
        let Some(token) = self.store.load()? else {
            return Ok(false);
        };

        self.api.set_token(Some(token));
        self.authenticated = true;

        match self.api.me().await {
            Ok(me) => self.user = Some(me.user),
            Err(err) if err.is_auth_rejection() => {
                tracing::info!("Saved token was rejected, signing out: {}", err);
                self.clear()?;
            }
            Err(err) => {
                tracing::warn!("Could not verify saved token, keeping it: {}", err);
            }
        }

        Ok(self.authenticated)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserResponse, ClientError> {
        let response = self
            .api
            .login(&LoginRequest {
                email: Some(email.to_string()),
                password: Some(password.to_string()),
            })
            .await?;

        self.store.save(&response.token)?;
        self.api.set_token(Some(response.token));
        self.authenticated = true;

        Ok(self.user.insert(response.user))
    }

    /// Create the account, then sign in with the same credentials.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&UserResponse, ClientError> {
        self.api
            .register(&RegisterRequest {
                username: Some(username.to_string()),
                email: Some(email.to_string()),
                password: Some(password.to_string()),
            })
            .await?;

        self.login(email, password).await
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.api.set_token(None);
        self.authenticated = false;
        self.user = None;
        Ok(())
    }
}
