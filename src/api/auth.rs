//! Auth Endpoints

use serde::Serialize;
use serde_json::Value;

use super::client::{ApiClient, ApiRequest, Method, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::CurrentUser;

#[derive(Serialize)]
struct LoginArgs<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct DomainLoginArgs<'a> {
    hash_token: &'a str,
}

#[derive(Serialize)]
struct PasswordArgs<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl<T: Transport> ApiClient<T> {
    /// Sets the session cookie; the token in the body is not used
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, ApiError> {
        self.post(endpoints::LOGIN, QueryParams::new(), &LoginArgs { username, password })
            .await
    }

    pub async fn domain_login(&self, hash_token: &str) -> Result<Value, ApiError> {
        self.post(
            endpoints::DOMAIN_LOGIN,
            QueryParams::new(),
            &DomainLoginArgs { hash_token },
        )
        .await
    }

    pub async fn logout(&self) -> Result<Value, ApiError> {
        self.send_json(ApiRequest::new(Method::Post, endpoints::LOGOUT))
            .await
    }

    pub async fn me(&self) -> Result<CurrentUser, ApiError> {
        self.get(endpoints::ME, QueryParams::new()).await
    }

    /// Portal handshake when a token is present, then `/auth/me`. A failed
    /// handshake still falls through to the existing cookie session.
    pub async fn resolve_session(&self, hash_token: Option<&str>) -> Result<CurrentUser, ApiError> {
        if let Some(token) = hash_token {
            if let Err(err) = self.domain_login(token).await {
                log::warn!("[Auth] domain login failed: {}", err);
            }
        }
        self.me().await
    }

    pub async fn check_auth(&self) -> bool {
        self.me().await.is_ok()
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<Value, ApiError> {
        self.put(
            endpoints::CHANGE_PASSWORD,
            &PasswordArgs {
                current_password: current,
                new_password: new,
            },
        )
        .await
    }
}
