// Route exports
pub mod ai;
pub mod auth;
pub mod health;
pub mod profile;
pub mod recommendations;

use crate::core::Recommender;
use crate::error::ApiError;
use crate::models::PublicUser;
use crate::services::{AiClient, AuthService, ProfileStore};
use actix_web::{web, HttpRequest};
use std::sync::Arc;

pub const AUTH_COOKIE: &str = "auth-token";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub auth: Arc<AuthService>,
    pub profiles: Arc<ProfileStore>,
    pub ai: Arc<AiClient>,
    /// Reject coerced profile fields with 422 instead of warning
    pub strict_validation: bool,
    pub cookie_secure: bool,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(recommendations::configure)
            .configure(ai::configure)
            .configure(auth::configure)
            .configure(profile::configure),
    );
}

/// Token from `Authorization: Bearer` or the auth cookie
pub fn request_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        req.cookie(AUTH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Resolve the signed-in account for a request
pub async fn authenticate(state: &AppState, req: &HttpRequest) -> Result<(PublicUser, String), ApiError> {
    let token = request_token(req).ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;
    let user = state.auth.verify(&token).await?;
    Ok((user, token))
}
