use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, SuccessResponse, VerifyResponse};
use crate::routes::{authenticate, AppState, AUTH_COOKIE};
use crate::services::AuthSession;

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
        .route("/auth/verify", web::get().to(verify))
        .route("/auth/logout", web::post().to(logout));
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = state.auth.token_ttl().as_secs() as i64;

    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .finish()
}

fn session_response(state: &AppState, session: AuthSession) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(state, session.token.clone()))
        .json(AuthResponse {
            success: true,
            token: session.token,
            user: session.user,
        })
}

/// Create an account
///
/// POST /api/v1/auth/register
///
/// Request body:
/// ```json
/// { "email": "string", "password": "string", "name": "string" }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut req = req.into_inner();
    req.email = req.email.trim().to_string();
    req.name = req.name.trim().to_string();

    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }
    req.validate()?;

    let session = state.auth.register(&req.email, &req.password, &req.name).await?;
    Ok(session_response(&state, session))
}

/// Sign in
///
/// POST /api/v1/auth/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if req.validate().is_err() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }

    let session = state.auth.login(&req.email, &req.password).await?;
    tracing::info!("Account {} signed in", session.user.id);

    Ok(session_response(&state, session))
}

/// Check the caller's token
///
/// GET /api/v1/auth/verify
async fn verify(state: web::Data<AppState>, http_req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (user, _) = authenticate(&state, &http_req).await?;
    Ok(HttpResponse::Ok().json(VerifyResponse { user }))
}

/// Revoke the caller's token and clear the cookie
///
/// POST /api/v1/auth/logout
async fn logout(state: web::Data<AppState>, http_req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (user, token) = authenticate(&state, &http_req).await?;
    state.auth.logout(&token).await?;

    tracing::info!("Account {} signed out", user.id);

    let expired = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(expired)
        .json(SuccessResponse { success: true }))
}
