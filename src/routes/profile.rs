use actix_web::{web, HttpRequest, HttpResponse};
use crate::error::ApiError;
use crate::models::{ProfileResponse, ProfileUpdateResponse, RawProfile};
use crate::routes::{authenticate, recommendations::parse_profile, AppState};

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/user/profile", web::get().to(get_profile))
        .route("/user/profile", web::post().to(update_profile));
}

/// GET /api/v1/user/profile
async fn get_profile(state: web::Data<AppState>, http_req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (user, _) = authenticate(&state, &http_req).await?;

    let stored = state
        .profiles
        .get(&user.id)
        .await
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: stored.profile,
        updated_at: stored.updated_at,
    }))
}

/// Save the signed-in account's profile
///
/// POST /api/v1/user/profile
///
/// The body uses the same fields as a recommendation request. Fields that
/// need coercion are reported back as warnings (or rejected in strict mode).
async fn update_profile(
    state: web::Data<AppState>,
    req: web::Json<RawProfile>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let (user, _) = authenticate(&state, &http_req).await?;

    let (_, warnings) = parse_profile(&state, &req)?;
    let stored = state.profiles.put(&user.id, req.into_inner()).await;

    tracing::info!("Updated profile for account {} ({} warnings)", user.id, warnings.len());

    Ok(HttpResponse::Ok().json(ProfileUpdateResponse {
        success: true,
        profile: stored.profile,
        warnings,
    }))
}
