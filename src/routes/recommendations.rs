use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use crate::core::normalize;
use crate::error::ApiError;
use crate::models::{
    AdmissionChanceRequest, AdmissionChanceResponse, FieldWarning, RawProfile,
    RecommendationRequest, RecommendationResponse, SchoolsResponse, UserProfile,
};
use crate::routes::{authenticate, AppState};

/// Configure recommendation and catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/recommendations", web::post().to(recommend))
        .route("/recommendations/me", web::get().to(recommend_for_account))
        // Path the web front end already calls
        .route("/ai/recommendations", web::post().to(recommend))
        .route("/ai/admission-chance", web::post().to(admission_chance))
        .route("/schools", web::get().to(list_schools))
        .route("/schools/{id}", web::get().to(get_school));
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Normalize a submitted profile, honouring strict validation
pub fn parse_profile(
    state: &AppState,
    raw: &RawProfile,
) -> Result<(UserProfile, Vec<FieldWarning>), ApiError> {
    let parsed = normalize(raw);

    if state.strict_validation {
        Ok((parsed.strict()?, Vec::new()))
    } else {
        Ok((parsed.profile, parsed.warnings))
    }
}

fn ranked(state: &AppState, raw: &RawProfile, limit: Option<usize>) -> Result<RecommendationResponse, ApiError> {
    let (profile, warnings) = parse_profile(state, raw)?;
    let result = state.recommender.recommend(&profile, limit);

    Ok(RecommendationResponse {
        recommendations: result.schools,
        warnings,
        total_candidates: result.total_candidates,
    })
}

/// Recommend schools for a submitted profile
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "gpa": 3.8,
///   "toefl": "110",
///   "gre": 325,
///   "major": "Computer Science",
///   "targetCountries": ["美国", "英国"],
///   "experiences": ["Research assistant"],
///   "goals": "string",
///   "limit": 12
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = ranked(&state, &req.profile, req.limit)?;

    tracing::info!(
        "Returning {} recommendations (from {} candidates, {} warnings)",
        response.recommendations.len(),
        response.total_candidates,
        response.warnings.len()
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Recommend schools for the signed-in account's saved profile
///
/// GET /api/v1/recommendations/me?limit={limit}
async fn recommend_for_account(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let (user, _) = authenticate(&state, &http_req).await?;

    let stored = state
        .profiles
        .get(&user.id)
        .await
        .ok_or_else(|| ApiError::NotFound("No profile saved for this account".to_string()))?;

    let response = ranked(&state, &stored.profile, query.limit)?;

    tracing::info!(
        "Returning {} recommendations for account {}",
        response.recommendations.len(),
        user.id
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Estimate admission chance at one school
///
/// POST /api/v1/ai/admission-chance
async fn admission_chance(
    state: web::Data<AppState>,
    req: web::Json<AdmissionChanceRequest>,
) -> Result<HttpResponse, ApiError> {
    let school = state
        .recommender
        .catalog()
        .get(req.school_id)
        .ok_or_else(|| ApiError::NotFound(format!("School {} not found", req.school_id)))?;

    let (profile, warnings) = parse_profile(&state, &req.profile)?;
    let chance = crate::core::admission_chance(&profile, school);

    tracing::debug!("Admission chance at school {}: {}%", school.id, chance);

    Ok(HttpResponse::Ok().json(AdmissionChanceResponse {
        school_id: school.id,
        chance,
        warnings,
    }))
}

/// GET /api/v1/schools
async fn list_schools(state: web::Data<AppState>) -> HttpResponse {
    let schools = state.recommender.catalog().schools().to_vec();

    HttpResponse::Ok().json(SchoolsResponse {
        total: schools.len(),
        schools,
    })
}

/// GET /api/v1/schools/{id}
async fn get_school(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    state
        .recommender
        .catalog()
        .get(id)
        .map(|school| HttpResponse::Ok().json(school))
        .ok_or_else(|| ApiError::NotFound(format!("School {} not found", id)))
}
