use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::error::ApiError;
use crate::models::{ChatRequest, EssayRequest};
use crate::routes::AppState;

/// Configure AI assistant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/ai/essay-generation", web::post().to(generate_essay))
        .route("/ai/chat", web::post().to(chat));
}

/// Generate an application essay
///
/// POST /api/v1/ai/essay-generation
///
/// Request body:
/// ```json
/// {
///   "essayType": "personal-statement",
///   "school": "Carnegie Mellon University",
///   "program": "Machine Learning",
///   "personalInfo": "string",
///   "experiences": "string",
///   "goals": "string",
///   "tone": "formal",
///   "length": 800
/// }
/// ```
async fn generate_essay(
    state: web::Data<AppState>,
    req: web::Json<EssayRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let response = state.ai.generate_essay(&req).await;

    tracing::info!(
        "Generated essay for {} / {} ({:?}, {} chars)",
        req.school,
        req.program,
        response.source,
        response.essay.chars().count()
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Answer an assistant chat message
///
/// POST /api/v1/ai/chat
async fn chat(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let response = state.ai.chat(&req).await;
    tracing::debug!("Chat reply from {:?}", response.source);

    Ok(HttpResponse::Ok().json(response))
}
