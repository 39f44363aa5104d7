// Integration tests for the ioffer-match HTTP API

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use ioffer_match::core::{Catalog, Recommender};
use ioffer_match::error::{handle_json_payload_error, handle_path_error};
use ioffer_match::routes::{self, AppState};
use ioffer_match::services::{AiClient, AuthService, ProfileStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_state(strict_validation: bool) -> AppState {
    let catalog = Arc::new(Catalog::embedded().expect("embedded catalog"));

    AppState {
        recommender: Recommender::with_defaults(catalog),
        auth: Arc::new(AuthService::with_hash_rounds("integration-secret", 1, 10)),
        profiles: Arc::new(ProfileStore::new()),
        ai: Arc::new(AiClient::offline().expect("offline client")),
        strict_validation,
        cookie_secure: false,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::PathConfig::default().error_handler(handle_path_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn sample_profile() -> Value {
    json!({
        "gpa": "3.8",
        "toefl": 110,
        "gre": "325",
        "major": "Computer Science",
        "targetCountries": [],
        "experiences": ["Research assistant", {"title": "Software intern"}],
        "goals": "Work on ML systems"
    })
}

#[actix_web::test]
async fn test_health() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert!(body["schools"].as_u64().unwrap() > 0);
}

#[actix_web::test]
async fn test_recommendations_end_to_end() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(sample_profile())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let recs = body["recommendations"].as_array().unwrap();

    assert_eq!(recs.len(), 12);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 0);
    assert!(body["totalCandidates"].as_u64().unwrap() >= 12);

    let scores: Vec<u64> = recs.iter().map(|r| r["matchScore"].as_u64().unwrap()).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "Recommendations not sorted by score");
    }
    for rec in recs {
        assert!(rec["matchScore"].as_u64().unwrap() <= 100);
        assert!(["reach", "match", "safety"].contains(&rec["tier"].as_str().unwrap()));
        let chance = rec["admissionChance"].as_u64().unwrap();
        assert!((5..=85).contains(&chance));
    }
}

#[actix_web::test]
async fn test_uk_filter_excludes_us_schools() {
    let app = test_app!(create_state(false));

    let mut profile = sample_profile();
    profile["targetCountries"] = json!(["英国"]);
    profile["limit"] = json!(50);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/recommendations")
        .set_json(profile)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let recs = body["recommendations"].as_array().unwrap();

    assert!(!recs.is_empty());
    assert!(recs.iter().all(|r| r["country"] == "英国"));
    assert!(recs.iter().all(|r| r["country"] != "美国"));
}

#[actix_web::test]
async fn test_empty_profile_still_ranks() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 12);
    assert_eq!(body["warnings"][0]["field"], "gpa");
}

#[actix_web::test]
async fn test_strict_mode_rejects_bad_fields() {
    let app = test_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(json!({ "gpa": "abc", "toefl": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["warnings"][0]["field"], "gpa");
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"gpa\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_school_lookup() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::get().uri("/api/v1/schools").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"].as_u64().unwrap() as usize, body["schools"].as_array().unwrap().len());

    let req = test::TestRequest::get().uri("/api/v1/schools/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["englishName"], "Stanford University");

    let req = test::TestRequest::get().uri("/api/v1/schools/9999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/v1/schools/stanford").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_admission_chance() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/admission-chance")
        .set_json(json!({ "schoolId": 3, "profile": sample_profile() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["schoolId"], 3);
    let chance = body["chance"].as_u64().unwrap();
    assert!((5..=85).contains(&chance));

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/admission-chance")
        .set_json(json!({ "schoolId": 9999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_auth_flow() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "li@example.com", "password": "secret1", "name": "Li Hua" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("auth-token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["preferences"]["language"], "zh");

    // Duplicate registration
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "LI@example.com", "password": "secret1", "name": "Li" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "li@example.com", "password": "wrong-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Login and verify with a bearer token
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "li@example.com", "password": "secret1" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["email"], "li@example.com");

    // The cookie works too
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .cookie(Cookie::new("auth-token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout revokes the token
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_validation() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "li@example.com", "password": "123", "name": "Li" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "li@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing required fields");
}

#[actix_web::test]
async fn test_register_trims_padded_email() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "  Zhang@Example.com ", "password": "secret1", "name": " Zhang " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "zhang@example.com");
    assert_eq!(body["user"]["name"], "Zhang");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "zhang@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_profile_round_trip_and_personal_recommendations() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::get().uri("/api/v1/user/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "wang@example.com", "password": "secret1", "name": "Wang" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let auth = format!("Bearer {}", body["token"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations/me")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let mut profile = sample_profile();
    profile["targetCountries"] = json!(["UK"]);
    profile["toefl"] = json!("one hundred");

    let req = test::TestRequest::post()
        .uri("/api/v1/user/profile")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(profile)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["warnings"][0]["field"], "toefl");

    let req = test::TestRequest::get()
        .uri("/api/v1/user/profile")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["profile"]["major"], "Computer Science");
    assert!(body["updatedAt"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations/me?limit=3")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r["country"] == "英国"));
}

#[actix_web::test]
async fn test_ai_fallbacks() {
    let app = test_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/essay-generation")
        .set_json(json!({
            "essayType": "sop",
            "school": "Imperial College London",
            "program": "Advanced Computing",
            "goals": "building reliable distributed systems"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["source"], "template");
    assert!(body["essay"].as_str().unwrap().contains("Advanced Computing program at Imperial College London"));

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/essay-generation")
        .set_json(json!({ "school": "", "program": "CS" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .set_json(json!({ "message": "我的GPA够吗", "userProfile": { "gpa": "3.6" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["source"], "template");
    assert!(body["response"].as_str().unwrap().contains("3.6"));
}
