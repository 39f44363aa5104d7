use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Profile fields exactly as the front end submits them
///
/// Numeric fields accept either JSON numbers or strings; the profile
/// normalizer turns them into a `UserProfile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub gpa: Option<Value>,
    #[serde(alias = "gpa_scale", rename = "gpaScale", default)]
    pub gpa_scale: Option<Value>,
    #[serde(default)]
    pub toefl: Option<Value>,
    #[serde(default)]
    pub gre: Option<Value>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(alias = "target_degree", rename = "targetDegree", default)]
    pub target_degree: Option<String>,
    #[serde(alias = "target_countries", rename = "targetCountries", default)]
    pub target_countries: Option<Vec<String>>,
    #[serde(default)]
    pub experiences: Option<Vec<Value>>,
    #[serde(default)]
    pub goals: Option<String>,
}

/// Request for a ranked list of schools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub profile: RawProfile,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request to estimate admission chance at one school
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionChanceRequest {
    #[serde(alias = "school_id", rename = "schoolId")]
    pub school_id: u32,
    #[serde(default)]
    pub profile: RawProfile,
}

/// Account registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[serde(default)]
    pub password: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub name: String,
}

/// Account login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub password: String,
}

/// Essay generation request, forwarded to the AI provider as-is
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EssayRequest {
    #[serde(alias = "essay_type", rename = "essayType", default)]
    pub essay_type: Option<String>,
    #[validate(length(min = 1))]
    pub school: String,
    #[validate(length(min = 1))]
    pub program: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(alias = "personal_info", rename = "personalInfo", default)]
    pub personal_info: Option<String>,
    #[serde(default)]
    pub experiences: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<Value>,
}

/// Chat message for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(alias = "user_profile", rename = "userProfile", default)]
    pub user_profile: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_request_accepts_mixed_numbers() {
        let json = r#"{
            "gpa": "3.8",
            "toefl": 110,
            "gre": "",
            "major": "Computer Science",
            "targetCountries": ["美国"],
            "experiences": [{"title": "Intern"}],
            "goals": "PhD",
            "limit": 5
        }"#;

        let req: RecommendationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.limit, Some(5));
        assert_eq!(req.profile.gpa, Some(Value::from("3.8")));
        assert_eq!(req.profile.toefl, Some(Value::from(110)));
        assert_eq!(req.profile.target_countries, Some(vec!["美国".to_string()]));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "student@example.com".to_string(),
            password: "12345".to_string(),
            name: "Li".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            password: "123456".to_string(),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
