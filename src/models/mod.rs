// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccountPreferences, FieldWarning, Language, PublicUser, SchoolProfile, ScoredSchool,
    ScoringWeights, Theme, Tier, TierThresholds, UserProfile,
};
pub use requests::{
    AdmissionChanceRequest, ChatRequest, EssayRequest, LoginRequest, RawProfile,
    RecommendationRequest, RegisterRequest,
};
pub use responses::{
    AdmissionChanceResponse, AuthResponse, ChatResponse, ContentSource, EssayResponse,
    ErrorResponse, HealthResponse, ProfileResponse, ProfileUpdateResponse,
    RecommendationResponse, SchoolsResponse, SuccessResponse, VerifyResponse,
};
