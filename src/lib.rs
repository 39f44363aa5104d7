//! ioffer-match - school recommendation service for the ioffer study-abroad platform
//!
//! This library provides the profile normalizer, match scorer, tier
//! classifier and ranker behind the recommendation endpoints, plus the
//! account, profile and AI assistant services the HTTP layer exposes.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use core::{normalize, Catalog, ParsedProfile, Recommender, calculate_match_score, classify};
pub use models::{RawProfile, SchoolProfile, ScoredSchool, ScoringWeights, Tier, TierThresholds, UserProfile};
