// Core algorithm exports
pub mod admission;
pub mod catalog;
pub mod country;
pub mod normalizer;
pub mod recommender;
pub mod scoring;
pub mod tier;

pub use admission::admission_chance;
pub use catalog::{Catalog, CatalogError};
pub use country::canonical_country;
pub use normalizer::{normalize, ParsedProfile, ValidationError};
pub use recommender::{RecommendationResult, Recommender};
pub use scoring::{calculate_match_score, score_breakdown, ScoreBreakdown};
pub use tier::{aggregate_user_score, classify, classify_score};
