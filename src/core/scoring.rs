use crate::models::{SchoolProfile, ScoringWeights, UserProfile};

/// Component value used when either side has no GRE score
pub const NEUTRAL_GRE_SCORE: f64 = 80.0;
const MAJOR_MATCH_SCORE: f64 = 100.0;
const MAJOR_MISS_SCORE: f64 = 60.0;

/// Per-component breakdown of a match score, each on 0-100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub gpa: f64,
    pub toefl: f64,
    pub gre: f64,
    pub major: f64,
}

impl ScoreBreakdown {
    /// Weighted sum, clamped to 0-100 and rounded
    pub fn total(&self, weights: &ScoringWeights) -> u8 {
        let total = self.gpa * weights.gpa
            + self.toefl * weights.toefl
            + self.gre * weights.gre
            + self.major * weights.major;

        total.clamp(0.0, 100.0).round() as u8
    }
}

/// Calculate a match score (0-100) for a school against a user profile
///
/// Scoring formula:
/// score = (
///     gpa_score * 0.4 +      # 100 - |gpa diff| * 25
///     toefl_score * 0.3 +    # 100 - |toefl diff| * 0.5
///     gre_score * 0.2 +      # 100 - |gre diff| * 0.3, or 80 when unknown
///     major_score * 0.1      # 100 if a program contains the major, else 60
/// )
pub fn calculate_match_score(
    user: &UserProfile,
    school: &SchoolProfile,
    weights: &ScoringWeights,
) -> u8 {
    score_breakdown(user, school).total(weights)
}

pub fn score_breakdown(user: &UserProfile, school: &SchoolProfile) -> ScoreBreakdown {
    ScoreBreakdown {
        gpa: calculate_gpa_score(user.gpa, school.average_gpa),
        toefl: calculate_toefl_score(user.toefl.unwrap_or(0), school.average_toefl),
        gre: calculate_gre_score(user.gre, school.average_gre),
        major: calculate_major_score(&user.major, school),
    }
}

#[inline]
fn calculate_gpa_score(gpa: f64, average: f64) -> f64 {
    (100.0 - (gpa - average).abs() * 25.0).max(0.0)
}

#[inline]
fn calculate_toefl_score(toefl: u16, average: u16) -> f64 {
    (100.0 - (toefl as f64 - average as f64).abs() * 0.5).max(0.0)
}

#[inline]
fn calculate_gre_score(gre: Option<u16>, average: Option<u16>) -> f64 {
    match (gre, average) {
        (Some(gre), Some(average)) => (100.0 - (gre as f64 - average as f64).abs() * 0.3).max(0.0),
        _ => NEUTRAL_GRE_SCORE,
    }
}

/// Case-insensitive substring match of the major against every program
#[inline]
fn calculate_major_score(major: &str, school: &SchoolProfile) -> f64 {
    let major = major.trim().to_lowercase();
    if major.is_empty() {
        return MAJOR_MISS_SCORE;
    }

    let matched = school
        .programs
        .iter()
        .any(|program| program.to_lowercase().contains(&major));

    if matched {
        MAJOR_MATCH_SCORE
    } else {
        MAJOR_MISS_SCORE
    }
}
