use crate::models::{SchoolProfile, Tier, TierThresholds, UserProfile};

const MAX_COUNTED_EXPERIENCES: usize = 5;
const POINTS_PER_EXPERIENCE: f64 = 2.0;

/// Aggregate competitiveness of a profile, independent of any school (0-100)
///
/// GPA contributes up to 40, TOEFL up to 30, GRE up to 20 and each
/// experience 2 (at most five are counted).
pub fn aggregate_user_score(user: &UserProfile) -> f64 {
    let gpa = (user.gpa / 4.0).clamp(0.0, 1.0) * 40.0;
    let toefl = (user.toefl.unwrap_or(0) as f64 / 120.0).min(1.0) * 30.0;
    let gre = (user.gre.unwrap_or(0) as f64 / 340.0).min(1.0) * 20.0;
    let experience = user.experiences.len().min(MAX_COUNTED_EXPERIENCES) as f64 * POINTS_PER_EXPERIENCE;

    (gpa + toefl + gre + experience).min(100.0)
}

/// Bucket a school given a precomputed user score
pub fn classify_score(user_score: f64, admission_rate: f64, thresholds: &TierThresholds) -> Tier {
    let selectivity = 100.0 - admission_rate;

    if user_score >= selectivity + thresholds.safety_margin {
        Tier::Safety
    } else if user_score >= selectivity - thresholds.match_margin {
        Tier::Match
    } else {
        Tier::Reach
    }
}

pub fn classify(user: &UserProfile, school: &SchoolProfile, thresholds: &TierThresholds) -> Tier {
    classify_score(aggregate_user_score(user), school.admission_rate, thresholds)
}
