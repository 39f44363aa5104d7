use crate::models::{SchoolProfile, UserProfile};

pub const MIN_CHANCE: f64 = 5.0;
pub const MAX_CHANCE: f64 = 85.0;

#[inline]
fn ratio(value: f64, average: f64) -> f64 {
    if average > 0.0 {
        value / average
    } else {
        1.0
    }
}

/// Estimate the admission probability in percent, clamped to 5-85
///
/// The profile's ratio to the school averages (GPA 0.4, TOEFL 0.3, GRE 0.3)
/// scales the school's admission rate.
pub fn admission_chance(user: &UserProfile, school: &SchoolProfile) -> u8 {
    let gpa_factor = ratio(user.gpa, school.average_gpa);
    let toefl_factor = ratio(user.toefl.unwrap_or(0) as f64, school.average_toefl as f64);
    let gre_factor = match (user.gre, school.average_gre) {
        (Some(gre), Some(average)) => ratio(gre as f64, average as f64),
        _ => 1.0,
    };

    let strength = gpa_factor * 0.4 + toefl_factor * 0.3 + gre_factor * 0.3;
    let probability = strength * (school.admission_rate / 100.0) * 100.0;

    probability.clamp(MIN_CHANCE, MAX_CHANCE).round() as u8
}
