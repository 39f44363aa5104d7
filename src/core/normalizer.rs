use crate::core::country::canonical_country;
use crate::models::{FieldWarning, RawProfile, UserProfile};
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

const DEFAULT_GPA_SCALE: f64 = 4.0;
const MAX_TOEFL: f64 = 120.0;
const MIN_GRE: f64 = 260.0;
const MAX_GRE: f64 = 340.0;

/// Raised in strict mode when a submitted profile has invalid fields
#[derive(Debug, Clone, Error)]
#[error("profile has {} invalid field(s)", .warnings.len())]
pub struct ValidationError {
    pub warnings: Vec<FieldWarning>,
}

/// A normalized profile plus everything that had to be coerced on the way
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProfile {
    pub profile: UserProfile,
    pub warnings: Vec<FieldWarning>,
}

impl ParsedProfile {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Reject the profile if any field had to be coerced
    pub fn strict(self) -> Result<UserProfile, ValidationError> {
        if self.warnings.is_empty() {
            Ok(self.profile)
        } else {
            Err(ValidationError {
                warnings: self.warnings,
            })
        }
    }
}

enum NumberField {
    Missing,
    Invalid,
    Value(f64),
}

fn parse_number(value: Option<&Value>) -> NumberField {
    match value {
        None | Some(Value::Null) => NumberField::Missing,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() => NumberField::Value(v),
            _ => NumberField::Invalid,
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return NumberField::Missing;
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => NumberField::Value(v),
                _ => NumberField::Invalid,
            }
        }
        Some(_) => NumberField::Invalid,
    }
}

/// Turn raw form values into a `UserProfile`
///
/// Never fails. Fields that cannot be used are defaulted (GPA to 0,
/// TOEFL/GRE to absent) and reported as warnings.
pub fn normalize(raw: &RawProfile) -> ParsedProfile {
    let mut warnings = Vec::new();

    let gpa = normalize_gpa(raw.gpa.as_ref(), raw.gpa_scale.as_ref(), &mut warnings);
    let toefl = normalize_toefl(raw.toefl.as_ref(), &mut warnings);
    let gre = normalize_gre(raw.gre.as_ref(), &mut warnings);

    let target_countries: BTreeSet<String> = raw
        .target_countries
        .iter()
        .flatten()
        .map(|c| canonical_country(c))
        .filter(|c| !c.is_empty())
        .collect();

    let experiences = raw
        .experiences
        .iter()
        .flatten()
        .filter_map(experience_text)
        .collect();

    let profile = UserProfile {
        gpa,
        toefl,
        gre,
        major: raw.major.as_deref().unwrap_or_default().trim().to_string(),
        target_countries,
        target_degree: raw.target_degree.as_deref().unwrap_or_default().trim().to_string(),
        experiences,
    };

    if !warnings.is_empty() {
        tracing::debug!("Normalized profile with {} warning(s)", warnings.len());
    }

    ParsedProfile { profile, warnings }
}

fn normalize_gpa(
    gpa: Option<&Value>,
    scale: Option<&Value>,
    warnings: &mut Vec<FieldWarning>,
) -> f64 {
    let scale = match parse_number(scale) {
        NumberField::Missing => DEFAULT_GPA_SCALE,
        NumberField::Value(s) if s > 0.0 => s,
        _ => {
            warnings.push(FieldWarning::new("gpaScale", "invalid scale, assuming 4.0"));
            DEFAULT_GPA_SCALE
        }
    };

    let value = match parse_number(gpa) {
        NumberField::Missing => {
            warnings.push(FieldWarning::new("gpa", "missing"));
            return 0.0;
        }
        NumberField::Invalid => {
            warnings.push(FieldWarning::new("gpa", "not a number"));
            return 0.0;
        }
        NumberField::Value(v) => v,
    };

    if value < 0.0 {
        warnings.push(FieldWarning::new("gpa", "must not be negative"));
        return 0.0;
    }

    let value = if value > scale {
        warnings.push(FieldWarning::new("gpa", format!("exceeds scale {}", scale)));
        scale
    } else {
        value
    };

    value / scale * DEFAULT_GPA_SCALE
}

fn normalize_toefl(toefl: Option<&Value>, warnings: &mut Vec<FieldWarning>) -> Option<u16> {
    match parse_number(toefl) {
        NumberField::Missing => None,
        NumberField::Invalid => {
            warnings.push(FieldWarning::new("toefl", "not a number"));
            None
        }
        NumberField::Value(v) if v < 0.0 => {
            warnings.push(FieldWarning::new("toefl", "must not be negative"));
            None
        }
        NumberField::Value(v) if v > MAX_TOEFL => {
            warnings.push(FieldWarning::new("toefl", "exceeds 120, clamped"));
            Some(MAX_TOEFL as u16)
        }
        NumberField::Value(v) => Some(v.round() as u16),
    }
}

fn normalize_gre(gre: Option<&Value>, warnings: &mut Vec<FieldWarning>) -> Option<u16> {
    match parse_number(gre) {
        NumberField::Missing => None,
        // 0 is how the forms say "not taken"
        NumberField::Value(v) if v == 0.0 => None,
        NumberField::Invalid => {
            warnings.push(FieldWarning::new("gre", "not a number"));
            None
        }
        NumberField::Value(v) if !(MIN_GRE..=MAX_GRE).contains(&v) => {
            warnings.push(FieldWarning::new("gre", "outside 260-340, ignored"));
            None
        }
        NumberField::Value(v) => Some(v.round() as u16),
    }
}

fn experience_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Object(map) => ["title", "name", "description"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
