use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalized student profile used by the scoring pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// GPA on a 4.0 scale
    pub gpa: f64,
    pub toefl: Option<u16>,
    pub gre: Option<u16>,
    pub major: String,
    #[serde(rename = "targetCountries", default)]
    pub target_countries: BTreeSet<String>,
    #[serde(rename = "targetDegree", default)]
    pub target_degree: String,
    #[serde(default)]
    pub experiences: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            gpa: 0.0,
            toefl: None,
            gre: None,
            major: String::new(),
            target_countries: BTreeSet::new(),
            target_degree: String::new(),
            experiences: Vec::new(),
        }
    }
}

/// School statistics from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolProfile {
    pub id: u32,
    pub name: String,
    #[serde(rename = "englishName")]
    pub english_name: String,
    pub country: String,
    #[serde(default)]
    pub city: String,
    pub ranking: u32,
    #[serde(rename = "averageGpa")]
    pub average_gpa: f64,
    #[serde(rename = "averageToefl")]
    pub average_toefl: u16,
    #[serde(rename = "averageGre", default)]
    pub average_gre: Option<u16>,
    /// Percentage of applicants admitted, 0-100
    #[serde(rename = "admissionRate")]
    pub admission_rate: f64,
    #[serde(default)]
    pub programs: BTreeSet<String>,
    #[serde(default)]
    pub tuition: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Reach / match / safety classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Reach,
    Match,
    Safety,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Reach => "reach",
            Tier::Match => "match",
            Tier::Safety => "safety",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A school with its computed fit for one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSchool {
    #[serde(flatten)]
    pub school: SchoolProfile,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub tier: Tier,
    #[serde(rename = "admissionChance")]
    pub admission_chance: u8,
    pub reasoning: String,
}

/// A problem found while normalizing one submitted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub field: String,
    pub message: String,
}

impl FieldWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Scoring weights for the four match components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub gpa: f64,
    pub toefl: f64,
    pub gre: f64,
    pub major: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.gpa + self.toefl + self.gre + self.major
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gpa: 0.4,
            toefl: 0.3,
            gre: 0.2,
            major: 0.1,
        }
    }
}

/// Margins around school selectivity that decide the tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub safety_margin: f64,
    pub match_margin: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            safety_margin: 15.0,
            match_margin: 10.0,
        }
    }
}

/// UI preferences stored with an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPreferences {
    pub language: Language,
    pub notifications: bool,
    pub theme: Theme,
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            language: Language::Zh,
            notifications: true,
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Account data safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub preferences: AccountPreferences,
}
