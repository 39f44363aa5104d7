use crate::core::{
    admission::admission_chance,
    catalog::Catalog,
    scoring::calculate_match_score,
    tier::{aggregate_user_score, classify_score},
};
use crate::models::{SchoolProfile, ScoredSchool, ScoringWeights, Tier, TierThresholds, UserProfile};
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 12;
pub const MAX_LIMIT: usize = 50;

/// Result of the recommendation process
#[derive(Debug)]
pub struct RecommendationResult {
    pub schools: Vec<ScoredSchool>,
    /// Schools left after the country filter, before truncation
    pub total_candidates: usize,
}

/// Recommendation orchestrator - scores and ranks the catalog for a profile
///
/// # Pipeline Stages
/// 1. Country filter
/// 2. Match scoring
/// 3. Tier classification and admission estimate
/// 4. Ranking and truncation
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    weights: ScoringWeights,
    thresholds: TierThresholds,
    default_limit: usize,
    max_limit: usize,
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        weights: ScoringWeights,
        thresholds: TierThresholds,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            catalog,
            weights,
            thresholds,
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn with_defaults(catalog: Arc<Catalog>) -> Self {
        Self::new(
            catalog,
            ScoringWeights::default(),
            TierThresholds::default(),
            DEFAULT_LIMIT,
            MAX_LIMIT,
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Page size for a request: the requested limit when positive, capped
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }

    /// Rank catalog schools for a user
    ///
    /// # Arguments
    /// * `user` - The normalized user profile
    /// * `limit` - Requested page size, `None` for the configured default
    pub fn recommend(&self, user: &UserProfile, limit: Option<usize>) -> RecommendationResult {
        let limit = self.effective_limit(limit);
        let user_score = aggregate_user_score(user);

        let mut schools: Vec<ScoredSchool> = self
            .catalog
            .in_countries(&user.target_countries)
            .map(|school| self.score_school(user, school, user_score))
            .collect();

        let total_candidates = schools.len();

        // Sort by score (descending), then ranking and id (ascending)
        schools.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.school.ranking.cmp(&b.school.ranking))
                .then_with(|| a.school.id.cmp(&b.school.id))
        });

        schools.truncate(limit);

        tracing::debug!(
            "Ranked {} of {} candidate schools (user score {:.1})",
            schools.len(),
            total_candidates,
            user_score
        );

        RecommendationResult {
            schools,
            total_candidates,
        }
    }

    fn score_school(&self, user: &UserProfile, school: &SchoolProfile, user_score: f64) -> ScoredSchool {
        let match_score = calculate_match_score(user, school, &self.weights);
        let tier = classify_score(user_score, school.admission_rate, &self.thresholds);
        let reasoning = reasoning(tier, school, match_score);

        ScoredSchool {
            school: school.clone(),
            match_score,
            tier,
            admission_chance: admission_chance(user, school),
            reasoning,
        }
    }
}

fn reasoning(tier: Tier, school: &SchoolProfile, match_score: u8) -> String {
    match tier {
        Tier::Reach => format!(
            "{}竞争激烈（录取率{:.1}%），你的背景与其录取均值仍有差距，建议作为冲刺选择。",
            school.name, school.admission_rate
        ),
        Tier::Match => format!(
            "你的背景与{}的录取要求较为匹配（匹配度{}），建议重点准备申请材料。",
            school.name, match_score
        ),
        Tier::Safety => format!(
            "你的背景明显高于{}的录取均值，可以作为保底选择。",
            school.name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn create_recommender() -> Recommender {
        Recommender::with_defaults(Arc::new(Catalog::embedded().unwrap()))
    }

    fn create_user(countries: &[&str]) -> UserProfile {
        UserProfile {
            gpa: 3.8,
            toefl: Some(110),
            gre: Some(325),
            major: "Computer Science".to_string(),
            target_countries: countries.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
            target_degree: "Master".to_string(),
            experiences: vec!["Research assistant".to_string()],
        }
    }

    #[test]
    fn test_recommend_sorted_by_score() {
        let recommender = create_recommender();
        let result = recommender.recommend(&create_user(&[]), None);

        assert_eq!(result.schools.len(), DEFAULT_LIMIT.min(result.total_candidates));
        for pair in result.schools.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }

    #[test]
    fn test_uk_filter_excludes_us() {
        let recommender = create_recommender();
        let result = recommender.recommend(&create_user(&["英国"]), Some(50));

        assert!(!result.schools.is_empty());
        assert!(result.schools.iter().all(|s| s.school.country == "英国"));
        assert_eq!(result.total_candidates, result.schools.len());
    }

    #[test]
    fn test_zero_profile_returns_full_ranking() {
        let recommender = create_recommender();
        let result = recommender.recommend(&UserProfile::default(), Some(MAX_LIMIT));

        assert_eq!(result.schools.len(), recommender.catalog().len());
        assert!(result.schools.iter().all(|s| s.match_score < 60));
        assert!(result.schools.iter().all(|s| s.tier == Tier::Reach));
    }

    #[test]
    fn test_limits() {
        let recommender = create_recommender();

        assert_eq!(recommender.effective_limit(None), DEFAULT_LIMIT);
        assert_eq!(recommender.effective_limit(Some(0)), DEFAULT_LIMIT);
        assert_eq!(recommender.effective_limit(Some(3)), 3);
        assert_eq!(recommender.effective_limit(Some(500)), MAX_LIMIT);

        let result = recommender.recommend(&create_user(&[]), Some(3));
        assert_eq!(result.schools.len(), 3);
    }

    #[test]
    fn test_unknown_country_yields_empty() {
        let recommender = create_recommender();
        let result = recommender.recommend(&create_user(&["Atlantis"]), None);

        assert!(result.schools.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_reasoning_mentions_school() {
        let recommender = create_recommender();
        let result = recommender.recommend(&create_user(&[]), Some(1));

        let top = &result.schools[0];
        assert!(top.reasoning.contains(&top.school.name));
    }
}
