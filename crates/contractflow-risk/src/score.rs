//! Risk scoring over a diff.
//!
//! `score = 10 * (change_weight * changed_ratio + category_weight * exposure)`
//! where `changed_ratio` is changed characters over original characters
//! (capped at 1) and `exposure` is the character-weighted mean, over changed
//! segments, of the highest category weight matched by each segment. The
//! result is clamped to `0..=10` and rounded to one decimal before the level
//! is derived, so the displayed score and level always agree.
//!
//! Keyword matching needs clause context, so score line diffs; character
//! diffs of single words rarely contain a whole keyword.

use std::collections::BTreeMap;

use contractflow_diff::DiffResult;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::taxonomy::ClauseTaxonomy;

/// Categorical risk level used for color coding downstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lowest score classified as `Medium`.
    pub const MEDIUM_FROM: f64 = 4.0;
    /// Lowest score classified as `High`.
    pub const HIGH_FROM: f64 = 7.0;

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_FROM {
            Self::High
        } else if score >= Self::MEDIUM_FROM {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A clause category found in the changed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHit {
    pub name: String,
    pub weight: f64,
    /// Changed segments mentioning the category.
    pub segments: usize,
    /// Characters in those segments.
    pub chars: usize,
}

/// Result of scoring one diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub changed_ratio: f64,
    pub category_exposure: f64,
    /// Highest weight first, then by name.
    pub categories: Vec<CategoryHit>,
}

impl RiskAssessment {
    /// Banner text for `Medium` and `High` levels.
    #[must_use]
    pub fn advisory(&self) -> Option<String> {
        let mut message = match self.level {
            RiskLevel::Low => return None,
            RiskLevel::Medium => format!(
                "Moderate changes against the baseline (risk {:.1}/10).",
                self.score
            ),
            RiskLevel::High => format!(
                "Significant changes against the baseline (risk {:.1}/10). Legal review is recommended before approval.",
                self.score
            ),
        };
        if !self.categories.is_empty() {
            let names: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
            message.push_str(" Affected clauses: ");
            message.push_str(&names.join(", "));
            message.push('.');
        }
        Some(message)
    }
}

/// Score a diff against a clause taxonomy.
///
/// Pure: the same diff and taxonomy always give the same assessment.
#[must_use]
pub fn score(result: &DiffResult, taxonomy: &ClauseTaxonomy) -> RiskAssessment {
    let changed_ratio = result.stats().changed_ratio();

    let mut hits: BTreeMap<&str, CategoryHit> = BTreeMap::new();
    let mut changed_chars = 0usize;
    let mut weighted = 0.0f64;

    for segment in result.changes() {
        let chars = segment.text.chars().count();
        if chars == 0 {
            continue;
        }
        changed_chars += chars;

        let mut strongest = 0.0f64;
        for category in taxonomy.matches(&segment.text) {
            strongest = strongest.max(category.weight);
            let hit = hits
                .entry(category.name.as_str())
                .or_insert_with(|| CategoryHit {
                    name: category.name.clone(),
                    weight: category.weight,
                    segments: 0,
                    chars: 0,
                });
            hit.segments += 1;
            hit.chars += chars;
        }
        weighted += strongest * chars as f64;
    }

    let category_exposure = if changed_chars == 0 {
        0.0
    } else {
        weighted / changed_chars as f64
    };

    let blend = taxonomy.blend();
    let raw = 10.0 * (blend.change_weight * changed_ratio + blend.category_weight * category_exposure);
    let score = (raw.clamp(0.0, 10.0) * 10.0).round() / 10.0;
    let level = RiskLevel::from_score(score);

    let mut categories: Vec<CategoryHit> = hits.into_values().collect();
    categories.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));

    debug!(
        score,
        level = %level,
        changed_ratio,
        category_exposure,
        categories = categories.len(),
        "Risk scored"
    );

    RiskAssessment {
        score,
        level,
        changed_ratio,
        category_exposure,
        categories,
    }
}

/// Highest-scoring assessment of a group, e.g. all drafts of one contract.
///
/// Ties keep the earliest item. Returns `None` for an empty group.
pub fn aggregate<K>(items: impl IntoIterator<Item = (K, RiskAssessment)>) -> Option<(K, RiskAssessment)> {
    items.into_iter().fold(None, |best, item| match best {
        Some(current) if current.1.score >= item.1.score => Some(current),
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{ClauseCategory, ScoreBlend};
    use contractflow_diff::{Granularity, diff};

    fn taxonomy(categories: Vec<ClauseCategory>) -> ClauseTaxonomy {
        ClauseTaxonomy::new(categories, ScoreBlend::default()).unwrap()
    }

    #[test]
    fn test_thresholds_are_exact() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(4.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(7.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(10.0), RiskLevel::High);
    }

    #[test]
    fn test_unchanged_document_scores_zero() {
        let text = "Payment within 30 days.\nLiability capped.\n";
        let assessment = score(&diff(text, text, Granularity::Line), &ClauseTaxonomy::default());
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.categories.is_empty());
        assert!(assessment.advisory().is_none());
    }

    #[test]
    fn test_full_rewrite_of_maximal_clauses_is_high() {
        let tax = taxonomy(vec![ClauseCategory::new("liability", 1.0, &["clause"])]);
        let assessment = score(&diff("clause one", "clause two", Granularity::Line), &tax);
        assert_eq!(assessment.score, 10.0);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(assessment.categories.len(), 1);
        assert_eq!(assessment.categories[0].segments, 2);
    }

    #[test]
    fn test_blend_of_ratio_and_exposure() {
        let original = "a\nb\nc\nd\n";
        let modified = "a\nb\nc\nX\n";
        let result = diff(original, modified, Granularity::Line);

        let plain = score(&result, &taxonomy(Vec::new()));
        assert_eq!(plain.changed_ratio, 0.5);
        assert_eq!(plain.score, 3.0);
        assert_eq!(plain.level, RiskLevel::Low);

        let tagged = score(&result, &taxonomy(vec![ClauseCategory::new("x", 1.0, &["x"])]));
        assert_eq!(tagged.category_exposure, 0.5);
        assert_eq!(tagged.score, 5.0);
        assert_eq!(tagged.level, RiskLevel::Medium);
        let banner = tagged.advisory().unwrap();
        assert!(banner.starts_with("Moderate changes"));
        assert!(banner.ends_with("Affected clauses: x."));
    }

    #[test]
    fn test_categories_ordered_by_weight() {
        let result = diff(
            "",
            "The Employer may terminate and withhold payment.\n",
            Granularity::Line,
        );
        let names: Vec<String> = score(&result, &ClauseTaxonomy::default())
            .categories
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["termination", "payment"]);
    }

    #[test]
    fn test_keywords_must_be_whole_words() {
        let result = diff("", "Invoices are paid monthly.\n", Granularity::Line);
        let assessment = score(&result, &ClauseTaxonomy::default());
        assert!(assessment.categories.is_empty());
        assert_eq!(assessment.category_exposure, 0.0);
    }

    #[test]
    fn test_scoring_is_stable() {
        let result = diff("Net 30.\n", "Net 60, retention 5%.\n", Granularity::Line);
        let tax = ClauseTaxonomy::default();
        assert_eq!(score(&result, &tax), score(&result, &tax));
    }

    #[test]
    fn test_aggregate_takes_maximum() {
        let tax = ClauseTaxonomy::default();
        let low = score(&diff("a b c d\n", "a b c d\n", Granularity::Line), &tax);
        let high = score(&diff("a\n", "indemnity\n", Granularity::Line), &tax);

        let (key, best) = aggregate([("v2", low.clone()), ("v3", high.clone()), ("v4", low)]).unwrap();
        assert_eq!(key, "v3");
        assert_eq!(best, high);
        assert!(aggregate(Vec::<(&str, RiskAssessment)>::new()).is_none());
    }
}
