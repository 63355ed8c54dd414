//! Clause taxonomy: named clause categories with risk weights and keywords.
//!
//! The taxonomy is configuration. It is either the built-in construction
//! contract taxonomy, the `[risk]` section of `.contractflow/config.toml`,
//! or a stand-alone TOML file of the same shape:
//!
//! ```toml
//! change_weight = 0.6
//! category_weight = 0.4
//!
//! [[categories]]
//! name = "payment"
//! weight = 0.8
//! keywords = ["payment", "invoice", "retention"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use contractflow_utils::error::RiskError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default share of the score driven by the proportion of changed content.
pub const DEFAULT_CHANGE_WEIGHT: f64 = 0.6;

/// Default share of the score driven by the sensitivity of changed clauses.
pub const DEFAULT_CATEGORY_WEIGHT: f64 = 0.4;

const BLEND_TOLERANCE: f64 = 1e-6;

/// A clause category as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseCategory {
    pub name: String,
    /// Sensitivity in `0..=1`.
    pub weight: f64,
    /// Whole-word, case-insensitive keywords. Multi-word keywords match
    /// across any run of whitespace.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ClauseCategory {
    pub fn new(name: impl Into<String>, weight: f64, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            weight,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// How the two score components are blended. Both parts lie in `0..=1`
/// and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBlend {
    pub change_weight: f64,
    pub category_weight: f64,
}

impl Default for ScoreBlend {
    fn default() -> Self {
        Self {
            change_weight: DEFAULT_CHANGE_WEIGHT,
            category_weight: DEFAULT_CATEGORY_WEIGHT,
        }
    }
}

impl ScoreBlend {
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidBlend`] if either part is outside `0..=1`
    /// or the parts do not sum to 1.
    pub fn validate(&self) -> Result<(), RiskError> {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if !in_range(self.change_weight)
            || !in_range(self.category_weight)
            || (self.change_weight + self.category_weight - 1.0).abs() > BLEND_TOLERANCE
        {
            return Err(RiskError::InvalidBlend {
                change_weight: self.change_weight,
                category_weight: self.category_weight,
            });
        }
        Ok(())
    }
}

/// Serialized form of a taxonomy, shared by the config file and stand-alone
/// taxonomy files.
///
/// When only one blend part is given the other is its complement. An empty
/// category list selects the built-in categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_weight: Option<f64>,
    #[serde(default)]
    pub categories: Vec<ClauseCategory>,
}

impl TaxonomySpec {
    #[must_use]
    pub fn blend(&self) -> ScoreBlend {
        match (self.change_weight, self.category_weight) {
            (Some(change_weight), Some(category_weight)) => ScoreBlend {
                change_weight,
                category_weight,
            },
            (Some(change_weight), None) => ScoreBlend {
                change_weight,
                category_weight: 1.0 - change_weight,
            },
            (None, Some(category_weight)) => ScoreBlend {
                change_weight: 1.0 - category_weight,
                category_weight,
            },
            (None, None) => ScoreBlend::default(),
        }
    }

    /// Compile into a usable taxonomy.
    ///
    /// # Errors
    ///
    /// Returns a [`RiskError`] for invalid weights, blends, duplicate
    /// category names or keywords that do not compile.
    pub fn build(&self) -> Result<ClauseTaxonomy, RiskError> {
        let categories = if self.categories.is_empty() {
            default_categories()
        } else {
            self.categories.clone()
        };
        ClauseTaxonomy::new(categories, self.blend())
    }
}

#[derive(Debug, Clone)]
struct CompiledCategory {
    category: ClauseCategory,
    pattern: Option<Regex>,
}

/// Validated clause taxonomy with compiled keyword patterns.
#[derive(Debug, Clone)]
pub struct ClauseTaxonomy {
    blend: ScoreBlend,
    categories: Vec<CompiledCategory>,
}

static BUILT_IN: Lazy<ClauseTaxonomy> = Lazy::new(|| {
    ClauseTaxonomy::new(default_categories(), ScoreBlend::default())
        .expect("built-in clause taxonomy is valid")
});

impl Default for ClauseTaxonomy {
    fn default() -> Self {
        BUILT_IN.clone()
    }
}

impl ClauseTaxonomy {
    /// Validate categories and compile their keywords.
    ///
    /// # Errors
    ///
    /// Returns a [`RiskError`] for weights outside `0..=1`, an invalid
    /// blend, duplicate names (case-insensitive), or keywords that are
    /// empty or fail to compile.
    pub fn new(categories: Vec<ClauseCategory>, blend: ScoreBlend) -> Result<Self, RiskError> {
        blend.validate()?;

        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(categories.len());
        for category in categories {
            if !(0.0..=1.0).contains(&category.weight) {
                return Err(RiskError::InvalidWeight {
                    category: category.name,
                    weight: category.weight,
                });
            }
            if !seen.insert(category.name.to_lowercase()) {
                return Err(RiskError::DuplicateCategory {
                    name: category.name,
                });
            }
            let pattern = compile_keywords(&category)?;
            compiled.push(CompiledCategory { category, pattern });
        }

        Ok(Self {
            blend,
            categories: compiled,
        })
    }

    #[must_use]
    pub fn blend(&self) -> ScoreBlend {
        self.blend
    }

    pub fn categories(&self) -> impl Iterator<Item = &ClauseCategory> {
        self.categories.iter().map(|c| &c.category)
    }

    /// Categories whose keywords occur in `text`.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a ClauseCategory> {
        self.categories
            .iter()
            .filter(move |c| c.pattern.as_ref().is_some_and(|p| p.is_match(text)))
            .map(|c| &c.category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Serializable form of this taxonomy.
    #[must_use]
    pub fn to_spec(&self) -> TaxonomySpec {
        TaxonomySpec {
            change_weight: Some(self.blend.change_weight),
            category_weight: Some(self.blend.category_weight),
            categories: self.categories().cloned().collect(),
        }
    }
}

fn compile_keywords(category: &ClauseCategory) -> Result<Option<Regex>, RiskError> {
    if category.keywords.is_empty() {
        return Ok(None);
    }

    let mut alternatives = Vec::with_capacity(category.keywords.len());
    for keyword in &category.keywords {
        let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
        if words.is_empty() {
            return Err(RiskError::InvalidPattern {
                category: category.name.clone(),
                keyword: keyword.clone(),
                reason: "keyword is empty".to_string(),
            });
        }
        alternatives.push(words.join(r"\s+"));
    }

    let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    Regex::new(&source)
        .map(Some)
        .map_err(|e| RiskError::InvalidPattern {
            category: category.name.clone(),
            keyword: category.keywords.join(", "),
            reason: e.to_string(),
        })
}

/// Built-in categories for construction and engineering contracts.
#[must_use]
pub fn default_categories() -> Vec<ClauseCategory> {
    vec![
        ClauseCategory::new(
            "liability",
            1.0,
            &[
                "liability",
                "liable",
                "indemnity",
                "indemnify",
                "consequential loss",
                "limitation of liability",
            ],
        ),
        ClauseCategory::new(
            "termination",
            0.9,
            &["termination", "terminate", "suspension", "suspend", "insolvency"],
        ),
        ClauseCategory::new(
            "payment",
            0.8,
            &[
                "payment", "pay", "invoice", "price", "fee", "retention", "interest",
            ],
        ),
        ClauseCategory::new(
            "delay",
            0.8,
            &[
                "delay",
                "liquidated damages",
                "extension of time",
                "completion date",
            ],
        ),
        ClauseCategory::new(
            "insurance",
            0.7,
            &["insurance", "insured", "performance bond", "guarantee", "warranty"],
        ),
        ClauseCategory::new(
            "disputes",
            0.6,
            &[
                "dispute",
                "arbitration",
                "adjudication",
                "mediation",
                "governing law",
            ],
        ),
        ClauseCategory::new(
            "scope",
            0.5,
            &["scope", "variation", "change order", "specification", "deliverable"],
        ),
    ]
}

/// Load a stand-alone taxonomy from a TOML file.
pub fn load_taxonomy_from_path(path: &Path) -> Result<ClauseTaxonomy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read taxonomy file: {}", path.display()))?;

    let spec: TaxonomySpec = toml::from_str(&content)
        .with_context(|| format!("Failed to parse taxonomy TOML: {}", path.display()))?;

    let taxonomy = spec
        .build()
        .with_context(|| format!("Invalid taxonomy: {}", path.display()))?;

    Ok(taxonomy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_taxonomy_matches_whole_words_case_insensitively() {
        let taxonomy = ClauseTaxonomy::default();
        let names: Vec<&str> = taxonomy
            .matches("The Contractor shall INDEMNIFY the Employer.")
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["liability"]);

        // "repayment" contains "payment" but is not the whole word.
        assert_eq!(taxonomy.matches("repayment schedule").count(), 0);
    }

    #[test]
    fn test_multi_word_keywords_span_whitespace() {
        let taxonomy = ClauseTaxonomy::default();
        let names: Vec<&str> = taxonomy
            .matches("Liquidated\n  damages apply per week.")
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["delay"]);
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let err = ClauseTaxonomy::new(
            vec![ClauseCategory::new("payment", 1.5, &["payment"])],
            ScoreBlend::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RiskError::InvalidWeight {
                category: "payment".to_string(),
                weight: 1.5
            }
        );

        let nan = ClauseTaxonomy::new(
            vec![ClauseCategory::new("payment", f64::NAN, &[])],
            ScoreBlend::default(),
        );
        assert!(matches!(nan, Err(RiskError::InvalidWeight { .. })));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_keywords() {
        let dup = ClauseTaxonomy::new(
            vec![
                ClauseCategory::new("Payment", 0.5, &[]),
                ClauseCategory::new("payment", 0.7, &[]),
            ],
            ScoreBlend::default(),
        );
        assert!(matches!(dup, Err(RiskError::DuplicateCategory { .. })));

        let empty = ClauseTaxonomy::new(
            vec![ClauseCategory::new("scope", 0.5, &["  "])],
            ScoreBlend::default(),
        );
        assert!(matches!(empty, Err(RiskError::InvalidPattern { .. })));
    }

    #[test]
    fn test_blend_must_sum_to_one() {
        let blend = ScoreBlend {
            change_weight: 0.7,
            category_weight: 0.4,
        };
        assert!(matches!(
            blend.validate(),
            Err(RiskError::InvalidBlend { .. })
        ));
        assert!(ScoreBlend::default().validate().is_ok());
    }

    #[test]
    fn test_spec_blend_complements_single_part() {
        let spec = TaxonomySpec {
            change_weight: Some(0.25),
            ..TaxonomySpec::default()
        };
        let blend = spec.blend();
        assert!((blend.category_weight - 0.75).abs() < 1e-12);

        let taxonomy = spec.build().unwrap();
        assert_eq!(taxonomy.len(), default_categories().len());
    }

    #[test]
    fn test_load_taxonomy_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.toml");
        std::fs::write(
            &path,
            r#"
change_weight = 0.5
category_weight = 0.5

[[categories]]
name = "confidentiality"
weight = 0.9
keywords = ["confidential", "non-disclosure"]
"#,
        )
        .unwrap();

        let taxonomy = load_taxonomy_from_path(&path).unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.blend().change_weight, 0.5);
        assert_eq!(taxonomy.matches("a Non-Disclosure agreement").count(), 1);

        std::fs::write(&path, "[[categories]]\nname = \"x\"\nweight = 2.0\n").unwrap();
        let err = load_taxonomy_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("weight 2"));
    }
}
