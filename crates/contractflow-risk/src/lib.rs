//! Risk indicators for contract drafts
//!
//! Scores a [`contractflow_diff::DiffResult`] on a 0 to 10 scale by blending
//! how much of the document changed with how sensitive the changed clauses
//! are, as described by a [`ClauseTaxonomy`].

pub mod score;
pub mod taxonomy;

pub use score::{CategoryHit, RiskAssessment, RiskLevel, aggregate, score};
pub use taxonomy::{
    ClauseCategory, ClauseTaxonomy, DEFAULT_CATEGORY_WEIGHT, DEFAULT_CHANGE_WEIGHT, ScoreBlend,
    TaxonomySpec, default_categories, load_taxonomy_from_path,
};
