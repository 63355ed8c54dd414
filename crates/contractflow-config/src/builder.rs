use std::collections::HashMap;

use contractflow_diff::Granularity;
use contractflow_risk::{ClauseCategory, TaxonomySpec};
use contractflow_utils::error::ConfigError;

use super::{Config, ConfigSource, Defaults};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding contractflow without relying on config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contractflow_config::Config;
    /// use contractflow_diff::Granularity;
    ///
    /// let config = Config::builder()
    ///     .granularity(Granularity::Char)
    ///     .diff_max_input_bytes(64 * 1024)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.granularity(), Granularity::Char);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    verbose: Option<bool>,
    granularity: Option<Granularity>,
    diff_max_input_bytes: Option<usize>,
    change_weight: Option<f64>,
    category_weight: Option<f64>,
    categories: Vec<ClauseCategory>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    #[must_use]
    pub fn diff_max_input_bytes(mut self, bytes: usize) -> Self {
        self.diff_max_input_bytes = Some(bytes);
        self
    }

    /// Set both parts of the risk score blend.
    #[must_use]
    pub fn score_blend(mut self, change_weight: f64, category_weight: f64) -> Self {
        self.change_weight = Some(change_weight);
        self.category_weight = Some(category_weight);
        self
    }

    /// Add a clause category. Any category replaces the built-in set.
    #[must_use]
    pub fn category(mut self, category: ClauseCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut attribute = |key: &str, set: bool| {
            let source = if set {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            source_attribution.insert(key.to_string(), source);
        };

        attribute("verbose", self.verbose.is_some());
        attribute("granularity", self.granularity.is_some());
        attribute("diff_max_input_bytes", self.diff_max_input_bytes.is_some());
        attribute(
            "risk",
            self.change_weight.is_some()
                || self.category_weight.is_some()
                || !self.categories.is_empty(),
        );

        let config = Config {
            defaults: Defaults {
                verbose: self.verbose,
                granularity: self.granularity,
                diff_max_input_bytes: self.diff_max_input_bytes,
            },
            risk: TaxonomySpec {
                change_weight: self.change_weight,
                category_weight: self.category_weight,
                categories: self.categories,
            },
            config_path: None,
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attributes_programmatic_values() {
        let config = Config::builder().verbose(true).build().unwrap();
        assert!(config.verbose());
        assert_eq!(config.source_of("verbose"), ConfigSource::Programmatic);
        assert_eq!(config.source_of("granularity"), ConfigSource::Default);
    }

    #[test]
    fn test_builder_custom_taxonomy() {
        let config = Config::builder()
            .score_blend(0.5, 0.5)
            .category(ClauseCategory::new("warranty", 0.6, &["warranty", "defects"]))
            .build()
            .unwrap();
        let taxonomy = config.taxonomy().unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(config.source_of("risk"), ConfigSource::Programmatic);
    }

    #[test]
    fn test_builder_validates() {
        let err = Config::builder().diff_max_input_bytes(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
