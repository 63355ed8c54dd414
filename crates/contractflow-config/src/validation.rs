use contractflow_utils::error::ConfigError;

use super::{Config, MAX_DIFF_INPUT_BYTES};

impl Config {
    /// Validate configuration values.
    ///
    /// A single problem is reported as [`ConfigError::InvalidValue`]; several
    /// are collected into [`ConfigError::ValidationFailed`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems: Vec<(String, String)> = Vec::new();

        if let Some(max_bytes) = self.defaults.diff_max_input_bytes {
            if max_bytes == 0 {
                problems.push((
                    "diff_max_input_bytes".to_string(),
                    "must be greater than 0".to_string(),
                ));
            } else if max_bytes > MAX_DIFF_INPUT_BYTES {
                problems.push((
                    "diff_max_input_bytes".to_string(),
                    "exceeds maximum limit of 64MiB".to_string(),
                ));
            }
        }

        if let Err(e) = self.risk.blend().validate() {
            problems.push(("risk".to_string(), e.to_string()));
        } else if let Err(e) = self.risk.build() {
            problems.push(("risk.categories".to_string(), e.to_string()));
        }

        match problems.len() {
            0 => Ok(()),
            1 => {
                let (key, value) = problems.remove(0);
                Err(ConfigError::InvalidValue { key, value })
            }
            error_count => Err(ConfigError::ValidationFailed {
                errors: problems
                    .into_iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect(),
                error_count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractflow_risk::{ClauseCategory, TaxonomySpec};

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let mut config = Config::default();
        config.defaults.diff_max_input_bytes = Some(0);
        match config.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "diff_max_input_bytes"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_blend_must_sum_to_one() {
        let mut config = Config::default();
        config.risk = TaxonomySpec {
            change_weight: Some(0.7),
            category_weight: Some(0.7),
            categories: Vec::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "risk"
        ));
    }

    #[test]
    fn test_multiple_problems_are_collected() {
        let mut config = Config::default();
        config.defaults.diff_max_input_bytes = Some(MAX_DIFF_INPUT_BYTES + 1);
        config.risk.categories = vec![ClauseCategory::new("payment", 1.5, &["invoice"])];

        match config.validate() {
            Err(ConfigError::ValidationFailed {
                errors,
                error_count,
            }) => {
                assert_eq!(error_count, 2);
                assert!(errors[1].starts_with("risk.categories:"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }
}
