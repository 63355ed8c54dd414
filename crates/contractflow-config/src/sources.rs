use std::collections::BTreeMap;

use super::Config;

impl Config {
    /// Effective configuration as `key -> (value, source)`.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            let source = self.source_of(key).as_str().to_string();
            config.insert(key.to_string(), (value, source));
        };

        add("verbose", self.verbose().to_string());
        add("granularity", self.granularity().to_string());
        add(
            "diff_max_input_bytes",
            self.diff_limits().max_input_bytes.to_string(),
        );

        let blend = self.risk.blend();
        add(
            "risk",
            format!(
                "change_weight={}, category_weight={}, categories={}",
                blend.change_weight,
                blend.category_weight,
                if self.risk.categories.is_empty() {
                    "built-in".to_string()
                } else {
                    self.risk.categories.len().to_string()
                }
            ),
        );

        config
    }
}
