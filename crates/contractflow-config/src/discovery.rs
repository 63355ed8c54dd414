use anyhow::{Context, Result};
use contractflow_risk::TaxonomySpec;
use contractflow_utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CliArgs, Config, ConfigSource, Defaults};

const CONFIG_DIR: &str = ".contractflow";
const CONFIG_FILE: &str = "config.toml";
const TAXONOMY_FILE: &str = "taxonomy.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    risk: Option<TaxonomySpec>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is given in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("cannot determine the current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut risk = TaxonomySpec::default();

        for key in ["verbose", "granularity", "diff_max_input_bytes", "risk"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            debug!(path = %path.display(), "Loaded configuration file");

            if let Some(file_defaults) = file_config.defaults {
                if file_defaults.verbose.is_some() {
                    defaults.verbose = file_defaults.verbose;
                    source_attribution.insert("verbose".to_string(), ConfigSource::Config);
                }
                if file_defaults.granularity.is_some() {
                    defaults.granularity = file_defaults.granularity;
                    source_attribution.insert("granularity".to_string(), ConfigSource::Config);
                }
                if file_defaults.diff_max_input_bytes.is_some() {
                    defaults.diff_max_input_bytes = file_defaults.diff_max_input_bytes;
                    source_attribution
                        .insert("diff_max_input_bytes".to_string(), ConfigSource::Config);
                }
            }

            if let Some(file_risk) = file_config.risk {
                risk = file_risk;
                source_attribution.insert("risk".to_string(), ConfigSource::Config);
            }
        }

        // CLI overrides
        if cli_args.verbose.is_some() {
            defaults.verbose = cli_args.verbose;
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }
        if cli_args.granularity.is_some() {
            defaults.granularity = cli_args.granularity;
            source_attribution.insert("granularity".to_string(), ConfigSource::Cli);
        }
        if cli_args.diff_max_input_bytes.is_some() {
            defaults.diff_max_input_bytes = cli_args.diff_max_input_bytes;
            source_attribution.insert("diff_max_input_bytes".to_string(), ConfigSource::Cli);
        }

        let config = Self {
            defaults,
            risk,
            config_path,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Walk up from `start_dir` looking for `.contractflow/config.toml`,
    /// stopping at a repository root (.git, .hg, .svn) or the filesystem
    /// root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        find_upward(start_dir, CONFIG_FILE)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::DiscoveryFailed {
                reason: format!("cannot read {}: {e}", path.display()),
            })?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(e.to_string()))
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;
        Ok(config)
    }
}

fn find_upward(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start_dir;
    loop {
        let candidate = current.join(CONFIG_DIR).join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        if current.join(".git").exists()
            || current.join(".hg").exists()
            || current.join(".svn").exists()
        {
            return None;
        }

        current = current.parent()?;
    }
}

/// Locate a stand-alone clause taxonomy file.
///
/// Searches in order:
/// 1. Explicit path (must exist)
/// 2. `.contractflow/taxonomy.toml` found by the upward walk from `start_dir`
/// 3. `~/.config/contractflow/taxonomy.toml`
///
/// `Ok(None)` means the `[risk]` section of the config applies.
pub fn resolve_taxonomy_path(explicit: Option<&Path>, start_dir: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    if let Some(local) = find_upward(start_dir, TAXONOMY_FILE) {
        return Ok(Some(local));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_taxonomy = config_dir.join("contractflow").join(TAXONOMY_FILE);
        if user_taxonomy.is_file() {
            return Ok(Some(user_taxonomy));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractflow_diff::Granularity;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.granularity(), Granularity::Line);
        assert!(!config.verbose());
        assert_eq!(config.source_of("granularity"), ConfigSource::Default);
    }

    #[test]
    fn test_unreadable_explicit_config_is_discovery_failure() {
        let temp = TempDir::new().unwrap();
        let cli_args = CliArgs {
            config_path: Some(temp.path().to_path_buf()),
            ..CliArgs::default()
        };

        let err = Config::discover_from(temp.path(), &cli_args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::DiscoveryFailed { .. })
        ));
    }

    #[test]
    fn test_discovers_config_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[defaults]\ngranularity = \"char\"\n");
        let nested = temp.path().join("contracts").join("msa-7");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::discover_from(&nested, &CliArgs::default()).unwrap();
        assert_eq!(config.granularity(), Granularity::Char);
        assert_eq!(config.source_of("granularity"), ConfigSource::Config);
    }

    #[test]
    fn test_discovery_stops_at_repository_root() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "[defaults]\nverbose = true\n");
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(Config::discover_config_file_from(&repo).is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(
            temp.path(),
            "[defaults]\nverbose = false\ndiff_max_input_bytes = 4096\n",
        );

        let cli = CliArgs {
            verbose: Some(true),
            ..CliArgs::default()
        };
        let config = Config::discover_from(temp.path(), &cli).unwrap();
        assert!(config.verbose());
        assert_eq!(config.source_of("verbose"), ConfigSource::Cli);
        assert_eq!(config.diff_limits().max_input_bytes, 4096);
        assert_eq!(config.source_of("diff_max_input_bytes"), ConfigSource::Config);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(temp.path().join("absent.toml")),
            ..CliArgs::default()
        };
        let err = Config::discover_from(temp.path(), &cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[defaults]\nmodel = \"gpt\"\n");

        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config file"));
    }

    #[test]
    fn test_risk_section_builds_taxonomy() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(
            temp.path(),
            r#"
[risk]
change_weight = 0.5

[[risk.categories]]
name = "liquidated damages"
weight = 0.9
keywords = ["liquidated damages", "delay damages"]
"#,
        );

        let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();
        let taxonomy = config.taxonomy().unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert!((taxonomy.blend().category_weight - 0.5).abs() < 1e-9);
        assert_eq!(config.source_of("risk"), ConfigSource::Config);
    }

    #[test]
    fn test_explicit_taxonomy_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("taxonomy.toml");
        let err = resolve_taxonomy_path(Some(missing.as_path()), temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound { .. })
        ));

        fs::write(&missing, "[[categories]]\nname = \"x\"\nweight = 0.1\n").unwrap();
        assert_eq!(
            resolve_taxonomy_path(Some(missing.as_path()), temp.path()).unwrap(),
            Some(missing)
        );
    }

    #[test]
    fn test_project_taxonomy_is_found_upward() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(TAXONOMY_FILE), "").unwrap();
        let nested = temp.path().join("drafts");
        fs::create_dir_all(&nested).unwrap();

        let found = resolve_taxonomy_path(None, &nested).unwrap();
        assert_eq!(found, Some(dir.join(TAXONOMY_FILE)));
    }
}
