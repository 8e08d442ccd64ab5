use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatgenConfig {
    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,
    /// Site and category configuration (from catgen-core)
    #[serde(flatten)]
    pub site: catgen_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Site source directory
    pub source: String,
    /// Output directory for generated pages
    pub dest: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            dest: "./_site".to_string(),
            config: "./catgen.toml".to_string(),
        }
    }
}

impl CatgenConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (CATGEN_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| BuildConfig::default().config);

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        // 3. Add environment variables with CATGEN_ prefix
        builder = builder.add_source(
            Environment::with_prefix("CATGEN")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority)
        for key in ["source", "dest", "config"] {
            if let Some(value) = args.try_get_one::<String>(key).unwrap_or(None) {
                builder = builder.set_override(format!("build.{key}"), value.clone())?;
            }
        }

        let config = builder.build()?;
        let catgen_config: CatgenConfig = config.try_deserialize()?;

        Ok(catgen_config)
    }

    /// Get just the site configuration for passing to catgen-core
    pub fn site_config(&self) -> &catgen_core::config::Config {
        &self.site
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// Load configuration specifically for build commands
pub fn load_build_config(args: &ArgMatches) -> Result<CatgenConfig> {
    CatgenConfig::load(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn command() -> Command {
        Command::new("test")
            .arg(Arg::new("source").long("source").value_name("DIR"))
            .arg(Arg::new("dest").long("dest").value_name("DIR"))
            .arg(Arg::new("config").long("config").value_name("FILE"))
    }

    #[test]
    fn test_default_config() {
        let config = CatgenConfig::default();
        assert_eq!(config.build.source, ".");
        assert_eq!(config.build.dest, "./_site");
        assert_eq!(config.site.categories.category_dir, "categories");
        assert_eq!(config.site.categories.category_title_prefix, "Category: ");
    }

    #[test]
    fn test_cli_args_override() {
        let matches = command()
            .try_get_matches_from(vec![
                "test",
                "--source", "/custom/source",
                "--dest", "/custom/dest",
                "--config", "/does/not/exist.toml",
            ])
            .unwrap();

        let config = CatgenConfig::load(&matches).unwrap();
        assert_eq!(config.build.source, "/custom/source");
        assert_eq!(config.build.dest, "/custom/dest");
        // Should still have defaults for non-overridden values
        assert_eq!(config.site.categories.category_meta_description_prefix, "Category: ");
    }

    #[test]
    fn test_config_file_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catgen.toml");
        std::fs::write(
            &path,
            "[site]\ntitle = \"Notes\"\n\n[categories]\ncategory_dir = \"topics\"\n",
        )
        .unwrap();

        let matches = command()
            .try_get_matches_from(vec!["test", "--config", path.to_str().unwrap()])
            .unwrap();

        let config = CatgenConfig::load(&matches).unwrap();
        assert_eq!(config.site.site.title.as_deref(), Some("Notes"));
        assert_eq!(config.site.categories.category_dir, "topics");
        assert_eq!(config.site.categories.category_title_prefix, "Category: ");
        assert_eq!(config.build.source, ".");
    }
}
