use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::slug::DEFAULT_CATEGORY_DIR;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub categories: CategoryConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
}

/// Options that control where category pages go and how they are titled.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CategoryConfig {
    /// Subfolder of the output root that holds one folder per category
    pub category_dir: String,
    pub category_title_prefix: String,
    pub category_meta_description_prefix: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            category_dir: DEFAULT_CATEGORY_DIR.to_string(),
            category_title_prefix: "Category: ".to_string(),
            category_meta_description_prefix: "Category: ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_category_defaults() {
        let config = CategoryConfig::default();
        assert_eq!(config.category_dir, "categories");
        assert_eq!(config.category_title_prefix, "Category: ");
        assert_eq!(config.category_meta_description_prefix, "Category: ");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            title = "Notes"

            [categories]
            category_dir = "topics"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.title.as_deref(), Some("Notes"));
        assert_eq!(config.categories.category_dir, "topics");
        assert_eq!(config.categories.category_title_prefix, "Category: ");
    }

    #[test]
    fn test_read_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::read(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));

        let path = dir.path().join("catgen.toml");
        std::fs::write(&path, "[categories\n").unwrap();
        assert!(matches!(Config::read(&path), Err(ConfigError::Parsing(_))));
    }
}
