use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::config::CategoryConfig;
use crate::filters;
use crate::front_matter::{self, Data, FrontMatterError};

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(std::io::Error),
    FrontMatter(String, FrontMatterError),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::IoError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => write!(f, "Template error: {}", e),
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
            TemplateError::FrontMatter(name, e) => write!(f, "Layout '{}': {}", name, e),
        }
    }
}

impl std::error::Error for TemplateError {}

/// A named template that pages can wrap their output in.
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: String,
    pub data: Data,
    pub content: String,
}

impl Layout {
    pub fn new(name: &str, source: &str) -> Result<Self, TemplateError> {
        let (data, body) = front_matter::split(source)
            .map_err(|e| TemplateError::FrontMatter(name.to_string(), e))?;

        Ok(Self {
            name: name.to_string(),
            data,
            content: body.to_string(),
        })
    }

    /// Name of the layout this one is nested in, if any
    pub fn parent(&self) -> Option<&str> {
        self.data.get("layout").and_then(Value::as_str)
    }
}

/// Layout registry plus the template engine that renders against it.
pub struct Layouts {
    layouts: BTreeMap<String, Layout>,
    tera: Tera,
}

impl Layouts {
    pub fn new(config: &CategoryConfig) -> Self {
        let mut tera = Tera::default();
        filters::register(&mut tera, &config.category_dir);

        Self {
            layouts: BTreeMap::new(),
            tera,
        }
    }

    /// Load every file in `dir`, keyed by file stem.
    pub fn load<P: AsRef<Path>>(dir: P, config: &CategoryConfig) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let mut layouts = Self::new(config);

        if !dir.is_dir() {
            debug!("No layouts directory at {}", dir.display());
            return Ok(layouts);
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path)?;
            debug!("Loaded layout '{}' from {}", name, path.display());
            layouts.insert(Layout::new(&name, &source)?);
        }

        Ok(layouts)
    }

    /// Point the link filters at `config.category_dir`
    pub fn apply_config(&mut self, config: &CategoryConfig) {
        filters::register(&mut self.tera, &config.category_dir);
    }

    pub fn insert(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Render a template source string with the given context
    pub fn render_str(&mut self, template: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.tera.render_str(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_layouts_by_stem() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.html"), "<body>{{ content | safe }}</body>").unwrap();
        std::fs::write(
            dir.path().join("category_index.html"),
            "---\nlayout: default\n---\n<h1>{{ page.title }}</h1>",
        )
        .unwrap();

        let layouts = Layouts::load(dir.path(), &CategoryConfig::default()).unwrap();

        assert_eq!(layouts.len(), 2);
        assert!(layouts.contains("category_index"));
        assert_eq!(layouts.get("category_index").unwrap().parent(), Some("default"));
        assert_eq!(layouts.get("default").unwrap().parent(), None);
        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["category_index", "default"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let layouts = Layouts::load(dir.path().join("_layouts"), &CategoryConfig::default()).unwrap();
        assert!(layouts.is_empty());
    }

    #[test]
    fn test_bad_front_matter_names_layout() {
        let err = Layout::new("broken", "---\n[1, 2]\n---\n").unwrap_err();
        assert!(err.to_string().starts_with("Layout 'broken'"));
    }

    #[test]
    fn test_render_str_has_filters() {
        let config = CategoryConfig {
            category_dir: "topics".to_string(),
            ..CategoryConfig::default()
        };
        let mut layouts = Layouts::new(&config);

        let mut context = Context::new();
        context.insert("name", "Web Dev");
        let out = layouts
            .render_str("{{ name | category_link | safe }}", &context)
            .unwrap();

        assert_eq!(out, "<a class=\"category\" href=\"/topics/web-dev/\">Web Dev</a>");
    }
}
