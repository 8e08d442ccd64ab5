use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tera::Context;
use tracing::warn;

use crate::front_matter::{self, Data, FrontMatterError};
use crate::template::{Layouts, TemplateError};

#[derive(Debug)]
pub enum PageError {
    Io(PathBuf, std::io::Error),
    FrontMatter(PathBuf, FrontMatterError),
    Template(String, TemplateError),
    NotRendered(String),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Io(p, e) => write!(f, "IO error at {}: {}", p.display(), e),
            PageError::FrontMatter(p, e) => write!(f, "{}: {}", p.display(), e),
            PageError::Template(url, e) => write!(f, "Failed to render {}: {}", url, e),
            PageError::NotRendered(url) => write!(f, "Page {} was written before being rendered", url),
        }
    }
}

impl std::error::Error for PageError {}

/// A page built from a template file that can render itself through the
/// layout registry and write the result under an output root.
pub trait Renderable: Sized {
    /// Build a page from `template_path`. A missing template is not an
    /// error: the page is returned with `should_render() == false`.
    fn from_template(template_path: &Path, name: &str, dir: &str) -> Result<Self, PageError>;

    fn data(&self) -> &Data;

    fn set_data(&mut self, key: &str, value: Value);

    fn render(&mut self, layouts: &mut Layouts, payload: &Value) -> Result<(), PageError>;

    /// Write rendered output and return the path written to
    fn write(&self, dest: &Path) -> Result<PathBuf, PageError>;

    fn should_render(&self) -> bool;

    fn url(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Page {
    name: String,
    dir: String,
    data: Data,
    content: String,
    output: Option<String>,
    perform_render: bool,
}

impl Page {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn out_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.name)
    }

    fn template_error<E: Into<TemplateError>>(&self, err: E) -> PageError {
        PageError::Template(self.url(), err.into())
    }
}

impl Renderable for Page {
    fn from_template(template_path: &Path, name: &str, dir: &str) -> Result<Self, PageError> {
        let mut page = Page {
            name: name.to_string(),
            dir: dir.trim_matches('/').to_string(),
            data: Data::new(),
            content: String::new(),
            output: None,
            perform_render: false,
        };

        if !template_path.is_file() {
            return Ok(page);
        }

        let source = std::fs::read_to_string(template_path)
            .map_err(|e| PageError::Io(template_path.to_path_buf(), e))?;
        let (data, body) = front_matter::split(&source)
            .map_err(|e| PageError::FrontMatter(template_path.to_path_buf(), e))?;

        page.data = data;
        page.content = body.to_string();
        page.perform_render = true;

        Ok(page)
    }

    fn data(&self) -> &Data {
        &self.data
    }

    fn set_data(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn render(&mut self, layouts: &mut Layouts, payload: &Value) -> Result<(), PageError> {
        let url = self.url();
        self.data.insert("url".to_string(), Value::String(url.clone()));

        let mut context = match payload {
            Value::Object(_) => Context::from_value(payload.clone()).map_err(|e| self.template_error(e))?,
            _ => Context::new(),
        };
        context.insert("page", &self.data);

        let mut output = layouts
            .render_str(&self.content, &context)
            .map_err(|e| self.template_error(e))?;

        // Wrap the output in its layout, then that layout's layout, and so on
        let mut next = self.data.get("layout").and_then(Value::as_str).map(str::to_string);
        let mut seen = HashSet::new();
        while let Some(name) = next.take() {
            if !seen.insert(name.clone()) {
                warn!("Layout '{}' includes itself while rendering {}", name, url);
                break;
            }
            let Some(layout) = layouts.get(&name) else {
                warn!("Layout '{}' requested by {} does not exist", name, url);
                break;
            };

            let source = layout.content.clone();
            context.insert("layout", &layout.data);
            next = layout.parent().map(str::to_string);

            context.insert("content", &output);
            output = layouts
                .render_str(&source, &context)
                .map_err(|e| self.template_error(e))?;
        }

        self.output = Some(output);
        Ok(())
    }

    fn write(&self, dest: &Path) -> Result<PathBuf, PageError> {
        let output = self.output.as_ref().ok_or_else(|| PageError::NotRendered(self.url()))?;
        let output_path = dest.join(self.out_path());

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PageError::Io(parent.to_path_buf(), e))?;
        }
        std::fs::write(&output_path, output).map_err(|e| PageError::Io(output_path.clone(), e))?;

        Ok(output_path)
    }

    fn should_render(&self) -> bool {
        self.perform_render
    }

    fn url(&self) -> String {
        let file = if self.name == "index.html" { "" } else { self.name.as_str() };

        if self.dir.is_empty() {
            format!("/{}", file)
        } else {
            format!("/{}/{}", self.dir, file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::template::Layout;
    use serde_json::json;
    use tempfile::TempDir;

    fn layouts() -> Layouts {
        let mut layouts = Layouts::new(&CategoryConfig::default());
        layouts.insert(
            Layout::new("default", "<title>{{ site.title }}</title><main>{{ content | safe }}</main>").unwrap(),
        );
        layouts.insert(
            Layout::new("post", "---\nlayout: default\nkind: post\n---\n<article class=\"{{ layout.kind }}\">{{ content | safe }}</article>").unwrap(),
        );
        layouts.insert(Layout::new("loop", "---\nlayout: loop\n---\n[{{ content | safe }}]").unwrap());
        layouts
    }

    fn page_from(dir: &TempDir, source: &str, name: &str) -> Page {
        let path = dir.path().join("template.html");
        std::fs::write(&path, source).unwrap();
        Page::from_template(&path, name, "/categories/rust/").unwrap()
    }

    #[test]
    fn test_missing_template_is_skipped() {
        let dir = TempDir::new().unwrap();
        let page = Page::from_template(&dir.path().join("nope.html"), "index.html", "categories/rust").unwrap();

        assert!(!page.should_render());
        assert!(page.data().is_empty());
        assert!(matches!(page.write(dir.path()), Err(PageError::NotRendered(_))));
    }

    #[test]
    fn test_urls() {
        let dir = TempDir::new().unwrap();
        assert_eq!(page_from(&dir, "", "index.html").url(), "/categories/rust/");
        assert_eq!(page_from(&dir, "", "atom.xml").url(), "/categories/rust/atom.xml");

        let root = Page::from_template(&dir.path().join("x"), "index.html", "").unwrap();
        assert_eq!(root.url(), "/");
    }

    #[test]
    fn test_render_through_layout_chain() {
        let dir = TempDir::new().unwrap();
        let mut page = page_from(&dir, "---\nlayout: post\n---\n{{ page.title }} at {{ page.url }}", "index.html");
        page.set_data("title", json!("Category: Rust"));

        page.render(&mut layouts(), &json!({ "site": { "title": "Blog" } })).unwrap();

        assert_eq!(
            page.output(),
            Some("<title>Blog</title><main><article class=\"post\">Category: Rust at /categories/rust/</article></main>")
        );
    }

    #[test]
    fn test_unknown_and_cyclic_layouts_stop() {
        let dir = TempDir::new().unwrap();

        let mut page = page_from(&dir, "---\nlayout: missing\n---\nbody", "index.html");
        page.render(&mut layouts(), &json!({})).unwrap();
        assert_eq!(page.output(), Some("body"));

        let mut page = page_from(&dir, "---\nlayout: loop\n---\nbody", "index.html");
        page.render(&mut layouts(), &json!({})).unwrap();
        assert_eq!(page.output(), Some("[body]"));
    }

    #[test]
    fn test_render_error_names_page() {
        let dir = TempDir::new().unwrap();
        let mut page = page_from(&dir, "{{ page.missing.field }}", "atom.xml");

        let err = page.render(&mut layouts(), &json!({})).unwrap_err();
        assert!(matches!(err, PageError::Template(ref url, _) if url == "/categories/rust/atom.xml"));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let mut page = page_from(&dir, "hello", "index.html");
        page.render(&mut layouts(), &json!({})).unwrap();

        let dest = dir.path().join("_site");
        let written = page.write(&dest).unwrap();

        assert_eq!(written, dest.join("categories/rust/index.html"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "hello");
    }
}
