use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::config::{CategoryConfig, Config};
use crate::page::Page;
use crate::scanner::group_by_category;
use crate::site::{Categories, Post, Site};
use crate::template::{Layouts, TemplateError};

#[derive(Debug)]
pub enum BuildError {
    MissingSourceDir,
    TemplateError(TemplateError),
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        BuildError::TemplateError(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::MissingSourceDir => write!(f, "Source directory not specified"),
            BuildError::TemplateError(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

pub struct SiteBuilder {
    source_dir: Option<PathBuf>,
    dest_dir: PathBuf,
    config: Config,
    posts: Vec<Post>,
    layouts: Option<Layouts>,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source_dir: None,
            dest_dir: PathBuf::from("./_site"),
            config: Config::default(),
            posts: Vec::new(),
            layouts: None,
        }
    }

    // Required configuration
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn dest_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dest_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn add_post(mut self, post: Post) -> Self {
        self.posts.push(post);
        self
    }

    pub fn add_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts.extend(posts);
        self
    }

    /// Use these layouts instead of loading `<source>/_layouts`
    pub fn layouts(mut self, layouts: Layouts) -> Self {
        self.layouts = Some(layouts);
        self
    }

    pub fn build(self) -> Result<LocalSite, BuildError> {
        let source_dir = self.source_dir.ok_or(BuildError::MissingSourceDir)?;

        let layouts = match self.layouts {
            Some(mut layouts) => {
                layouts.apply_config(&self.config.categories);
                layouts
            }
            None => Layouts::load(source_dir.join("_layouts"), &self.config.categories)?,
        };

        Ok(LocalSite {
            categories: group_by_category(&self.posts),
            posts: self.posts,
            layouts,
            config: self.config,
            source_dir,
            dest_dir: self.dest_dir,
            pages: Vec::new(),
            time: Utc::now(),
        })
    }
}

/// A site read from a source directory on disk.
pub struct LocalSite {
    posts: Vec<Post>,
    categories: Categories,
    layouts: Layouts,
    config: Config,
    source_dir: PathBuf,
    dest_dir: PathBuf,
    pages: Vec<Page>,
    time: DateTime<Utc>,
}

impl LocalSite {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pages generated so far
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

impl Site for LocalSite {
    type Page = Page;

    fn categories(&self) -> &Categories {
        &self.categories
    }

    fn category_config(&self) -> &CategoryConfig {
        &self.config.categories
    }

    fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    fn layouts_mut(&mut self) -> &mut Layouts {
        &mut self.layouts
    }

    fn payload(&self) -> Value {
        let site = &self.config.site;
        json!({
            "site": {
                "title": site.title,
                "description": site.description,
                "url": site.url.as_deref().unwrap_or("").trim_end_matches('/'),
                "author": site.author,
                "time": self.time.to_rfc3339(),
                "category_dir": self.config.categories.category_dir,
                "categories": self.categories,
                "posts": self.posts,
            }
        })
    }

    fn source(&self) -> &Path {
        &self.source_dir
    }

    fn dest(&self) -> &Path {
        &self.dest_dir
    }

    fn register_page(&mut self, page: Page) {
        self.pages.push(page);
    }
}
