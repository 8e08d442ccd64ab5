use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::config::CategoryConfig;
use crate::page::Renderable;
use crate::template::Layouts;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Post {
    pub title: String,
    pub url: String,
    pub date: NaiveDate,
    pub categories: Vec<String>,
    pub excerpt: Option<String>,
    #[serde(skip)]
    pub path: PathBuf,
}

pub type Categories = BTreeMap<String, Vec<Post>>;

/// What the category generator needs from the site it runs inside.
pub trait Site {
    type Page: Renderable;

    /// Posts grouped by category name
    fn categories(&self) -> &Categories;

    /// Category options shared by generated paths and the link filters
    fn category_config(&self) -> &CategoryConfig;

    fn layouts(&self) -> &Layouts;

    fn layouts_mut(&mut self) -> &mut Layouts;

    /// Global data every page is rendered with
    fn payload(&self) -> Value;

    fn source(&self) -> &Path;

    fn dest(&self) -> &Path;

    /// Record a page that was generated and written
    fn register_page(&mut self, page: Self::Page);
}
