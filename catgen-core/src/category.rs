//! The two pages generated for every category: an index and an Atom feed.

use std::path::Path;

use serde_json::Value;

use crate::config::CategoryConfig;
use crate::page::{PageError, Renderable};

pub const INDEX_LAYOUT: &str = "category_index";
pub const INDEX_TEMPLATE: &str = "_layouts/category_index.html";
pub const FEED_TEMPLATE: &str = "_includes/custom/category_feed.xml";

/// Listing page for `category`, written to `<dir>/index.html`.
pub fn index_page<P: Renderable>(
    source: &Path,
    dir: &str,
    category: &str,
    config: &CategoryConfig,
) -> Result<P, PageError> {
    category_page(&source.join(INDEX_TEMPLATE), "index.html", dir, category, config)
}

/// Atom feed for `category`, written to `<dir>/atom.xml`.
pub fn feed_page<P: Renderable>(
    source: &Path,
    dir: &str,
    category: &str,
    config: &CategoryConfig,
) -> Result<P, PageError> {
    let name = "atom.xml";
    let mut feed: P = category_page(&source.join(FEED_TEMPLATE), name, dir, category, config)?;

    if feed.should_render() {
        feed.set_data("feed_url", Value::String(format!("{}/{}", dir, name)));
    }

    Ok(feed)
}

fn category_page<P: Renderable>(
    template_path: &Path,
    name: &str,
    dir: &str,
    category: &str,
    config: &CategoryConfig,
) -> Result<P, PageError> {
    let mut page = P::from_template(template_path, name, dir)?;

    if page.should_render() {
        page.set_data("category", Value::String(category.to_string()));
        page.set_data(
            "title",
            Value::String(format!("{}{}", config.category_title_prefix, category)),
        );
        page.set_data(
            "description",
            Value::String(format!("{}{}", config.category_meta_description_prefix, category)),
        );
    }

    Ok(page)
}
