use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::category::{self, INDEX_LAYOUT};
use crate::page::{PageError, Renderable};
use crate::site::Site;
use crate::slug::category_dir;

#[derive(Debug)]
pub enum GenerateError {
    MissingLayout(String),
    Page(PageError),
}

impl From<PageError> for GenerateError {
    fn from(err: PageError) -> Self {
        GenerateError::Page(err)
    }
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::MissingLayout(name) => write!(f, "No '{}' layout found.", name),
            GenerateError::Page(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Generate the index page and feed for every category of the site.
///
/// Fails before writing anything if the site has no `category_index`
/// layout. Returns the number of pages written.
pub fn write_category_indexes<S: Site>(site: &mut S) -> Result<usize, GenerateError> {
    if !site.layouts().contains(INDEX_LAYOUT) {
        return Err(GenerateError::MissingLayout(INDEX_LAYOUT.to_string()));
    }

    let payload = site.payload();
    let categories: Vec<String> = site.categories().keys().cloned().collect();
    let base_dir = site.category_config().category_dir.clone();

    let mut targets = HashMap::new();
    let mut written = 0;
    for category in &categories {
        let target_dir = category_dir(Some(&base_dir), category);
        if let Some(previous) = targets.insert(target_dir.clone(), category) {
            warn!(
                "Categories '{}' and '{}' both map to {}, the later one overwrites the earlier",
                previous, category, target_dir
            );
        }
        written += write_category_index(site, category, &payload)?;
    }

    Ok(written)
}

/// Render and write the pages for a single category. Pages whose template
/// is missing are skipped.
pub fn write_category_index<S: Site>(
    site: &mut S,
    category: &str,
    payload: &Value,
) -> Result<usize, GenerateError> {
    let config = site.category_config().clone();
    let target_dir = category_dir(Some(&config.category_dir), category);
    let posts = json!(site.categories().get(category).cloned().unwrap_or_default());

    let index: S::Page = category::index_page(site.source(), &target_dir, category, &config)?;
    let feed: S::Page = category::feed_page(site.source(), &target_dir, category, &config)?;

    let mut written = 0;
    for mut page in [index, feed] {
        if !page.should_render() {
            debug!("No template for {}, skipping", page.url());
            continue;
        }

        page.set_data("posts", posts.clone());
        page.render(site.layouts_mut(), payload)?;
        let path = page.write(site.dest())?;
        info!("Generated {} ({})", page.url(), path.display());

        // Keep track of the page so the host does not treat it as stale output
        site.register_page(page);
        written += 1;
    }

    Ok(written)
}
