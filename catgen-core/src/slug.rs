use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_CATEGORY_DIR: &str = "categories";

// Unicode-aware: accented letters and CJK count as word characters.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_|\W").unwrap());
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Normalize a category label into a URL-safe path segment.
///
/// Every underscore and non-word character becomes a hyphen, runs of hyphens
/// collapse into one, and the result is lowercased. Leading and trailing
/// hyphens are left alone, so `"C++"` becomes `"c-"`.
pub fn slugify(category: &str) -> String {
    let replaced = NON_WORD.replace_all(category, "-");
    HYPHEN_RUN.replace_all(&replaced, "-").to_lowercase()
}

/// Directory (relative to the output root) that holds a category's pages.
///
/// `base_dir` falls back to `categories` and has its outermost slashes
/// stripped before the slug is joined onto it.
pub fn category_dir(base_dir: Option<&str>, category: &str) -> String {
    let base = base_dir.unwrap_or(DEFAULT_CATEGORY_DIR).trim_matches('/');
    let slug = slugify(category);

    if base.is_empty() {
        slug
    } else {
        format!("{}/{}", base, slug)
    }
}
