use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::front_matter::{self, Data, FrontMatterError};
use crate::site::{Categories, Post};
use crate::slug::slugify;

#[derive(Debug)]
pub enum ScanError {
    IoError(std::io::Error),
    FrontMatter(PathBuf, FrontMatterError),
    InvalidPath(PathBuf),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::IoError(err)
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::IoError(e) => write!(f, "IO error: {}", e),
            ScanError::FrontMatter(p, e) => write!(f, "{}: {}", p.display(), e),
            ScanError::InvalidPath(p) => write!(f, "Invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for ScanError {}

/// Reads posts from `<source>/_posts`.
pub struct PostScanner {
    source_dir: PathBuf,
}

impl PostScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Scan all posts, newest first.
    pub fn scan(&self) -> Result<Vec<Post>, ScanError> {
        let posts_dir = self.source_dir.join("_posts");
        debug!("Scanning posts in {}", posts_dir.display());

        if !posts_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for path in get_all_post_files(&posts_dir) {
            if let Some(post) = self.scan_post(path)? {
                posts.push(post);
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
        Ok(posts)
    }

    fn scan_post(&self, path: PathBuf) -> Result<Option<Post>, ScanError> {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            return Err(ScanError::InvalidPath(path));
        };

        let source = std::fs::read_to_string(&path)?;
        let (data, body) = front_matter::split(&source)
            .map_err(|e| ScanError::FrontMatter(path.clone(), e))?;

        if data.get("published").and_then(Value::as_bool) == Some(false) {
            debug!("Skipping unpublished post {}", path.display());
            return Ok(None);
        }

        let (file_date, file_slug) = split_dated_name(&stem);
        let date = data
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_date)
            .or(file_date);
        let Some(date) = date else {
            warn!("Skipping {}: no date in front matter or file name", path.display());
            return Ok(None);
        };

        let title = data
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| file_slug.to_string());

        let url = format!("/{}/{}.html", date.format("%Y/%m/%d"), slugify(file_slug));

        Ok(Some(Post {
            title,
            url,
            date,
            categories: categories_of(&data),
            excerpt: excerpt_of(&data, body),
            path,
        }))
    }
}

/// Group posts under each category they belong to.
pub fn group_by_category(posts: &[Post]) -> Categories {
    let mut categories = Categories::new();
    for post in posts {
        for category in &post.categories {
            categories.entry(category.clone()).or_default().push(post.clone());
        }
    }
    categories
}

fn get_all_post_files<P: AsRef<Path>>(path: P) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for p in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|p| {
            p.path().is_file()
                && p.path()
                    .extension()
                    .map(|ext| ext == "md" || ext == "markdown")
                    .unwrap_or(false)
        })
    {
        paths.push(p.path().to_path_buf());
    }

    paths
}

/// `2024-03-01-hello-world` -> (2024-03-01, "hello-world")
fn split_dated_name(stem: &str) -> (Option<NaiveDate>, &str) {
    if stem.len() > 11 && stem.is_char_boundary(11) && stem.as_bytes()[10] == b'-' {
        if let Some(date) = parse_date(&stem[..10]) {
            return (Some(date), &stem[11..]);
        }
    }
    (None, stem)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn categories_of(data: &Data) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    match data.get("categories") {
        Some(Value::Array(items)) => categories.extend(
            items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }),
        ),
        Some(Value::String(s)) => categories.extend(s.split_whitespace().map(str::to_string)),
        _ => {}
    }
    if let Some(category) = data.get("category").and_then(Value::as_str) {
        categories.push(category.to_string());
    }

    let mut seen = std::collections::HashSet::new();
    categories.retain(|c| !c.is_empty() && seen.insert(c.clone()));
    categories
}

fn excerpt_of(data: &Data, body: &str) -> Option<String> {
    if let Some(excerpt) = data.get("excerpt").and_then(Value::as_str) {
        return Some(excerpt.to_string());
    }

    body.split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(str::to_string)
}
