use std::collections::HashMap;

use tera::{Tera, Value, try_get_value};

use crate::slug::category_dir;

/// Render a category as an `<a>` link to its index page.
pub fn category_link(base_dir: Option<&str>, category: &str) -> String {
    format!(
        "<a class=\"category\" href=\"/{}/\">{}</a>",
        category_dir(base_dir, category),
        category
    )
}

/// Render categories as comma separated links, sorted by name.
///
/// Sorting happens on a copy; the caller's ordering is untouched.
pub fn category_links<S: AsRef<str>>(base_dir: Option<&str>, categories: &[S]) -> String {
    let mut sorted: Vec<&str> = categories.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    sorted
        .into_iter()
        .map(|category| category_link(base_dir, category))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Register `category_link` and `category_links` as template filters.
pub fn register(tera: &mut Tera, base_dir: &str) {
    let dir = base_dir.to_string();
    tera.register_filter(
        "category_link",
        move |value: &Value, _: &HashMap<String, Value>| {
            let category = try_get_value!("category_link", "value", String, value);
            Ok(Value::String(category_link(Some(&dir), &category)))
        },
    );

    let dir = base_dir.to_string();
    tera.register_filter(
        "category_links",
        move |value: &Value, _: &HashMap<String, Value>| {
            let categories = try_get_value!("category_links", "value", Vec<String>, value);
            Ok(Value::String(category_links(Some(&dir), &categories)))
        },
    );
}
