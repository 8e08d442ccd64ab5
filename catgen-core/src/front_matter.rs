//! YAML front matter at the top of layouts, includes and posts.

use serde_json::{Map, Value};

pub type Data = Map<String, Value>;

#[derive(Debug)]
pub enum FrontMatterError {
    Yaml(serde_yaml::Error),
    NotAMapping,
}

impl From<serde_yaml::Error> for FrontMatterError {
    fn from(err: serde_yaml::Error) -> Self {
        FrontMatterError::Yaml(err)
    }
}

impl std::fmt::Display for FrontMatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontMatterError::Yaml(e) => write!(f, "Invalid front matter: {}", e),
            FrontMatterError::NotAMapping => write!(f, "Front matter must be a mapping"),
        }
    }
}

impl std::error::Error for FrontMatterError {}

/// Split a document into its front matter data and body.
///
/// The block starts with a `---` line at the very top and ends at the next
/// `---` line. Documents without a complete block come back untouched with
/// empty data.
pub fn split(source: &str) -> Result<(Data, &str), FrontMatterError> {
    let Some(rest) = source.strip_prefix("---") else {
        return Ok((Data::new(), source));
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return Ok((Data::new(), source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let data = parse(&rest[..offset])?;
            return Ok((data, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Ok((Data::new(), source))
}

fn parse(yaml: &str) -> Result<Data, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Data::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Data::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_with_front_matter() {
        let (data, body) = split("---\nlayout: default\ntags: [a, b]\n---\n<h1>Hi</h1>\n").unwrap();

        assert_eq!(data.get("layout"), Some(&json!("default")));
        assert_eq!(data.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(body, "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_split_crlf() {
        let (data, body) = split("---\r\ntitle: Windows\r\n---\r\nbody").unwrap();
        assert_eq!(data.get("title"), Some(&json!("Windows")));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_without_front_matter() {
        let (data, body) = split("<p>plain</p>").unwrap();
        assert!(data.is_empty());
        assert_eq!(body, "<p>plain</p>");

        let (data, body) = split("---\nnever closed").unwrap();
        assert!(data.is_empty());
        assert_eq!(body, "---\nnever closed");
    }

    #[test]
    fn test_empty_block() {
        let (data, body) = split("---\n---\nbody").unwrap();
        assert!(data.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_rejects_non_mapping() {
        assert!(matches!(
            split("---\n- a\n- b\n---\n"),
            Err(FrontMatterError::NotAMapping)
        ));
        assert!(matches!(
            split("---\nkey: [unclosed\n---\n"),
            Err(FrontMatterError::Yaml(_))
        ));
    }
}
