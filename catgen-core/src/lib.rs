pub mod builder;
pub mod category;
pub mod config;
pub mod filters;
pub mod front_matter;
pub mod generator;
pub mod page;
pub mod scanner;
pub mod site;
pub mod slug;
pub mod template;

// Re-export main types
pub use builder::{BuildError, LocalSite, SiteBuilder};
pub use filters::{category_link, category_links};
pub use generator::{GenerateError, write_category_index, write_category_indexes};
pub use page::{Page, PageError, Renderable};
pub use scanner::{PostScanner, ScanError};
pub use site::{Post, Site};
pub use slug::{category_dir, slugify};
pub use template::{Layout, Layouts, TemplateError};
