//! Content module - front-matter parsing, template resolution and
//! Markdown conversion for lab-website content files.

mod frontmatter;
pub mod loader;
mod markdown;
mod template;

pub use frontmatter::{FrontMatter, Value};
pub use markdown::markdown_to_html;
pub use template::resolve as resolve_templates;
