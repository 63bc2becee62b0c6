//! Helper functions shared by the template resolver and the Markdown
//! converter: date formatting and asset-URL rewriting.

mod date;
mod url;

pub use date::*;
pub use url::*;
