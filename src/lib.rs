//! labmark: a lenient content renderer for lab-website pages
//!
//! This crate turns a UTF-8 text blob — an optional `---`-delimited
//! front-matter header followed by Markdown body text — into an HTML
//! fragment ready for injection into a trusted container. Rendering is a
//! pure, synchronous transformation in three stages:
//!
//! 1. front-matter parsing ([`FrontMatter::parse`])
//! 2. template-expression resolution (`{{ page.* }}` placeholders with a
//!    small `date` / `default` / `relative_url` filter vocabulary)
//! 3. lenient regex-driven Markdown conversion ([`markdown_to_html`])
//!
//! Every stage is best-effort: malformed input degrades to passthrough
//! text, and no stage ever returns an error for any input string.

pub mod content;
pub mod helpers;

pub use content::{markdown_to_html, resolve_templates, FrontMatter, Value};

/// The content renderer.
///
/// Carries the base path used to rewrite relative asset URLs and the
/// `relative_url` template filter. Construction is cheap; every call to
/// [`Renderer::render`] is independent and side-effect free.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    base_path: String,
}

/// The result of rendering one content file.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Parsed front-matter header (empty when the file had none).
    pub front_matter: FrontMatter,
    /// The rendered HTML fragment.
    pub html: String,
}

impl Renderer {
    /// Create a renderer with a base path for relative asset URLs.
    ///
    /// Pass an empty string to leave relative URLs untouched.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Render a content source string to an HTML fragment.
    pub fn render(&self, source: &str) -> RenderedPage {
        let (front_matter, body) = FrontMatter::parse(source);
        let resolved = resolve_templates(body, &front_matter, &self.base_path);
        let html = markdown_to_html(&resolved, &self.base_path);

        tracing::debug!(
            front_matter_keys = front_matter.len(),
            html_bytes = html.len(),
            "rendered content"
        );

        RenderedPage { front_matter, html }
    }
}
