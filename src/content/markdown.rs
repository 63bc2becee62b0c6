//! Markdown rendering
//!
//! A lenient, single-pass, regex-driven converter for the subset of
//! Markdown the lab's content files actually use. This is deliberately
//! not a conformant CommonMark implementation: unsupported constructs
//! pass through as literal text, and malformed input (an unterminated
//! code fence, unbalanced emphasis markers) degrades to passthrough
//! instead of failing the render.
//!
//! The pipeline order is a contract. Code spans are lifted out first so
//! nothing inside them is ever transformed; lists are built before bold
//! and italic so markers are not mistaken for emphasis; bold runs before
//! italic so `**text**` is never split as `*te` + `xt*`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::helpers;

// Placeholder tokens use a NUL sentinel so author text can never collide
// with them.
const CODE_BLOCK_PREFIX: &str = "\u{0}CODE_BLOCK_";
const INLINE_CODE_PREFIX: &str = "\u{0}INLINE_CODE_";

lazy_static! {
    static ref CODE_BLOCK_RE: Regex =
        Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").unwrap();
    static ref INLINE_CODE_RE: Regex = Regex::new(r"`([^`\n]+)`").unwrap();
    static ref IMAGE_RE: Regex =
        Regex::new(r#"!\[([^\]]*)\]\(\s*([^)\s"]+)(?:\s+"([^"]*)")?\s*\)"#).unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
    static ref HEADER_RE: Regex = Regex::new(r"(?m)^(#{1,4})[ \t]+(.+)$").unwrap();
    static ref HR_RE: Regex = Regex::new(r"(?m)^[ \t]*(-{3,}|\*{3,})[ \t]*$").unwrap();
    static ref ORDERED_ITEM_RE: Regex = Regex::new(r"^\d+\.\s+(.*)$").unwrap();
    static ref BOLD_STAR_RE: Regex = Regex::new(r"\*\*([^\n]+?)\*\*").unwrap();
    static ref BOLD_UNDERSCORE_RE: Regex = Regex::new(r"__([^\n]+?)__").unwrap();
    static ref ITALIC_STAR_RE: Regex = Regex::new(r"\*([^*\n]+)\*").unwrap();
    static ref ITALIC_UNDERSCORE_RE: Regex = Regex::new(r"\b_([^_\n]+)_\b").unwrap();
    static ref PARAGRAPH_SPLIT_RE: Regex = Regex::new(r"\n{2,}").unwrap();
}

/// Chunks starting with one of these are already block-level markup and
/// must not be wrapped in `<p>` tags.
const BLOCK_PREFIXES: [&str; 9] = [
    "<h", "<ul", "<ol", "<blockquote", "<pre", "<hr", "<img", "<p", "<li",
];

/// Convert a (template-resolved) Markdown string to an HTML fragment.
///
/// `base_path` rewrites relative image URLs; pass an empty string to
/// leave them untouched. Never fails for any input string.
pub fn markdown_to_html(text: &str, base_path: &str) -> String {
    let mut code_blocks: Vec<String> = Vec::new();
    let mut inline_codes: Vec<String> = Vec::new();

    let text = extract_code_blocks(text, &mut code_blocks);
    let text = extract_inline_code(&text, &mut inline_codes);
    let text = convert_images(&text, base_path);
    let text = convert_links(&text);
    let text = convert_headers(&text);
    let text = convert_rules(&text);
    let text = convert_lists(&text);
    let text = convert_emphasis(&text);
    let text = convert_blockquotes(&text);
    let html = wrap_paragraphs(&text);
    restore_code(html, &code_blocks, &inline_codes)
}

/// Lift fenced code blocks out into placeholders.
///
/// An unterminated fence does not match and passes through as text.
fn extract_code_blocks(text: &str, store: &mut Vec<String>) -> String {
    CODE_BLOCK_RE
        .replace_all(text, |caps: &Captures| {
            let lang = caps[1].trim();
            let code = escape_code(caps[2].trim());
            let html = if lang.is_empty() {
                format!("<pre><code>{}</code></pre>", code)
            } else {
                format!(r#"<pre><code class="language-{}">{}</code></pre>"#, lang, code)
            };
            store.push(html);
            format!("{}{}\u{0}", CODE_BLOCK_PREFIX, store.len() - 1)
        })
        .into_owned()
}

fn extract_inline_code(text: &str, store: &mut Vec<String>) -> String {
    INLINE_CODE_RE
        .replace_all(text, |caps: &Captures| {
            store.push(format!("<code>{}</code>", escape_code(&caps[1])));
            format!("{}{}\u{0}", INLINE_CODE_PREFIX, store.len() - 1)
        })
        .into_owned()
}

fn convert_images(text: &str, base_path: &str) -> String {
    IMAGE_RE
        .replace_all(text, |caps: &Captures| {
            let alt = &caps[1];
            let src = helpers::resolve_asset_url(base_path, &caps[2]);
            match caps.get(3) {
                Some(title) => format!(
                    r#"<img src="{}" alt="{}" title="{}" />"#,
                    src,
                    alt,
                    title.as_str()
                ),
                None => format!(r#"<img src="{}" alt="{}" />"#, src, alt),
            }
        })
        .into_owned()
}

/// Links always open in a new tab; the site treats every link target as
/// external navigation.
fn convert_links(text: &str) -> String {
    LINK_RE
        .replace_all(
            text,
            r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
        )
        .into_owned()
}

fn convert_headers(text: &str) -> String {
    HEADER_RE
        .replace_all(text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{}>{}</h{}>", level, caps[2].trim(), level)
        })
        .into_owned()
}

fn convert_rules(text: &str) -> String {
    HR_RE.replace_all(text, "<hr />").into_owned()
}

#[derive(PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

/// Group contiguous runs of list-item lines into `<ul>` / `<ol>` blocks.
///
/// A non-matching line closes the open block. Nesting is not supported.
fn convert_lists(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut kind: Option<ListKind> = None;

    fn flush(out: &mut Vec<String>, items: &mut Vec<String>, kind: &mut Option<ListKind>) {
        if items.is_empty() {
            return;
        }
        let tag = match kind {
            Some(ListKind::Ordered) => "ol",
            _ => "ul",
        };
        let body: String = items
            .drain(..)
            .map(|item| format!("<li>{}</li>\n", item))
            .collect();
        out.push(format!("<{}>\n{}</{}>", tag, body, tag));
        *kind = None;
    }

    for line in text.lines() {
        if let Some(item) = line.strip_prefix("- ") {
            if kind == Some(ListKind::Ordered) {
                flush(&mut out, &mut items, &mut kind);
            }
            kind = Some(ListKind::Unordered);
            items.push(item.trim().to_string());
        } else if let Some(caps) = ORDERED_ITEM_RE.captures(line) {
            if kind == Some(ListKind::Unordered) {
                flush(&mut out, &mut items, &mut kind);
            }
            kind = Some(ListKind::Ordered);
            items.push(caps[1].trim().to_string());
        } else {
            flush(&mut out, &mut items, &mut kind);
            out.push(line.to_string());
        }
    }
    flush(&mut out, &mut items, &mut kind);

    out.join("\n")
}

/// Bold first, then italic, so `**text**` is never split mid-marker.
fn convert_emphasis(text: &str) -> String {
    let text = BOLD_STAR_RE.replace_all(text, "<strong>$1</strong>");
    let text = BOLD_UNDERSCORE_RE.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC_STAR_RE.replace_all(&text, "<em>$1</em>");
    ITALIC_UNDERSCORE_RE
        .replace_all(&text, "<em>$1</em>")
        .into_owned()
}

/// Join consecutive `> ` lines into a single `<blockquote>`.
fn convert_blockquotes(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut quote: Vec<String> = Vec::new();

    fn flush(out: &mut Vec<String>, quote: &mut Vec<String>) {
        if quote.is_empty() {
            return;
        }
        out.push(format!("<blockquote>{}</blockquote>", quote.join("<br />")));
        quote.clear();
    }

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("> ") {
            quote.push(rest.to_string());
        } else {
            flush(&mut out, &mut quote);
            out.push(line.to_string());
        }
    }
    flush(&mut out, &mut quote);

    out.join("\n")
}

/// Wrap the remaining plain-text chunks in `<p>` tags.
fn wrap_paragraphs(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for chunk in PARAGRAPH_SPLIT_RE.split(text) {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        let is_block = chunk.starts_with(CODE_BLOCK_PREFIX)
            || BLOCK_PREFIXES.iter().any(|p| chunk.starts_with(p));

        if is_block {
            out.push(chunk.to_string());
        } else {
            out.push(format!("<p>{}</p>", chunk.replace('\n', "<br />")));
        }
    }

    out.join("\n")
}

/// Substitute placeholders back with their protected HTML.
fn restore_code(mut html: String, code_blocks: &[String], inline_codes: &[String]) -> String {
    for (i, block) in code_blocks.iter().enumerate() {
        html = html.replace(&format!("{}{}\u{0}", CODE_BLOCK_PREFIX, i), block);
    }
    for (i, code) in inline_codes.iter().enumerate() {
        html = html.replace(&format!("{}{}\u{0}", INLINE_CODE_PREFIX, i), code);
    }
    html
}

/// Entity-escape code span contents; everything else is trusted markup.
fn escape_code(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let html = markdown_to_html("# One\n\n## Two\n\n#### Four", "");
        assert!(html.contains("<h1>One</h1>"));
        assert!(html.contains("<h2>Two</h2>"));
        assert!(html.contains("<h4>Four</h4>"));
    }

    #[test]
    fn test_header_only_at_line_start() {
        let html = markdown_to_html("not a # header", "");
        assert!(!html.contains("<h1>"));
        assert!(html.contains("<p>not a # header</p>"));
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        let html = markdown_to_html("first line\nsecond line\n\nnext para", "");
        assert!(html.contains("<p>first line<br />second line</p>"));
        assert!(html.contains("<p>next para</p>"));
    }

    #[test]
    fn test_bold_wraps_italic() {
        let html = markdown_to_html("**bold *italic* text**", "");
        assert!(html.contains("<strong>bold <em>italic</em> text</strong>"));
    }

    #[test]
    fn test_underscore_emphasis_word_boundaries() {
        let html = markdown_to_html("use _emphasis_ but not snake_case_name", "");
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("snake_case_name"));
    }

    #[test]
    fn test_unordered_list_boundary() {
        let html = markdown_to_html("- a\n- b\n\nNot a list", "");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("<li>a</li>"));
        assert!(html.contains("<li>b</li>"));
        assert!(html.contains("<p>Not a list</p>"));
    }

    #[test]
    fn test_ordered_list() {
        let html = markdown_to_html("1. first\n2. second\n3. third", "");
        assert_eq!(html.matches("<ol>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
        assert!(html.contains("<li>second</li>"));
    }

    #[test]
    fn test_adjacent_lists_of_different_kind() {
        let html = markdown_to_html("- bullet\n1. number", "");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<ol>").count(), 1);
    }

    #[test]
    fn test_list_items_keep_inline_markup() {
        let html = markdown_to_html("- **bold** item\n- [link](https://x.test)", "");
        assert!(html.contains("<li><strong>bold</strong> item</li>"));
        assert!(html.contains(r#"href="https://x.test""#));
    }

    #[test]
    fn test_links_open_in_new_tab() {
        let html = markdown_to_html("[lab site](https://example.edu)", "");
        assert!(html.contains(
            r#"<a href="https://example.edu" target="_blank" rel="noopener noreferrer">lab site</a>"#
        ));
    }

    #[test]
    fn test_image_with_base_path() {
        let html = markdown_to_html("![x](photo.png)", "/website/data/gallery/item1");
        assert!(html.contains(r#"src="/website/data/gallery/item1/photo.png""#));
        assert!(html.contains(r#"alt="x""#));
    }

    #[test]
    fn test_image_absolute_url_untouched() {
        let html = markdown_to_html("![x](https://cdn.test/a.png)", "/base");
        assert!(html.contains(r#"src="https://cdn.test/a.png""#));
    }

    #[test]
    fn test_image_title_attribute() {
        let html = markdown_to_html(r#"![x](a.png "Lab photo")"#, "");
        assert!(html.contains(r#"title="Lab photo""#));
    }

    #[test]
    fn test_image_not_wrapped_in_paragraph() {
        let html = markdown_to_html("![x](a.png)", "");
        assert!(!html.contains("<p><img"));
    }

    #[test]
    fn test_fenced_code_block() {
        let html = markdown_to_html("```rust\nfn main() {}\n```", "");
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#));
    }

    #[test]
    fn test_fenced_code_shielded_from_transforms() {
        let html = markdown_to_html("```\n**not bold**\n- not a list\n# not a header\n```", "");
        assert!(!html.contains("<strong>"));
        assert!(!html.contains("<li>"));
        assert!(!html.contains("<h1>"));
        assert!(html.contains("**not bold**"));
    }

    #[test]
    fn test_code_entities_escaped() {
        let html = markdown_to_html("```\nVec<String>\n```", "");
        assert!(html.contains("Vec&lt;String&gt;"));
    }

    #[test]
    fn test_inline_code_shielded() {
        let html = markdown_to_html("type `Vec<u8>` and `**raw**` here", "");
        assert!(html.contains("<code>Vec&lt;u8&gt;</code>"));
        assert!(html.contains("<code>**raw**</code>"));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn test_unterminated_fence_passthrough() {
        let html = markdown_to_html("```rust\nfn main() {}", "");
        assert!(!html.contains("<pre>"));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn test_horizontal_rule() {
        let html = markdown_to_html("above\n\n---\n\nbelow", "");
        assert!(html.contains("<hr />"));
    }

    #[test]
    fn test_blockquote_lines_joined() {
        let html = markdown_to_html("> first\n> second", "");
        assert_eq!(html.matches("<blockquote>").count(), 1);
        assert!(html.contains("<blockquote>first<br />second</blockquote>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html("", ""), "");
    }

    #[test]
    fn test_plain_text_survives() {
        let html = markdown_to_html("nothing fancy here", "");
        assert_eq!(html, "<p>nothing fancy here</p>");
    }
}
