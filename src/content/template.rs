//! Template-expression resolution
//!
//! Content bodies may embed Jekyll-style placeholders such as
//! `{{ page.date | date: "%Y.%m.%d" }}`. The resolver substitutes them
//! against the parsed front matter before Markdown conversion. The filter
//! vocabulary is deliberately minimal (`date`, `default`, `relative_url`);
//! unknown filters are passthrough and `{{ site.* }}` always resolves to
//! an empty string. Any other root namespace is left as literal text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::FrontMatter;
use crate::helpers;

lazy_static! {
    /// `{{ page.<key> }}` with an optional trailing filter chain.
    static ref PAGE_EXPR_RE: Regex =
        Regex::new(r"\{\{\s*page\.(\w+)(?:\s*\|\s*([^}]+))?\s*\}\}").unwrap();
    /// `{{ site.* }}` placeholders; the static site has no site object.
    static ref SITE_EXPR_RE: Regex = Regex::new(r"\{\{\s*site\.[^}]*\}\}").unwrap();
    static ref DATE_FILTER_RE: Regex = Regex::new(r#"^date:\s*"([^"]+)""#).unwrap();
    static ref DEFAULT_FILTER_RE: Regex = Regex::new(r#"^default:\s*"([^"]*)""#).unwrap();
}

/// Replace every template expression in `body` with its resolved value.
pub fn resolve(body: &str, front_matter: &FrontMatter, base_path: &str) -> String {
    let resolved = PAGE_EXPR_RE.replace_all(body, |caps: &Captures| {
        let key = &caps[1];
        let value = front_matter.resolve(key);

        match caps.get(2) {
            Some(filters) => apply_filters(value, filters.as_str(), base_path),
            None => value,
        }
    });

    SITE_EXPR_RE.replace_all(&resolved, "").into_owned()
}

/// Apply a `|`-separated filter chain, left to right.
fn apply_filters(value: String, filters: &str, base_path: &str) -> String {
    let mut value = value;

    for filter in filters.split('|').map(str::trim) {
        if let Some(caps) = DATE_FILTER_RE.captures(filter) {
            value = helpers::format_date(&value, &caps[1]);
        } else if let Some(caps) = DEFAULT_FILTER_RE.captures(filter) {
            if value.is_empty() {
                value = caps[1].to_string();
            }
        } else if filter == "relative_url" {
            value = helpers::prepend_base(base_path, &value);
        } else if !filter.is_empty() {
            // Unknown filter: passthrough
            tracing::debug!("ignoring unsupported template filter: {:?}", filter);
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(source: &str) -> FrontMatter {
        FrontMatter::parse(source).0
    }

    #[test]
    fn test_plain_substitution() {
        let fm = fm("---\ntitle: Lab News\n---\nx");
        assert_eq!(
            resolve("# {{ page.title }}", &fm, ""),
            "# Lab News"
        );
    }

    #[test]
    fn test_missing_key_resolves_empty() {
        let fm = FrontMatter::default();
        assert_eq!(resolve("[{{ page.author }}]", &fm, ""), "[]");
    }

    #[test]
    fn test_list_joined_before_filters() {
        let fm = fm("---\ntag: [seminar, finance]\n---\nx");
        assert_eq!(resolve("{{ page.tag }}", &fm, ""), "seminar, finance");
    }

    #[test]
    fn test_date_filter() {
        let fm = fm("---\ndate: 2025-06-14\n---\nx");
        assert_eq!(
            resolve(r#"{{ page.date | date: "%Y.%m.%d" }}"#, &fm, ""),
            "2025.06.14"
        );
    }

    #[test]
    fn test_date_filter_unparsable_passthrough() {
        let fm = fm("---\ndate: soon\n---\nx");
        assert_eq!(
            resolve(r#"{{ page.date | date: "%Y.%m.%d" }}"#, &fm, ""),
            "soon"
        );
    }

    #[test]
    fn test_default_filter() {
        let fm = FrontMatter::default();
        assert_eq!(
            resolve(r#"{{ page.title | default: "Untitled" }}"#, &fm, ""),
            "Untitled"
        );
    }

    #[test]
    fn test_default_filter_not_applied_when_present() {
        let fm = fm("---\ntitle: Real\n---\nx");
        assert_eq!(
            resolve(r#"{{ page.title | default: "Untitled" }}"#, &fm, ""),
            "Real"
        );
    }

    #[test]
    fn test_relative_url_filter() {
        let fm = fm("---\nthumb: /thumb.png\n---\nx");
        assert_eq!(
            resolve("{{ page.thumb | relative_url }}", &fm, "/website/data"),
            "/website/data/thumb.png"
        );
    }

    #[test]
    fn test_relative_url_without_base() {
        let fm = fm("---\nthumb: /thumb.png\n---\nx");
        assert_eq!(resolve("{{ page.thumb | relative_url }}", &fm, ""), "/thumb.png");
    }

    #[test]
    fn test_filter_chain_order() {
        let fm = FrontMatter::default();
        assert_eq!(
            resolve(
                r#"{{ page.date | date: "%Y" | default: "n/a" }}"#,
                &fm,
                ""
            ),
            "n/a"
        );
    }

    #[test]
    fn test_unknown_filter_passthrough() {
        let fm = fm("---\ntitle: X\n---\nx");
        assert_eq!(resolve("{{ page.title | upcase }}", &fm, ""), "X");
    }

    #[test]
    fn test_site_expressions_removed() {
        let fm = FrontMatter::default();
        assert_eq!(resolve("a{{ site.baseurl }}b", &fm, ""), "ab");
    }

    #[test]
    fn test_other_namespaces_left_alone() {
        let fm = FrontMatter::default();
        assert_eq!(
            resolve("{{ post.title }} stays", &fm, ""),
            "{{ post.title }} stays"
        );
    }
}
