//! URL helper functions
//!
//! Content files reference images relative to the directory they were
//! fetched from, so the renderer rewrites asset URLs against a caller
//! supplied base path (e.g. `/website/data/gallery/item1`).

/// True when a URL should never be rewritten.
pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:")
}

/// Rewrite an asset URL against a base path.
///
/// # Examples
/// ```ignore
/// resolve_asset_url("/data/gallery/item1", "photo.png") // -> "/data/gallery/item1/photo.png"
/// resolve_asset_url("/data/gallery/item1", "/shared/logo.png") // -> "/data/gallery/item1/shared/logo.png"
/// resolve_asset_url("/data", "https://cdn.example.com/a.png") // -> unchanged
/// ```
pub fn resolve_asset_url(base_path: &str, url: &str) -> String {
    if is_absolute_url(url) || base_path.is_empty() {
        return url.to_string();
    }

    let base = base_path.trim_end_matches('/');

    if url.starts_with('/') {
        return format!("{}{}", base, url);
    }

    // `./photo.png` means the same thing as `photo.png`
    let rest = url.strip_prefix("./").unwrap_or(url);
    format!("{}/{}", base, rest)
}

/// Prepend a base path to a value, as the `relative_url` filter does.
///
/// Direct concatenation on purpose: content authors write values like
/// `/assets/cv.pdf` that already carry their leading slash.
pub fn prepend_base(base_path: &str, value: &str) -> String {
    if base_path.is_empty() || value.is_empty() {
        return value.to_string();
    }
    format!("{}{}", base_path, value)
}
