use url::Url;

/// Resolves a raw `href` against the page it was found on
///
/// Returns None if the link should be skipped:
/// - empty or fragment-only hrefs (same page anchors)
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that do not resolve to a valid URL
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use sitegrep::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/docs/index.html").unwrap();
/// let link = resolve_link("guide", &base).unwrap();
/// assert_eq!(link.as_str(), "http://a.test/docs/guide");
/// assert!(resolve_link("mailto:me@a.test", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
