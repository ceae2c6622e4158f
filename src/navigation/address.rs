use url::Url;

/// Turn address-bar input into a loadable URL. Input without a scheme
/// is treated as an https address. Returns `None` for blank input.
pub fn normalize_address(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let has_scheme = trimmed.contains("://")
        || ["about:", "data:", "file:"]
            .iter()
            .any(|prefix| trimmed.starts_with(prefix));

    if has_scheme {
        return Some(trimmed.to_string());
    }

    let candidate = format!("https://{}", trimmed);
    match Url::parse(&candidate) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Some(candidate),
    }
}

/// Resolve a link target against the page it was found on.
/// Absolute targets and targets that cannot be joined pass through.
pub fn resolve_href(base: Option<&str>, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}
