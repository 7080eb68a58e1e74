//! Anchor scanning and URL resolution.
//!
//! A deliberately small HTML reader: it only needs the `href` of every
//! `<a>` tag, so it scans tags case-insensitively instead of building a DOM.

use std::collections::BTreeSet;

/// Absolute URLs of every anchor in `html` whose `href` contains `pattern`.
///
/// Fragment-only links (`#...`) are skipped. Relative links are resolved
/// against `base_url`. The result is de-duplicated and ordered.
pub fn extract_links(html: &str, base_url: &str, pattern: &str) -> BTreeSet<String> {
    anchor_hrefs(html)
        .into_iter()
        .filter(|href| !href.starts_with('#') && href.contains(pattern))
        .filter_map(|href| resolve_href(base_url, &href))
        .collect()
}

/// Raw `href` values of all `<a>` tags, in document order.
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    // ASCII lowering keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut hrefs = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find("<a") {
        let start = from + rel;
        let after_name = start + 2;
        from = after_name;

        // `<abbr>`, `<area>` and friends are not anchors.
        match lower[after_name..].chars().next() {
            Some(c) if c.is_ascii_whitespace() => {}
            _ => continue,
        }
        let Some(end_rel) = lower[after_name..].find('>') else {
            break;
        };
        let end = after_name + end_rel;
        from = end + 1;

        if let Some(href) = attribute_value(&html[after_name..end], &lower[after_name..end], "href") {
            hrefs.push(decode_entities(href.trim()));
        }
    }
    hrefs
}

/// Value of attribute `name` inside a tag body. `lower` is `tag` lowercased.
fn attribute_value<'a>(tag: &'a str, lower: &str, name: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(rel) = lower[search..].find(name) {
        let at = search + rel;
        search = at + name.len();

        // Must start an attribute name, not sit inside another one (`data-href`).
        let boundary = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        if !boundary {
            continue;
        }

        let rest = lower[search..].trim_start();
        if !rest.starts_with('=') {
            continue;
        }
        let value_at = lower.len() - rest.len() + 1;
        let value_at = value_at + (lower[value_at..].len() - lower[value_at..].trim_start().len());

        return match tag[value_at..].chars().next()? {
            quote @ ('"' | '\'') => {
                let body = &tag[value_at + 1..];
                body.find(quote).map(|close| &body[..close])
            }
            _ => {
                let body = &tag[value_at..];
                let close = body.find(|c: char| c.is_ascii_whitespace()).unwrap_or(body.len());
                Some(&body[..close])
            }
        };
    }
    None
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&").replace("&#x2F;", "/").replace("&#47;", "/")
}

/// Resolve `href` against `base_url`.
///
/// Handles absolute, scheme-relative (`//host/x`), origin-relative (`/x`)
/// and document-relative (`x`) forms. Non-HTTP schemes yield `None`.
pub fn resolve_href(base_url: &str, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if has_scheme(href) {
        return None;
    }

    let (scheme, _) = base_url.split_once("://")?;
    if let Some(rest) = href.strip_prefix("//") {
        return Some(format!("{scheme}://{rest}"));
    }

    let origin = origin_of(base_url)?;
    if href.starts_with('/') {
        return Some(format!("{origin}{href}"));
    }

    let base_path = strip_query(&base_url[origin.len()..]);
    let dir = match base_path.rfind('/') {
        Some(i) => &base_path[..=i],
        None => "/",
    };
    Some(format!("{origin}{dir}{href}"))
}

/// `scheme://host[:port]` of an absolute URL.
pub fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")? + 3;
    let host_end = url[scheme_end..]
        .find(['/', '?', '#'])
        .map(|i| scheme_end + i)
        .unwrap_or(url.len());
    Some(&url[..host_end])
}

/// The path component of an absolute URL, without query or fragment.
pub fn path_of(url: &str) -> &str {
    match origin_of(url) {
        Some(origin) => strip_query(&url[origin.len()..]),
        None => strip_query(url),
    }
}

fn strip_query(s: &str) -> &str {
    s.find(['?', '#']).map(|i| &s[..i]).unwrap_or(s)
}

fn has_scheme(href: &str) -> bool {
    match href.find(':') {
        Some(i) => {
            let scheme = &href[..i];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !href[..i].contains('/')
        }
        None => false,
    }
}
