//! Output file names for rendered pages.

use crate::links::path_of;

/// Segment that carries no meaning on its own in fact-sheet URLs.
const GENERIC_SEGMENT: &str = "detail";

/// Used when nothing usable survives sanitizing.
const FALLBACK_STEM: &str = "page";

/// A filesystem-safe `.pdf` file name derived from `url`.
///
/// The last path segment is used when it is meaningful; otherwise the whole
/// path with `/` replaced by `_`. Only alphanumerics, `_` and `-` are kept.
pub fn pdf_file_name(url: &str) -> String {
    let path = path_of(url);
    let last = path.split('/').filter(|s| !s.is_empty()).last();

    let stem = match last {
        Some(segment) if segment != GENERIC_SEGMENT => segment.to_string(),
        _ => path.trim_matches('/').replace('/', "_"),
    };

    let clean: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect();

    if clean.is_empty() {
        format!("{FALLBACK_STEM}.pdf")
    } else {
        format!("{clean}.pdf")
    }
}
