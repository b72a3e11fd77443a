//! Input Resolver: turns free-form user input (a raw numeric ID, a catalog
//! URL, or anything else) into a canonical external catalog ID, and
//! normalizes user-supplied poster references.

use url::Url;

/// Extract a TMDB catalog ID from free-form input.
///
/// Digit-only strings pass through as-is. URLs are scanned for a `movie`
/// path segment; the leading digit run of the following segment is the ID,
/// which tolerates slug suffixes (`/movie/603-the-matrix` → `603`).
/// Everything else is a normal negative result, never an error.
pub fn extract_catalog_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return Some(input.to_string());
    }

    let parsed = Url::parse(input).ok()?;
    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "movie" {
            let id: String = segments
                .next()?
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            return (!id.is_empty()).then_some(id);
        }
    }

    None
}

/// Classified poster reference from the create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterReference {
    /// Already an absolute http(s) URL; stored unchanged.
    Absolute(String),
    /// A catalog-relative path (single leading slash guaranteed) that still
    /// needs the catalog's image base prepended.
    CatalogPath(String),
}

/// Normalize a user-supplied poster reference.
///
/// Absolute `http(s)` URLs pass through unchanged; any other non-empty
/// string is treated as a catalog-relative path with exactly one leading
/// slash. Empty input yields nothing.
pub fn normalize_poster_reference(input: &str) -> Option<PosterReference> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return Some(PosterReference::Absolute(input.to_string()));
    }

    let path = format!("/{}", input.trim_start_matches('/'));
    Some(PosterReference::CatalogPath(path))
}
