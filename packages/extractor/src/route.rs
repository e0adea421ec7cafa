//! Routing page URL construction.

use url::Url;

use crate::ExtractorError;

/// Builds `{base_url}/{start}/{end}` with both city names percent-encoded
/// as individual path segments.
///
/// # Errors
///
/// Returns [`ExtractorError::InvalidBaseUrl`] if `base_url` does not parse
/// or cannot carry path segments (e.g., `mailto:` URLs).
pub fn route_url(base_url: &str, start: &str, end: &str) -> Result<Url, ExtractorError> {
    let invalid = |reason: String| ExtractorError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(start)
        .push(end);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_both_cities() {
        let url = route_url("https://www.google.com/maps/dir", "Lyon", "Paris").unwrap();
        assert_eq!(url.as_str(), "https://www.google.com/maps/dir/Lyon/Paris");
    }

    #[test]
    fn ignores_trailing_slash_on_base() {
        let url = route_url("https://www.google.com/maps/dir/", "Lyon", "Paris").unwrap();
        assert_eq!(url.as_str(), "https://www.google.com/maps/dir/Lyon/Paris");
    }

    #[test]
    fn escapes_spaces_accents_and_slashes() {
        let url = route_url(
            "https://www.google.com/maps/dir",
            "Saint Étienne",
            "Bar/Seine",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/dir/Saint%20%C3%89tienne/Bar%2FSeine"
        );
    }

    #[test]
    fn rejects_unparsable_base() {
        assert!(matches!(
            route_url("not a url", "Lyon", "Paris"),
            Err(ExtractorError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn rejects_cannot_be_a_base_url() {
        assert!(matches!(
            route_url("mailto:someone@example.com", "Lyon", "Paris"),
            Err(ExtractorError::InvalidBaseUrl { .. })
        ));
    }
}
