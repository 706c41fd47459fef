use once_cell::sync::Lazy;
use regex::Regex;

use crate::{SaramsaError, SaramsaResult};

static CONTENT_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(www\.)?instagram\.com/(reel|p)/[A-Za-z0-9_-]+/?$")
        .expect("content url regex")
});

/// Longest URL accepted, matching the input field limit of the web client.
pub const MAX_URL_LENGTH: usize = 2048;

/// Marker for the tracking query the share sheet appends, e.g. `/?igsh=...`.
const TRACKING_MARKER: &str = "/?";

/// Trims the input and drops everything from the first `/?` onward.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let stripped = match trimmed.find(TRACKING_MARKER) {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };
    stripped.to_string()
}

pub fn is_valid_url(url: &str) -> bool {
    CONTENT_URL_REGEX.is_match(url)
}

/// Normalizes `input` and checks it names a reel or post.
pub fn prepare_url(input: &str) -> SaramsaResult<String> {
    let normalized = normalize_url(input);
    if normalized.is_empty() {
        return Err(SaramsaError::EmptyInput);
    }
    if normalized.chars().count() > MAX_URL_LENGTH || !is_valid_url(&normalized) {
        return Err(SaramsaError::InvalidUrl(normalized));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reel_and_post_urls() {
        assert!(is_valid_url("https://www.instagram.com/reel/ABC123/"));
        assert!(is_valid_url("https://instagram.com/p/xyz_-9/"));
        assert!(is_valid_url("https://instagram.com/reel/ABC123"));
    }

    #[test]
    fn rejects_other_urls() {
        assert!(!is_valid_url("http://instagram.com/reel/abc/"));
        assert!(!is_valid_url("https://instagram.com/story/abc/"));
        assert!(!is_valid_url("https://instagram.com/reel/"));
        assert!(!is_valid_url("https://www.instagram.com/reel/abc/extra"));
        assert!(!is_valid_url("https://notinstagram.com/reel/abc/"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn strips_tracking_suffix() {
        assert_eq!(
            normalize_url("https://www.instagram.com/reel/ABC123/?igsh=MWx0"),
            "https://www.instagram.com/reel/ABC123"
        );
    }

    #[test]
    fn strips_at_first_marker_only() {
        assert_eq!(normalize_url("a/?b/?c"), "a");
    }

    #[test]
    fn trims_before_stripping() {
        assert_eq!(
            normalize_url("  https://instagram.com/p/xyz/?utm=1  "),
            "https://instagram.com/p/xyz"
        );
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "https://www.instagram.com/reel/ABC123/?igsh=abc",
            " https://instagram.com/p/xyz_-9/ ",
            "plain text",
            "",
        ];
        for input in inputs {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once);
        }
    }

    #[test]
    fn prepare_url_enforces_length_limit() {
        let base = "https://www.instagram.com/reel/";
        let at_limit = format!("{base}{}", "a".repeat(MAX_URL_LENGTH - base.len()));
        assert!(prepare_url(&at_limit).is_ok());

        let too_long = format!("{at_limit}b");
        assert!(matches!(prepare_url(&too_long), Err(SaramsaError::InvalidUrl(_))));
    }

    #[test]
    fn prepare_url_classifies_failures() {
        assert!(matches!(prepare_url("  "), Err(SaramsaError::EmptyInput)));
        assert!(matches!(
            prepare_url("https://instagram.com/story/abc/"),
            Err(SaramsaError::InvalidUrl(_))
        ));
        assert_eq!(
            prepare_url("https://www.instagram.com/reel/ABC123/?igsh=x").unwrap(),
            "https://www.instagram.com/reel/ABC123"
        );
    }
}
