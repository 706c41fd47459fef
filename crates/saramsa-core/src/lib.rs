mod error;
mod format;
mod link;
mod result;

pub use error::{GENERIC_FAILURE, SaramsaError, SaramsaResult};
pub use format::{MISSING_COUNT, format_count, format_duration, format_number, format_seconds};
pub use link::{MAX_URL_LENGTH, is_valid_url, normalize_url, prepare_url};
pub use result::{Count, Duration, ReelData};

/// Checks that `url` is an absolute URL; used for configured endpoints.
pub fn validate_url(url: &str) -> SaramsaResult<()> {
    url::Url::parse(url).map_err(|err| SaramsaError::InvalidInput(format!("invalid url: {err}")))?;
    Ok(())
}
