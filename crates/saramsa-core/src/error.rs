use thiserror::Error;

/// Shown when a transport failure carries no message of its own.
pub const GENERIC_FAILURE: &str = "Failed to analyze content. Please try again.";

#[derive(Debug, Error)]
pub enum SaramsaError {
    #[error("Please enter a content URL")]
    EmptyInput,
    #[error("Please enter a valid content URL")]
    InvalidUrl(String),
    #[error("Analysis failed: {}", status_line(.status, .reason))]
    Http { status: u16, reason: String },
    #[error("{}", non_empty_or_generic(.0))]
    Network(String),
    #[error("{0}")]
    Parse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

fn status_line(status: &u16, reason: &str) -> String {
    match reason.trim() {
        "" => status.to_string(),
        reason => format!("{status} {reason}"),
    }
}

fn non_empty_or_generic(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_FAILURE
    } else {
        message
    }
}

pub type SaramsaResult<T> = Result<T, SaramsaError>;
