use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// An engagement count as sent by the API: a raw number, or a string that
/// may hold either digits or an already formatted value like `"1.2K"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(#[serde(deserialize_with = "whole_number")] u64),
    Text(String),
}

impl From<u64> for Count {
    fn from(value: u64) -> Self {
        Count::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Duration {
    Seconds(#[serde(deserialize_with = "whole_number")] u64),
    Formatted(String),
}

/// Accepts any non-negative JSON number and floors fractions.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct WholeNumber;

    impl Visitor<'_> for WholeNumber {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative number")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
            if value.is_finite() && value >= 0.0 {
                Ok(value.floor() as u64)
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelData {
    pub source_url: String,
    pub caption: String,
    pub transcript: String,
    pub author: Option<String>,
    pub hashtags: Vec<String>,
    pub duration: Duration,
    pub language: String,
    pub view_count: Option<Count>,
    pub like_count: Option<Count>,
    pub comment_count: Option<Count>,
}

impl ReelData {
    pub fn author_profile_url(&self) -> Option<String> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(|author| format!("https://www.instagram.com/{}", author.trim_start_matches('@')))
    }
}
