//! Client and wire schema for the reel analysis endpoint.
//!
//! Two response shapes exist in the wild. Version 2 nests engagement data
//! under `metadata` with numeric counts and is the canonical one. Version 1
//! is flat with pre-formatted string counts and is still accepted.

use reqwest::Client;
use saramsa_core::{Count, Duration, ReelData, SaramsaError, SaramsaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AnalyzeClient {
    client: Client,
    endpoint: String,
}

impl AnalyzeClient {
    pub fn new(endpoint: impl Into<String>) -> SaramsaResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("saramsa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SaramsaError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one analysis request for an already normalized URL.
    pub async fn analyze(&self, url: &str) -> SaramsaResult<ReelData> {
        debug!(endpoint = %self.endpoint, url, "sending analysis request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&AnalyzeRequest { url })
            .send()
            .await
            .map_err(|err| SaramsaError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %body, "analysis request rejected");
            return Err(SaramsaError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| SaramsaError::Network(err.to_string()))?;
        let payload = serde_json::from_str(&body)
            .and_then(ReelPayload::from_value)
            .map_err(|err| SaramsaError::Parse(format!("unexpected analysis response: {err}")))?;
        if payload.version() == SchemaVersion::V1Flat {
            debug!("decoded legacy flat response");
        }
        Ok(payload.into())
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    V1Flat,
    V2Nested,
}

#[derive(Debug)]
pub enum ReelPayload {
    Nested(NestedReel),
    Flat(FlatReel),
}

impl ReelPayload {
    /// A `metadata` object marks the nested schema; anything else is read as flat.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.get("metadata").is_some() {
            serde_json::from_value(value).map(ReelPayload::Nested)
        } else {
            serde_json::from_value(value).map(ReelPayload::Flat)
        }
    }

    pub fn version(&self) -> SchemaVersion {
        match self {
            ReelPayload::Nested(_) => SchemaVersion::V2Nested,
            ReelPayload::Flat(_) => SchemaVersion::V1Flat,
        }
    }
}

// Optional string and list fields may arrive as explicit `null`.
#[derive(Debug, Deserialize)]
pub struct NestedReel {
    pub instagram_url: String,
    pub caption: Option<String>,
    pub transcript: Option<String>,
    pub metadata: NestedMetadata,
}

#[derive(Debug, Deserialize)]
pub struct NestedMetadata {
    pub author: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub duration_seconds: Option<Duration>,
    pub language: Option<String>,
    pub view_count: Option<Count>,
    pub like_count: Option<Count>,
    pub comment_count: Option<Count>,
}

#[derive(Debug, Deserialize)]
pub struct FlatReel {
    #[serde(alias = "instagram_url")]
    pub url: String,
    pub caption: Option<String>,
    pub transcript: Option<String>,
    pub author: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub duration: Option<Duration>,
    pub language: Option<String>,
    pub views: Option<Count>,
    pub likes: Option<Count>,
    pub comments: Option<Count>,
}

impl From<ReelPayload> for ReelData {
    fn from(payload: ReelPayload) -> Self {
        match payload {
            ReelPayload::Nested(reel) => ReelData {
                source_url: reel.instagram_url,
                caption: reel.caption.unwrap_or_default(),
                transcript: reel.transcript.unwrap_or_default(),
                author: reel.metadata.author,
                hashtags: reel.metadata.hashtags.unwrap_or_default(),
                duration: reel.metadata.duration_seconds.unwrap_or(Duration::Seconds(0)),
                language: reel.metadata.language.unwrap_or_default(),
                view_count: reel.metadata.view_count,
                like_count: reel.metadata.like_count,
                comment_count: reel.metadata.comment_count,
            },
            ReelPayload::Flat(reel) => ReelData {
                source_url: reel.url,
                caption: reel.caption.unwrap_or_default(),
                transcript: reel.transcript.unwrap_or_default(),
                author: reel.author,
                hashtags: reel.hashtags.unwrap_or_default(),
                duration: reel.duration.unwrap_or(Duration::Seconds(0)),
                language: reel.language.unwrap_or_default(),
                view_count: reel.views,
                like_count: reel.likes,
                comment_count: reel.comments,
            },
        }
    }
}
