pub mod api;
mod orchestrator;

pub use api::reel::{AnalyzeClient, ReelPayload, SchemaVersion};
pub use orchestrator::{CANCELLED_MESSAGE, Orchestrator, Phase, ViewState};
