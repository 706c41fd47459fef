use saramsa_core::{ReelData, SaramsaResult, prepare_url};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::reel::AnalyzeClient;

pub const CANCELLED_MESSAGE: &str = "Analysis was interrupted before a response arrived.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// What the client currently shows. A result and an error never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Pending,
    Succeeded(ReelData),
    Failed(String),
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Idle => Phase::Idle,
            ViewState::Pending => Phase::Pending,
            ViewState::Succeeded(_) => Phase::Succeeded,
            ViewState::Failed(_) => Phase::Failed,
        }
    }

    pub fn result(&self) -> Option<&ReelData> {
        match self {
            ViewState::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ViewState::Pending)
    }
}

/// Drives one submission at a time from raw input to a settled view state.
#[derive(Debug)]
pub struct Orchestrator {
    client: AnalyzeClient,
    state: ViewState,
    busy: watch::Sender<bool>,
}

impl Orchestrator {
    pub fn new(client: AnalyzeClient) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            client,
            state: ViewState::Idle,
            busy,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Flag that is `true` exactly while a request is in flight.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub async fn submit(&mut self, raw_input: &str) -> &ViewState {
        let url = match prepare_url(raw_input) {
            Ok(url) => url,
            Err(err) => {
                debug!(input = raw_input, %err, "input rejected before request");
                self.state = ViewState::Failed(err.to_string());
                return &self.state;
            }
        };

        let pending = PendingGuard::enter(&mut self.state, &self.busy);
        let outcome = self.client.analyze(&url).await;
        pending.settle(outcome);
        &self.state
    }
}

/// Holds the state in `Pending` for the lifetime of a request and makes sure
/// it leaves `Pending` on every exit, including a dropped future.
struct PendingGuard<'a> {
    state: &'a mut ViewState,
    busy: &'a watch::Sender<bool>,
}

impl<'a> PendingGuard<'a> {
    fn enter(state: &'a mut ViewState, busy: &'a watch::Sender<bool>) -> Self {
        *state = ViewState::Pending;
        busy.send_replace(true);
        Self { state, busy }
    }

    fn settle(mut self, outcome: SaramsaResult<ReelData>) {
        *self.state = match outcome {
            Ok(data) => ViewState::Succeeded(data),
            Err(err) => {
                debug!(%err, "analysis failed");
                ViewState::Failed(err.to_string())
            }
        };
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.state.is_busy() {
            warn!("analysis dropped while pending");
            *self.state = ViewState::Failed(CANCELLED_MESSAGE.to_string());
        }
        self.busy.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REEL: &str = "https://www.instagram.com/reel/ABC123/";

    fn reel_body(caption: &str) -> serde_json::Value {
        json!({
            "instagram_url": REEL,
            "caption": caption,
            "transcript": "hello",
            "metadata": {
                "author": "someone",
                "hashtags": [],
                "duration_seconds": 45,
                "language": "en",
                "view_count": 500
            }
        })
    }

    fn orchestrator(server: &MockServer) -> Orchestrator {
        Orchestrator::new(AnalyzeClient::new(server.uri()).unwrap())
    }

    #[tokio::test]
    async fn starts_idle() {
        let server = MockServer::start().await;
        let orchestrator = orchestrator(&server);
        assert_eq!(orchestrator.state().phase(), Phase::Idle);
        assert!(orchestrator.state().result().is_none());
        assert!(orchestrator.state().error_message().is_none());
    }

    #[tokio::test]
    async fn empty_input_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("x")))
            .expect(0)
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        let state = orchestrator.submit("   ").await;
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error_message(), Some("Please enter a content URL"));
    }

    #[tokio::test]
    async fn malformed_url_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("x")))
            .expect(0)
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        let state = orchestrator.submit("https://instagram.com/story/abc/").await;
        assert_eq!(state.error_message(), Some("Please enter a valid content URL"));
    }

    #[tokio::test]
    async fn success_sends_one_request_with_normalized_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "url": "https://www.instagram.com/reel/ABC123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("first")))
            .expect(1)
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        let state = orchestrator
            .submit(" https://www.instagram.com/reel/ABC123/?igsh=tracking ")
            .await;
        assert_eq!(state.phase(), Phase::Succeeded);
        assert_eq!(state.result().map(|data| data.caption.as_str()), Some("first"));
        assert!(state.error_message().is_none());
    }

    #[tokio::test]
    async fn failure_after_success_clears_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("first")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        assert_eq!(orchestrator.submit(REEL).await.phase(), Phase::Succeeded);

        let state = orchestrator.submit(REEL).await;
        assert!(state.result().is_none());
        assert_eq!(
            state.error_message(),
            Some("Analysis failed: 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn invalid_input_after_success_clears_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("first")))
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        orchestrator.submit(REEL).await;
        let state = orchestrator.submit("").await;
        assert!(state.result().is_none());
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reel_body("second")))
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        assert_eq!(orchestrator.submit(REEL).await.phase(), Phase::Failed);

        let state = orchestrator.submit(REEL).await;
        assert!(state.error_message().is_none());
        assert_eq!(state.result().map(|data| data.caption.as_str()), Some("second"));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_message() {
        let client = AnalyzeClient::new("http://127.0.0.1:1/api/instagram/reel").unwrap();
        let mut orchestrator = Orchestrator::new(client);
        let state = orchestrator.submit(REEL).await;
        assert_eq!(state.phase(), Phase::Failed);
        assert!(!state.error_message().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn busy_flag_tracks_pending_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reel_body("slow"))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        let mut busy = orchestrator.subscribe_busy();
        assert!(!*busy.borrow());

        let (state, saw_busy) = tokio::join!(orchestrator.submit(REEL), async {
            busy.wait_for(|flag| *flag).await.is_ok()
        });
        assert!(saw_busy);
        assert_eq!(state.phase(), Phase::Succeeded);
        assert!(!*orchestrator.subscribe_busy().borrow());
    }

    #[tokio::test]
    async fn dropped_submission_does_not_stay_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reel_body("slow"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator(&server);
        let timed_out = tokio::time::timeout(Duration::from_millis(50), orchestrator.submit(REEL))
            .await
            .is_err();
        assert!(timed_out);
        assert_eq!(orchestrator.state().phase(), Phase::Failed);
        assert_eq!(orchestrator.state().error_message(), Some(CANCELLED_MESSAGE));
        assert!(!*orchestrator.subscribe_busy().borrow());
    }
}
