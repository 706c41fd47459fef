use std::future::Future;
use std::time::Duration;

use console::{Term, style};
use tokio::sync::watch;

const FRAME_INTERVAL: Duration = Duration::from_millis(120);
const LABEL: &str = "Fetching";

/// Draws a "Fetching" indicator on stderr while the busy flag is raised.
pub struct Loading {
    busy: watch::Receiver<bool>,
    term: Term,
    enabled: bool,
}

impl Loading {
    pub fn new(busy: watch::Receiver<bool>) -> Self {
        let term = Term::stderr();
        let enabled = term.is_term();
        Self {
            busy,
            term,
            enabled,
        }
    }

    pub async fn run<F: Future>(&self, task: F) -> F::Output {
        if !self.enabled {
            return task.await;
        }

        tokio::pin!(task);
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        let mut frame = 0usize;
        let mut drawn = false;

        let output = loop {
            tokio::select! {
                output = &mut task => break output,
                _ = ticker.tick() => {
                    if *self.busy.borrow() {
                        let _ = self.term.clear_line();
                        let _ = self.term.write_str(&frame_text(frame));
                        drawn = true;
                        frame += 1;
                    }
                }
            }
        };

        if drawn {
            let _ = self.term.clear_line();
        }
        output
    }
}

/// Highlights one letter of the label per frame, sweeping left to right.
fn frame_text(frame: usize) -> String {
    let lit = frame % LABEL.len();
    LABEL
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            if index == lit {
                style(ch).cyan().bold().to_string()
            } else {
                style(ch).dim().to_string()
            }
        })
        .collect()
}
