use crate::controller::ControllerEvent;
use crate::error::ChatError;
use inshort_core::redact_body;
use inshort_providers::SummaryProvider;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Settled result of one request, tagged with the turn it was sent for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub turn_index: usize,
    pub result: Result<String, ChatError>,
}

/// Sends each submission as its own request and reports back by turn index
pub struct ResponseDispatcher {
    provider: Arc<dyn SummaryProvider>,
    events: UnboundedSender<ControllerEvent>,
    max_body_chars: usize,
}

impl ResponseDispatcher {
    pub fn new(provider: Arc<dyn SummaryProvider>, events: UnboundedSender<ControllerEvent>, max_body_chars: usize) -> Self {
        Self { provider, events, max_body_chars }
    }

    /// Fire the request in the background
    ///
    /// The outcome arrives later as [`ControllerEvent::Dispatched`]. Nothing retries and
    /// nothing cancels the request.
    pub fn send(&self, user_text: String, turn_index: usize) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        let max_body_chars = self.max_body_chars;

        tokio::spawn(async move {
            let outcome = resolve(provider.as_ref(), &user_text, turn_index, max_body_chars).await;
            if events.send(ControllerEvent::Dispatched(outcome)).is_err() {
                tracing::debug!(turn_index, "controller gone before response arrived");
            }
        })
    }
}

/// Run one query and classify the result
///
/// Transport errors, non-success statuses and undecodable bodies are logged here and come
/// back as `Err`; they never propagate further than the turn they belong to.
pub async fn resolve(
    provider: &dyn SummaryProvider, user_text: &str, turn_index: usize, max_body_chars: usize,
) -> DispatchOutcome {
    let result = match provider.query(user_text).await {
        Err(err) => {
            tracing::warn!(turn_index, error = %err, "chat request failed");
            Err(ChatError::from(err))
        }
        Ok(reply) => {
            let status = reply.status;
            let body = redact_body(&reply.body, max_body_chars);
            reply.into_answer().map_err(|err| {
                tracing::warn!(turn_index, status, error = %err, body = %body, "chat reply rejected");
                ChatError::from(err)
            })
        }
    };

    DispatchOutcome { turn_index, result }
}
