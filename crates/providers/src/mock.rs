use crate::SummaryProvider;
use crate::types::{ChatReply, RawReply};
use inshort_core::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted outcome of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// 200 with `{"response": <answer>}`
    Answer(String),
    /// The given status and body
    Status(u16, String),
    /// 200 with an arbitrary body
    Raw(String),
    /// Fail at once with a transport error, as if the connection dropped
    TransportError(String),
}

impl MockReply {
    pub fn answer(text: impl Into<String>) -> Self {
        MockReply::Answer(text.into())
    }

    fn into_result(self) -> Result<RawReply> {
        match self {
            MockReply::Answer(response) => {
                let body = serde_json::to_string(&ChatReply { response })
                    .map_err(|e| Error::Other(format!("failed to encode mock reply: {}", e)))?;
                Ok(RawReply::new(200, body))
            }
            MockReply::Status(status, body) => Ok(RawReply::new(status, body)),
            MockReply::Raw(body) => Ok(RawReply::new(200, body)),
            MockReply::TransportError(message) => Err(Error::Transport(message)),
        }
    }
}

#[derive(Debug, Clone)]
struct MockStep {
    reply: MockReply,
    delay: Duration,
}

#[derive(Debug, Default)]
struct MockScript {
    by_query: HashMap<String, MockStep>,
    queue: VecDeque<MockStep>,
    fallback: Option<MockStep>,
    received: Vec<String>,
}

/// Provider for deterministic testing without a running service
///
/// Replies registered for a specific query take precedence; otherwise queued replies are
/// consumed in call order, then the [`MockProvider::always`] answer, and finally a 503.
#[derive(Debug, Default)]
pub struct MockProvider {
    script: Mutex<MockScript>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every query with the same text
    pub fn always(answer: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.lock().fallback = Some(MockStep { reply: MockReply::Answer(answer.into()), delay: Duration::ZERO });
        provider
    }

    /// Queue a reply for the next unmatched query
    pub fn push(self, reply: MockReply) -> Self {
        self.push_delayed(reply, Duration::ZERO)
    }

    pub fn push_delayed(self, reply: MockReply, delay: Duration) -> Self {
        self.lock().queue.push_back(MockStep { reply, delay });
        self
    }

    /// Reply to a specific query text, after `delay`
    pub fn on_query(self, query: impl Into<String>, reply: MockReply, delay: Duration) -> Self {
        self.lock().by_query.insert(query.into(), MockStep { reply, delay });
        self
    }

    /// Queries received so far, in call order
    pub fn received(&self) -> Vec<String> {
        self.lock().received.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockScript> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_step(&self, query: &str) -> MockStep {
        let mut script = self.lock();
        script.received.push(query.to_string());

        if let Some(step) = script.by_query.get(query) {
            return step.clone();
        }
        if let Some(step) = script.queue.pop_front() {
            return step;
        }
        if let Some(step) = &script.fallback {
            return step.clone();
        }

        tracing::warn!(query, "no mock reply configured");
        MockStep { reply: MockReply::Status(503, "no mock reply configured".to_string()), delay: Duration::ZERO }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for MockProvider {
    async fn query(&self, query: &str) -> Result<RawReply> {
        let step = self.next_step(query);
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_answer() {
        let provider = MockProvider::new().push(MockReply::answer("hi"));
        let reply = provider.query("hello").await.unwrap();
        assert_eq!(reply, RawReply::new(200, r#"{"response":"hi"}"#));
        assert_eq!(provider.received(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_queue_order_and_exhaustion() {
        let provider = MockProvider::new()
            .push(MockReply::Status(500, "boom".to_string()))
            .push(MockReply::Raw("not json".to_string()));

        assert_eq!(provider.query("a").await.unwrap().status, 500);
        assert_eq!(provider.query("b").await.unwrap().body, "not json");
        assert_eq!(provider.query("c").await.unwrap().status, 503);
    }

    #[tokio::test]
    async fn test_mock_transport_error() {
        let provider = MockProvider::new().push(MockReply::TransportError("refused".to_string()));
        let err = provider.query("a").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_mock_on_query_takes_precedence() {
        let provider = MockProvider::new()
            .push(MockReply::answer("queued"))
            .on_query("special", MockReply::answer("matched"), Duration::ZERO);

        let body = provider.query("special").await.unwrap().body;
        assert_eq!(body, r#"{"response":"matched"}"#);
        let body = provider.query("other").await.unwrap().body;
        assert_eq!(body, r#"{"response":"queued"}"#);
    }

    #[tokio::test]
    async fn test_mock_always() {
        let provider = MockProvider::always("same");
        for query in ["one", "two", "three"] {
            let reply = provider.query(query).await.unwrap();
            assert_eq!(reply.into_answer().unwrap(), "same");
        }
    }

    #[tokio::test]
    async fn test_mock_always_is_last_resort() {
        let provider = MockProvider::always("fallback").push(MockReply::answer("queued"));

        assert_eq!(provider.query("").await.unwrap().into_answer().unwrap(), "queued");
        assert_eq!(provider.query("").await.unwrap().into_answer().unwrap(), "fallback");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_delay() {
        let provider = MockProvider::new().push_delayed(MockReply::answer("late"), Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        provider.query("q").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_delay_is_pending_until_elapsed() {
        let provider = MockProvider::new().push_delayed(MockReply::answer("late"), Duration::from_millis(200));
        let mut query = tokio_test::task::spawn(provider.query("q"));

        tokio_test::assert_pending!(query.poll());
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!(query.is_woken());

        let reply = tokio_test::assert_ready_ok!(query.poll());
        assert_eq!(reply.into_answer().unwrap(), "late");
    }
}
