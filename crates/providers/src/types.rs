use serde::{Deserialize, Serialize};

use inshort_core::{Error, Result};

/// Outbound body for `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    pub query: String,
}

impl ChatQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// Expected success body from the summarization service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

impl ChatReply {
    /// Decode a raw response body
    pub fn decode(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// What came back over the wire, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Interpret the reply: non-2xx is a status failure, otherwise the body must decode
    pub fn into_answer(self) -> Result<String> {
        if !self.is_success() {
            return Err(Error::Status { status: self.status, body: self.body });
        }
        ChatReply::decode(&self.body).map(|reply| reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_query_serialization() {
        let json = serde_json::to_string(&ChatQuery::new("hello")).unwrap();
        assert_eq!(json, r#"{"query":"hello"}"#);
    }

    #[test]
    fn test_chat_reply_decode() {
        let reply = ChatReply::decode(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(reply.response, "hi");
    }

    #[test]
    fn test_chat_reply_decode_ignores_extra_fields() {
        let reply = ChatReply::decode(r#"{"response":"hi","sources":[]}"#).unwrap();
        assert_eq!(reply.response, "hi");
    }

    #[test]
    fn test_chat_reply_decode_failures() {
        assert!(matches!(ChatReply::decode("<html>oops</html>"), Err(Error::Decode(_))));
        assert!(matches!(ChatReply::decode(r#"{"answer":"hi"}"#), Err(Error::Decode(_))));
        assert!(matches!(ChatReply::decode(""), Err(Error::Decode(_))));
    }

    #[test]
    fn test_raw_reply_success_range() {
        assert!(RawReply::new(200, "").is_success());
        assert!(RawReply::new(204, "").is_success());
        assert!(!RawReply::new(302, "").is_success());
        assert!(!RawReply::new(500, "").is_success());
    }

    #[test]
    fn test_raw_reply_into_answer() {
        assert_eq!(RawReply::new(200, r#"{"response":"X"}"#).into_answer().unwrap(), "X");

        let err = RawReply::new(503, "down").into_answer().unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }));

        let err = RawReply::new(200, "not json").into_answer().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_status_checked_before_body() {
        let err = RawReply::new(500, r#"{"response":"X"}"#).into_answer().unwrap_err();
        assert!(matches!(err, Error::Status { status: 500, .. }));
    }
}
