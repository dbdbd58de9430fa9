pub mod adapter;
pub mod mock;
pub mod types;

pub use adapter::{HttpSummaryProvider, SummaryProvider, chat_endpoint};
pub use mock::{MockProvider, MockReply};
pub use types::{ChatQuery, ChatReply, RawReply};

pub use inshort_core::{Error, Result};
