//! Request types: the immutable input of one pipeline run.

use serde::{Deserialize, Serialize};

/// One past exchange supplied as prior context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Raw request text plus optional prior-interaction history.
///
/// Created per call and dropped once the pipeline returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history: Option<Vec<Exchange>>,
}

impl Request {
    /// A request with no prior context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            history: None,
        }
    }

    /// Attach prior exchanges, oldest first.
    pub fn with_history(mut self, history: Vec<Exchange>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The supplied history, or `None` when no context was given.
    pub fn history(&self) -> Option<&[Exchange]> {
        self.history.as_deref()
    }
}
