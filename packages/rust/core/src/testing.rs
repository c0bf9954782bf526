//! Test double for the completion service.

use std::sync::Mutex;

use qros_llm::{CancellationToken, CompletionRequest, CompletionService};
use qros_shared::{QrosError, Result};

enum Reply {
    Text(String),
    Fail(Box<dyn Fn() -> QrosError + Send + Sync>),
}

/// Returns a fixed reply and records every request it sees.
pub(crate) struct ScriptedService {
    reply: Reply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedService {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make: impl Fn() -> QrosError + Send + Sync + 'static) -> Self {
        Self {
            reply: Reply::Fail(Box::new(make)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("service was never called")
    }

    pub fn last_prompt(&self) -> String {
        self.last_request().prompt
    }
}

impl CompletionService for ScriptedService {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(QrosError::Cancelled);
        }
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(make) => Err(make()),
        }
    }
}
