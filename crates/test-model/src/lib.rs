//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ai_orchestrator_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: Vec<PresetReply>,
    // Index of the reply that the next request gets.
    cursor: usize,
    // Failed attempts on the reply at `cursor`.
    failed_attempts: u64,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should reply to each request. Replies are handed out in the order
/// they were added, one per request. If there are no enough replies in the
/// script, an error will be returned.
///
/// Every request is recorded and can be inspected with
/// [`TestModelProvider::requests`].
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.lock().replies.push(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far, including failed ones.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    /// Returns how many requests have been received.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread may poison the lock, the script itself
        // stays consistent.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_reply(&self, req: &ModelRequest) -> Result<ModelReply, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        let cursor = script.cursor;
        let Some((failures, reply)) = script
            .replies
            .get(cursor)
            .map(|preset| (preset.failures, preset.to_reply()))
        else {
            return Err(Error {
                message: "no enough replies",
                kind: ErrorKind::RateLimitExceeded,
            });
        };

        if let Some(failures) = failures {
            if failures == 0 || script.failed_attempts < failures {
                script.failed_attempts += 1;
                return Err(Error {
                    message: "injected failure",
                    kind: ErrorKind::Other,
                });
            }
        }

        script.cursor += 1;
        script.failed_attempts = 0;
        Ok(reply)
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let result = self.next_reply(req);
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            result
        }
    }
}
