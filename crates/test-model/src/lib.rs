//! A local fake answering service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use alexis_model::{
    Answer, AnswerProvider, AnswerProviderError, AskRequest, ErrorKind,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl AnswerProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    requests: Vec<AskRequest>,
    delay: Option<Duration>,
}

/// A local fake answering service for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// service should reply. Replies are consumed in the order the requests
/// arrive, no matter what the question is. If there are no enough replies
/// in the script, an error will be returned.
///
/// Clones share the same script and request log, so a test can keep one
/// clone to inspect the requests after handing the other to the widget.
#[derive(Clone, Default)]
pub struct TestAnswerProvider {
    script: Arc<Mutex<Script>>,
}

impl TestAnswerProvider {
    #[inline]
    pub fn add_reply(&self, reply: PresetReply) {
        self.lock().replies.push_back(reply);
    }

    /// Sets the delay for replies that don't specify their own.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns all requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<AskRequest> {
        self.lock().requests.clone()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnswerProvider for TestAnswerProvider {
    type Error = crate::Error;

    fn ask(
        &self,
        req: &AskRequest,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static
    {
        let provider = self.clone();
        let req = req.clone();

        async move {
            // Requests are recorded when the call is actually made.
            let (reply, default_delay) = {
                let mut script = provider.lock();
                script.requests.push(req);
                (script.replies.pop_front(), script.delay)
            };
            let Some(reply) = reply else {
                return Err(Error {
                    message: "no enough replies".to_owned(),
                    kind: ErrorKind::Other,
                });
            };
            let delay = reply
                .delay
                .or(default_delay)
                .unwrap_or(Duration::from_millis(1));
            sleep(delay).await;

            match reply.outcome {
                PresetOutcome::Answer(text) => Ok(Answer::new(text)),
                PresetOutcome::Failure(PresetFailure { kind, message }) => {
                    Err(Error { message, kind })
                }
            }
        }
    }
}
