use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use alexis_model::{Answer, AnswerProvider, AnswerProviderError, AskRequest};
use backoff::backoff::Backoff;
use tracing::Instrument;

pub(crate) type FetchResult = Result<Answer, Box<dyn AnswerProviderError>>;
type BoxedAskFuture = Pin<Box<dyn Future<Output = FetchResult> + Send>>;
type HandlerFn = Arc<dyn Fn(AskRequest) -> BoxedAskFuture + Send + Sync>;

/// The wait before the single retry of a transient failure.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(350);

/// A wrapper around an answer provider that erases its type and applies
/// the retry policy.
#[derive(Clone)]
pub struct AnswerClient {
    handler_fn: HandlerFn,
    retry_backoff: Duration,
}

impl AnswerClient {
    #[inline]
    pub fn new<P: AnswerProvider + 'static>(provider: P) -> Self {
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.ask(&req);
            Box::pin(
                async move {
                    trace!("asking: {:?}", req.question);
                    let result = fut.await;
                    result.map_err(|err| -> Box<dyn AnswerProviderError> {
                        Box::new(err)
                    })
                }
                .instrument(trace_span!("answer client req")),
            )
        });
        Self {
            handler_fn,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    #[inline]
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Fetches the answer for `question`.
    ///
    /// A transient failure is retried exactly once after the retry backoff,
    /// and `on_retry` is called right before waiting. Any other failure, or
    /// the failure of the retried attempt, is returned as is.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the request
    /// in flight, or skips the pending retry.
    pub async fn fetch<F>(
        &self,
        question: String,
        mut on_retry: F,
    ) -> FetchResult
    where
        F: FnMut(&dyn AnswerProviderError, Duration) + Send,
    {
        let req = AskRequest::new(question);
        let handler_fn = &self.handler_fn;
        backoff::future::retry_notify(
            SingleRetry::new(self.retry_backoff),
            || {
                // The attempt is only issued once polled, so a retry that
                // is dropped during its backoff never reaches the provider.
                let req = req.clone();
                async move { handler_fn(req).await.map_err(into_backoff_error) }
            },
            |err: Box<dyn AnswerProviderError>, delay: Duration| {
                on_retry(&*err, delay)
            },
        )
        .await
    }
}

#[inline]
fn into_backoff_error(
    err: Box<dyn AnswerProviderError>,
) -> backoff::Error<Box<dyn AnswerProviderError>> {
    if err.kind().is_transient() {
        backoff::Error::transient(err)
    } else {
        backoff::Error::permanent(err)
    }
}

/// A backoff policy that allows one retry after a fixed delay.
#[derive(Clone, Copy, Debug)]
struct SingleRetry {
    delay: Duration,
    spent: bool,
}

impl SingleRetry {
    #[inline]
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            spent: false,
        }
    }
}

impl Backoff for SingleRetry {
    fn reset(&mut self) {
        self.spent = false;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.spent {
            return None;
        }
        self.spent = true;
        Some(self.delay)
    }
}
