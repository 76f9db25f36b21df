//! An answer provider that talks to the Alexis answering service over HTTP.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use alexis_model::{
    Answer, AnswerProvider, AnswerProviderError, AskRequest, ErrorKind,
};
use reqwest::{Client, header};

pub use config::{HttpConfig, HttpConfigBuilder};

/// Error type for [`HttpAnswerProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

/// Answer provider backed by the HTTP ask endpoint.
///
/// Dropping the future returned by [`AnswerProvider::ask`] aborts the
/// request, so superseded questions don't keep the connection busy.
#[derive(Clone, Debug)]
pub struct HttpAnswerProvider {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpAnswerProvider {
    /// Creates a new `HttpAnswerProvider` with the given configuration.
    #[inline]
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl AnswerProvider for HttpAnswerProvider {
    type Error = Error;

    fn ask(
        &self,
        req: &AskRequest,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .client
            .post(&self.config.ask_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&proto::AskBody::from_request(req))
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    let kind = if err.is_builder() {
                        ErrorKind::Other
                    } else {
                        ErrorKind::Network
                    };
                    let message = format!("fetch failed: {err}");
                    return Err(Error::new(message, kind));
                }
            };

            let status = resp.status();
            trace!("got response with status {status}");
            let body = match resp.bytes().await {
                Ok(body) => Some(body),
                Err(err) => {
                    warn!("failed to read response body: {err}");
                    None
                }
            };
            proto::classify(status, body.as_deref())
        }
    }
}
