use alexis_model::{Answer, AskRequest, ErrorKind};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::Error;

// ---------------------
// Types sent to the server
// ---------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AskBody<'a> {
    pub question: &'a str,
}

impl<'a> AskBody<'a> {
    #[inline]
    pub fn from_request(req: &'a AskRequest) -> Self {
        Self {
            question: &req.question,
        }
    }
}

// ---------------------------
// Types received from the server
// ---------------------------

/// Both the success and failure bodies share this shape, every field is
/// optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct AskResponseBody {
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// Parses the body, treating anything that isn't the expected JSON as
/// absent.
pub fn parse_body(body: Option<&[u8]>) -> Option<AskResponseBody> {
    let body = body?;
    match serde_json::from_slice(body) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!("unparseable response body: {err}");
            None
        }
    }
}

/// Classifies a settled response into an answer or an error.
pub fn classify(
    status: StatusCode,
    body: Option<&[u8]>,
) -> Result<Answer, Error> {
    let parsed = parse_body(body);

    if !status.is_success() {
        let message = parsed
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| status_line(status));
        return Err(Error::new(message, status_kind(status)));
    }

    let Some(parsed) = parsed else {
        return Err(Error::new(
            format!("Malformed response body ({})", status_line(status)),
            ErrorKind::MalformedResponse,
        ));
    };
    match parsed.answer {
        Some(answer) if !answer.is_empty() => Ok(Answer::new(answer)),
        _ => Err(Error::new(
            "Empty answer from server",
            ErrorKind::EmptyAnswer,
        )),
    }
}

#[inline]
fn status_kind(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::Status,
    }
}

#[inline]
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
