use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alexis::SessionBuilder;
use alexis::core::DEFAULT_FAILURE_MESSAGE;
use alexis::core::transcript::Message;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Counts the input-ready notifications, one on mount and one per settled
/// exchange.
struct InputReady(mpsc::UnboundedReceiver<()>);

impl InputReady {
    async fn wait(&mut self, times: usize) {
        for _ in 0..times {
            timeout(Duration::from_secs(5), self.0.recv())
                .await
                .unwrap()
                .unwrap();
        }
    }
}

fn builder_for(server: &MockServer) -> (SessionBuilder, InputReady) {
    let (tx, rx) = mpsc::unbounded_channel();
    let builder = SessionBuilder::with_server_url(server.uri())
        .with_retry_backoff(Duration::from_millis(10))
        .on_input_ready(move || {
            tx.send(()).ok();
        });
    (builder, InputReady(rx))
}

#[tokio::test]
async fn test_question_and_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({ "question": "What is CS101 about?" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "answer": "It's an intro course." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (builder, mut input_ready) = builder_for(&server);
    let session = builder.build();
    input_ready.wait(1).await;

    session.send_message("What is CS101 about?").unwrap();
    input_ready.wait(1).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(
        snapshot.messages,
        vec![
            Message::bot(
                "Hi! I'm Alexis. How can I help you with your course today?"
            ),
            Message::user("What is CS101 about?"),
            Message::bot("It's an intro course."),
        ]
    );
    assert!(!snapshot.busy);
}

#[tokio::test]
async fn test_retry_after_service_unavailable() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with({
            let calls = Arc::clone(&calls);
            move |_: &wiremock::Request| {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "answer": "Back online." }))
                }
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let (builder, mut input_ready) = builder_for(&server);
    let session = builder.build();
    session.send_message("Are you there?").unwrap();
    input_ready.wait(2).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages[2], Message::bot("Back online."));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_application_error_is_not_leaked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "question is too long" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let diagnostics = Arc::new(Mutex::new(Vec::new()));
    let (builder, mut input_ready) = builder_for(&server);
    let session = builder
        .on_failure({
            let diagnostics = Arc::clone(&diagnostics);
            move |err| {
                diagnostics.lock().unwrap().push(err.to_string());
            }
        })
        .build();
    session.send_message("Tell me everything").unwrap();
    input_ready.wait(2).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages[2], Message::bot(DEFAULT_FAILURE_MESSAGE));
    assert_eq!(
        *diagnostics.lock().unwrap(),
        vec!["question is too long".to_owned()]
    );
}
