//! A terminal front end for the Alexis chat.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use alexis::SessionBuilder;
use alexis::core::transcript::{Message, Sender, TranscriptChange};
use alexis_http_model::HttpConfigBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Update(Message, TranscriptChange),
    InputReady,
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(server_url) = env::var("ALEXIS_SERVER_URL") else {
        eprintln!("ALEXIS_SERVER_URL environment variable is not set");
        return;
    };
    let mut config = HttpConfigBuilder::with_server_url(server_url);
    if let Ok(ask_path) = env::var("ALEXIS_ASK_PATH") {
        config = config.with_ask_path(ask_path);
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let session = SessionBuilder::with_config(config.build())
        .on_update({
            let event_tx = event_tx.clone();
            move |update| {
                let Some(msg) = update.changed_message() else {
                    return;
                };
                event_tx
                    .send(SessionEvent::Update(msg.clone(), update.change))
                    .ok();
            }
        })
        .on_input_ready({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::InputReady).ok();
            }
        })
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut stdin = BufReader::new(io::stdin());
    'outer: loop {
        let mut progress_bar: Option<ProgressBar> = None;

        // Render until the chat hands the input back to us.
        loop {
            if let Some(progress_bar) = &progress_bar {
                progress_bar.inc(1);
            }

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            match event {
                SessionEvent::Update(
                    msg,
                    TranscriptChange::Appended { index },
                ) => match msg.sender {
                    // Already on the screen as typed.
                    Sender::User => {}
                    // The greeting.
                    Sender::Bot if index == 0 => print_bot(&msg.text),
                    Sender::Bot => {
                        let bar = ProgressBar::new_spinner();
                        bar.set_style(progress_style.clone());
                        bar.set_message(msg.text);
                        progress_bar = Some(bar);
                    }
                },
                SessionEvent::Update(msg, TranscriptChange::Replaced { .. }) => {
                    if let Some(progress_bar) = progress_bar.take() {
                        progress_bar.finish_and_clear();
                    }
                    print_bot(&msg.text);
                }
                SessionEvent::InputReady => {
                    break;
                }
            }
        }

        // Blank messages are never sent, and the chat would stay silent.
        let message = loop {
            let Some(message) = read_message(&mut stdin).await else {
                break 'outer;
            };
            if !message.trim().is_empty() {
                break message;
            }
        };
        if session.send_message(&message).is_err() {
            break;
        }
    }

    session.close();
}

fn print_bot(text: &str) {
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), text.bright_white());
}

/// Reads one message, where a line ending with `\` continues on the next
/// line.
async fn read_message(stdin: &mut BufReader<Stdin>) -> Option<String> {
    let mut message = String::new();
    let mut prompt = "> ";
    loop {
        print!("{prompt}");
        std::io::stdout().flush().ok();

        let line = read_line(stdin).await?;
        let line = line.trim_end_matches(['\r', '\n']);
        match line.strip_suffix('\\') {
            Some(continued) => {
                message.push_str(continued);
                message.push('\n');
                prompt = "… ";
            }
            None => {
                message.push_str(line);
                return Some(message);
            }
        }
    }
}

async fn read_line(stdin: &mut BufReader<Stdin>) -> Option<String> {
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
