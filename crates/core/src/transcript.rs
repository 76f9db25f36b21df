//! Transcript-related types.

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person typing questions.
    User,
    /// The answering service, including the placeholder and failure texts.
    Bot,
}

/// A message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote this message.
    pub sender: Sender,
    /// The message text.
    pub text: String,
}

impl Message {
    /// Creates a message from the user.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Creates a message from the bot.
    #[inline]
    pub fn bot<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Describes how the transcript has just changed.
///
/// Every change affects the tail of the transcript, so views that keep the
/// newest message visible should scroll to the bottom on each change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranscriptChange {
    /// A message was added at `index`.
    Appended {
        /// Index of the new message.
        index: usize,
    },
    /// The message at `index` (always the last one) was overwritten.
    Replaced {
        /// Index of the overwritten message.
        index: usize,
    },
}

/// The view of the transcript passed to `on_update` callbacks.
#[derive(Clone, Copy, Debug)]
pub struct TranscriptUpdate<'a> {
    /// All messages in display order.
    pub messages: &'a [Message],
    /// What changed.
    pub change: TranscriptChange,
}

impl TranscriptUpdate<'_> {
    /// Returns the message that has changed.
    #[inline]
    pub fn changed_message(&self) -> Option<&Message> {
        let index = match self.change {
            TranscriptChange::Appended { index } => index,
            TranscriptChange::Replaced { index } => index,
        };
        self.messages.get(index)
    }
}

/// The ordered message history of a chat.
///
/// A transcript is never empty: it always starts with the greeting. Only the
/// chat itself mutates it, and the only in-place mutation is overwriting the
/// last message.
#[derive(Clone, Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    // Whether the last message is a placeholder reserved for an outcome.
    placeholder_reserved: bool,
}

impl Transcript {
    pub(crate) fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
            placeholder_reserved: false,
        }
    }

    /// Returns all messages in display order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages, the greeting included.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns the last message.
    #[inline]
    pub fn last(&self) -> &Message {
        // The transcript always holds at least the greeting.
        &self.messages[self.messages.len() - 1]
    }

    /// Returns `true` if the last message is a placeholder that is still
    /// awaiting its outcome.
    #[inline]
    pub fn has_pending_placeholder(&self) -> bool {
        self.placeholder_reserved
    }

    pub(crate) fn append(&mut self, msg: Message) -> TranscriptChange {
        self.messages.push(msg);
        // Whatever was reserved is no longer the tail.
        self.placeholder_reserved = false;
        TranscriptChange::Appended {
            index: self.messages.len() - 1,
        }
    }

    /// Overwrites the last message with a bot message. Misuse silently
    /// overwrites whatever message is last.
    pub(crate) fn replace_last<S: Into<String>>(
        &mut self,
        text: S,
    ) -> TranscriptChange {
        let index = self.messages.len() - 1;
        self.messages[index] = Message::bot(text);
        TranscriptChange::Replaced { index }
    }

    /// Appends a bot placeholder and reserves it for a later outcome.
    pub(crate) fn reserve_placeholder<S: Into<String>>(
        &mut self,
        text: S,
    ) -> TranscriptChange {
        let change = self.append(Message::bot(text));
        self.placeholder_reserved = true;
        change
    }

    /// Finalizes the reserved placeholder with `text`.
    pub(crate) fn settle_placeholder<S: Into<String>>(
        &mut self,
        text: S,
    ) -> TranscriptChange {
        if !self.placeholder_reserved {
            warn!("settling a placeholder that is not reserved");
        }
        self.placeholder_reserved = false;
        self.replace_last(text)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_greeting() {
        let transcript = Transcript::with_greeting("Hello");
        assert_eq!(transcript.messages(), &[Message::bot("Hello")]);
        assert!(!transcript.has_pending_placeholder());
    }

    #[test]
    fn test_append_reports_index() {
        let mut transcript = Transcript::with_greeting("Hello");
        let change = transcript.append(Message::user("Hi"));
        assert_eq!(change, TranscriptChange::Appended { index: 1 });
        assert_eq!(transcript.last(), &Message::user("Hi"));
    }

    #[test]
    fn test_replace_last_keeps_length() {
        let mut transcript = Transcript::with_greeting("Hello");
        transcript.append(Message::user("Hi"));
        transcript.append(Message::user("Anyone?"));

        let change = transcript.replace_last("overwritten");
        assert_eq!(change, TranscriptChange::Replaced { index: 2 });
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.messages()[1], Message::user("Hi"));
        // The sender is forced to bot.
        assert_eq!(transcript.last(), &Message::bot("overwritten"));
    }

    #[test]
    fn test_placeholder_two_phase_commit() {
        let mut transcript = Transcript::with_greeting("Hello");
        transcript.append(Message::user("What is CS101 about?"));
        transcript.reserve_placeholder("Thinking…");
        assert!(transcript.has_pending_placeholder());
        assert_eq!(transcript.len(), 3);

        let change = transcript.settle_placeholder("It's an intro course.");
        assert_eq!(change, TranscriptChange::Replaced { index: 2 });
        assert!(!transcript.has_pending_placeholder());
        assert_eq!(transcript.last(), &Message::bot("It's an intro course."));
    }

    #[test]
    fn test_append_releases_reservation() {
        let mut transcript = Transcript::with_greeting("Hello");
        transcript.reserve_placeholder("Thinking…");
        transcript.append(Message::user("Next question"));
        assert!(!transcript.has_pending_placeholder());
        transcript.reserve_placeholder("Thinking…");
        assert!(transcript.has_pending_placeholder());
        assert_eq!(transcript.messages()[1], Message::bot("Thinking…"));
    }

    #[test]
    fn test_changed_message() {
        let mut transcript = Transcript::with_greeting("Hello");
        let change = transcript.append(Message::user("Hi"));
        let update = TranscriptUpdate {
            messages: transcript.messages(),
            change,
        };
        assert_eq!(update.changed_message(), Some(&Message::user("Hi")));
        assert_eq!(transcript.into_iter().count(), 2);
    }
}
