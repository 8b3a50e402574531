// ABOUTME: Folds streamed content fragments into a single assistant message
// ABOUTME: Inserts the message on the first fragment and rewrites it with the full text afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use uuid::Uuid;

use super::session::CopilotMessage;

/// Running state of one assistant reply
#[derive(Debug, Default)]
pub struct DeltaAccumulator {
    reply_id: Option<Uuid>,
    text: String,
}

impl DeltaAccumulator {
    /// Start a new, empty reply
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one fragment to the transcript
    ///
    /// The first non-empty fragment appends an assistant message with a fresh
    /// id. Later fragments replace that message's content with the whole text
    /// so far. Empty fragments are ignored.
    pub fn apply(&mut self, fragment: &str, messages: &mut Vec<CopilotMessage>) {
        if fragment.is_empty() {
            return;
        }
        self.text.push_str(fragment);

        let existing = self
            .reply_id
            .and_then(|id| messages.iter_mut().find(|message| message.id == id));

        match existing {
            Some(message) => message.content.clone_from(&self.text),
            None => {
                let message = CopilotMessage::assistant(self.text.clone());
                self.reply_id = Some(message.id);
                messages.push(message);
            }
        }
    }

    /// Text accumulated so far
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Id of the assistant message, once created
    #[must_use]
    pub const fn reply_id(&self) -> Option<Uuid> {
        self.reply_id
    }
}
