use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use super::FormKind;

/// How long an inline message stays next to its form.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FormMessage {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        FormMessage {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// One message slot per form. Showing a message replaces the one already in the slot.
#[derive(Debug)]
pub struct MessageSlots {
    ttl: Duration,
    slots: HashMap<FormKind, (FormMessage, Instant)>,
}

impl Default for MessageSlots {
    fn default() -> Self {
        Self::new(MESSAGE_TTL)
    }
}

impl MessageSlots {
    pub fn new(ttl: Duration) -> Self {
        MessageSlots {
            ttl,
            slots: HashMap::new(),
        }
    }

    /// Returns the message that was replaced, if any.
    pub fn show(&mut self, form: FormKind, message: FormMessage, now: Instant) -> Option<FormMessage> {
        self.slots
            .insert(form, (message, now))
            .map(|(replaced, _)| replaced)
    }

    pub fn visible(&self, form: FormKind, now: Instant) -> Option<&FormMessage> {
        self.slots
            .get(&form)
            .filter(|(_, shown_at)| now.saturating_duration_since(*shown_at) < self.ttl)
            .map(|(message, _)| message)
    }

    /// Drops expired messages and returns the forms whose message went away.
    pub fn expire(&mut self, now: Instant) -> Vec<FormKind> {
        let expired: Vec<FormKind> = self
            .slots
            .iter()
            .filter(|(_, (_, shown_at))| now.saturating_duration_since(*shown_at) >= self.ttl)
            .map(|(form, _)| *form)
            .collect();

        for form in &expired {
            self.slots.remove(form);
        }

        expired
    }
}
