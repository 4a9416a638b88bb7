//! One-shot messages carried across a navigation.

use std::sync::{Arc, Mutex, PoisonError};

/// Single-slot message channel: the landing screen reads it once.
#[derive(Debug, Clone, Default)]
pub struct FlashMessages {
    slot: Arc<Mutex<Option<String>>>,
}

impl FlashMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave a message for the next screen, replacing any unread one.
    pub fn put(&self, message: impl Into<String>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Consume the pending message.
    pub fn take(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_read_once() {
        let flash = FlashMessages::new();
        flash.put("Your session has expired.");

        assert_eq!(flash.take().as_deref(), Some("Your session has expired."));
        assert_eq!(flash.take(), None);
        assert!(flash.is_empty());
    }

    #[test]
    fn newer_message_wins() {
        let flash = FlashMessages::new();
        flash.clone().put("first");
        flash.put("second");
        assert_eq!(flash.take().as_deref(), Some("second"));
    }
}
