use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A single message that disappears on its own after a while.
///
/// Showing a new message replaces the current one and restarts its timer.
/// Expiry is evaluated on read, so nothing runs in the background.
pub struct MessageSlot {
    default_duration: Duration,
    current: Mutex<Option<(String, Instant)>>,
}

impl MessageSlot {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            current: Mutex::new(None),
        }
    }

    pub fn show(&self, message: impl Into<String>) {
        self.show_for(message, self.default_duration);
    }

    pub fn show_for(&self, message: impl Into<String>, duration: Duration) {
        let expires_at = Instant::now() + duration;
        *self.lock() = Some((message.into(), expires_at));
    }

    pub fn current(&self) -> Option<String> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                *slot = None;
                None
            }
            Some((message, _)) => Some(message.clone()),
            None => None,
        }
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(String, Instant)>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Error and success slots belonging to one form
pub struct Notices {
    pub error: MessageSlot,
    pub success: MessageSlot,
}

impl Notices {
    pub fn new(duration: Duration) -> Self {
        Self {
            error: MessageSlot::new(duration),
            success: MessageSlot::new(duration),
        }
    }

    pub fn clear(&self) {
        self.error.clear();
        self.success.clear();
    }
}
