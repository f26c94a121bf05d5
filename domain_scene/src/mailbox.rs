//! Single-slot "latest value" handoff between a producer thread and the
//! frame loop.
//!
//! Publishing overwrites whatever is waiting; taking never blocks.  Only the
//! newest detection matters, so nothing is ever queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Mailbox { slot: Arc::clone(&self.slot) }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Mailbox { slot: Arc::new(Mutex::new(None)) }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning `true` if an unread value was overwritten.
    pub fn publish(&self, value: T) -> bool {
        self.lock().replace(value).is_some()
    }

    /// Take the waiting value, if any.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    // A panicking producer must not take the frame loop down with it.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn newest_value_wins() {
        let mb = Mailbox::new();
        assert!(!mb.publish(1));
        assert!(mb.publish(2));
        assert_eq!(mb.take(), Some(2));
        assert_eq!(mb.take(), None);
    }

    #[test]
    fn clones_share_the_slot() {
        let mb = Mailbox::new();
        let producer = mb.clone();
        thread::spawn(move || {
            for i in 0..100 {
                producer.publish(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(mb.take(), Some(99));
        assert!(mb.is_empty());
    }

    #[test]
    fn clear_discards_pending() {
        let mb = Mailbox::new();
        mb.publish("x");
        mb.clear();
        assert!(mb.is_empty());
    }
}
