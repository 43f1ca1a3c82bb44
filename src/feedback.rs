//! Side-channel feedback capabilities: desktop toasts and spoken replies.
//!
//! Both are external collaborators, modeled as capability traits with
//! no-op implementations selected at startup and injected into the session.
//! The core never branches on backend availability, and both channels are
//! best-effort by contract: the trait methods are infallible, so a broken
//! backend can only swallow its own failure.

use tracing::debug;

/// Desktop toast notifications.
pub trait Notifier: Send {
    fn notify(&self, title: &str, message: &str);
}

/// Spoken text feedback.
pub trait Speaker: Send {
    fn say(&self, text: &str);
}

/// Notifier that drops every notification.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// Speaker that stays silent.
pub struct NoopSpeaker;

impl Speaker for NoopSpeaker {
    fn say(&self, _text: &str) {}
}

/// Notifier that forwards to the tracing log. Used with `--debug` so
/// toast traffic is visible without a desktop backend.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str) {
        debug!(title, message, "toast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_channels_do_nothing() {
        NoopNotifier.notify("Voice CMD", "Command executed successfully");
        NoopSpeaker.say("Command executed successfully");
    }
}
