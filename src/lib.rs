//! Speakshell - voice-assisted terminal core.
//!
//! Turns free-form phrases (typed or transcribed from speech) into
//! concrete OS command invocations, executed with output capture,
//! timeouts, and safety confirmations for destructive actions.
//!
//! Matching is phrase/keyword based over a fixed vocabulary, plus a
//! restricted raw passthrough. The passthrough trust boundary is
//! deliberately broad: any phrase matching no fixed rule is executed
//! verbatim as long as it contains none of the forbidden shell
//! metacharacters (`& | ; > < \``). See [`intent`] for the ordered rule
//! table and [`sanitize`] for the metacharacter set.
//!
//! Audio capture, speech recognition, text-to-speech, and desktop
//! notifications are external collaborators behind the traits in
//! [`listen`] and [`feedback`]; the core ships no-op implementations.

pub mod activity;
pub mod confirm;
pub mod exec;
pub mod extract;
pub mod feedback;
pub mod intent;
pub mod listen;
pub mod paths;
pub mod sanitize;
pub mod session;

// Re-export the pipeline entry points for convenient access
pub use session::{Session, SessionEvent, Source};
