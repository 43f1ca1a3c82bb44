//! Confirmation gate for destructive actions.
//!
//! Delete-file and kill-process intents must pass through this gate before
//! their invocations are ever constructed. The gate blocks the calling flow
//! until a human answers; declining aborts the action entirely.

use std::io::{self, BufRead, Write};

use tracing::debug;

/// Blocking approve/deny checkpoint.
pub trait ConfirmationGate: Send {
    /// Presents `title` and `message` and waits for an answer.
    /// `true` approves the action; `false` aborts it.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// Interactive gate reading a y/N answer from standard input.
pub struct StdinGate;

impl ConfirmationGate for StdinGate {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        print!("[{title}] {message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => {
                let answer = line.trim().eq_ignore_ascii_case("y")
                    || line.trim().eq_ignore_ascii_case("yes");
                debug!(title, approved = answer, "confirmation answered");
                answer
            }
            Err(_) => false,
        }
    }
}

/// Gate that approves everything. Selected by `--assume-yes`.
pub struct AssumeYesGate;

impl ConfirmationGate for AssumeYesGate {
    fn confirm(&mut self, title: &str, _message: &str) -> bool {
        debug!(title, "confirmation auto-approved");
        true
    }
}

/// Gate that declines everything. Useful for non-interactive contexts
/// where destructive actions must never proceed.
pub struct DenyAllGate;

impl ConfirmationGate for DenyAllGate {
    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        false
    }
}
