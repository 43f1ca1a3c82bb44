//! Append-only activity log.
//!
//! Every processed intent and executed command is recorded here. Entries
//! are immutable once appended and keep insertion order. On demand (and on
//! session exit) the full sequence is flushed to a timestamp-suffixed
//! plain-text file.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

/// File name prefix for flushed logs.
pub const LOG_FILE_PREFIX: &str = "voice_cmd_log_";

/// Banner written at the top of every flushed log file.
pub const LOG_BANNER: &str = "VOICE CMD TERMINAL - HIGH ACCURACY MODE - ACTIVITY LOG";

/// One immutable log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Local>,
    pub category: String,
    pub message: String,
}

impl ActivityEntry {
    /// Renders the entry in the on-disk line format.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.category,
            self.message
        )
    }
}

/// Strictly ordered, append-only sequence of activity entries.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a timestamped entry. Entries are never mutated or removed
    /// afterwards.
    pub fn append(&mut self, category: &str, message: &str) {
        self.entries.push(ActivityEntry {
            timestamp: Local::now(),
            category: category.to_string(),
            message: message.to_string(),
        });
    }

    /// Read-only view of the recorded entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flushes the full sequence to a newly named file under `dir` and
    /// returns its path. The file gets the fixed banner, a rule of 80 `=`
    /// characters, a blank line, then one rendered entry per line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be written;
    /// the in-memory log is unaffected either way.
    pub fn save(&self, dir: &Path) -> io::Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{LOG_FILE_PREFIX}{stamp}.txt"));

        let mut contents = String::new();
        contents.push_str(LOG_BANNER);
        contents.push('\n');
        contents.push_str(&"=".repeat(80));
        contents.push_str("\n\n");
        for entry in &self.entries {
            contents.push_str(&entry.render());
            contents.push('\n');
        }

        std::fs::write(&path, contents)?;
        info!(path = %path.display(), entries = self.entries.len(), "activity log saved");
        Ok(path)
    }
}
