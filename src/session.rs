//! Session state and the phrase-processing pipeline.
//!
//! One `Session` owns the mutable state of a running terminal: the working
//! directory, the phrase history, and the activity log. Processing is
//! strictly sequential; exclusivity is expressed through `&mut self`, so a
//! second command cannot enter the pipeline while one is in flight.
//!
//! Control flow per phrase: intent matching (using the extractor, path
//! resolver, and sanitizer) -> optional confirmation gate -> execution
//! engine -> activity log. Every failure below an explicit exit phrase is
//! local: it is reported through the output sink and the session continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{debug, warn};

use crate::activity::ActivityLog;
use crate::confirm::ConfirmationGate;
use crate::exec::{ExecError, ExecOutcome, Executor, ShellInvocation};
use crate::feedback::{Notifier, Speaker};
use crate::intent::{self, vocab, Intent, RuleId, HELP_TEXT};
use crate::paths;
use crate::sanitize::sanitize_name;

/// Title used for toast notifications.
const TOAST_TITLE: &str = "Voice CMD";

/// Append-only text stream the session reports into.
pub trait OutputSink: Send {
    fn line(&mut self, text: &str);
}

/// Sink that prints to standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Where a phrase came from; becomes the activity log category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manual,
    Voice,
}

impl Source {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Voice => "VOICE",
        }
    }
}

/// What the caller should do after a phrase was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Continue,
    /// An exit phrase was processed; the caller terminates the session.
    Exit,
}

/// A running session: state, collaborators, and the pipeline.
pub struct Session {
    cwd: PathBuf,
    history: Vec<String>,
    log: ActivityLog,
    executor: Executor,
    gate: Box<dyn ConfirmationGate>,
    notifier: Box<dyn Notifier>,
    speaker: Box<dyn Speaker>,
    sink: Box<dyn OutputSink>,
}

impl Session {
    /// Creates a session rooted at `cwd`.
    ///
    /// # Errors
    ///
    /// Fails when `cwd` is not an existing directory; the working
    /// directory is never adopted speculatively.
    pub fn new(
        cwd: PathBuf,
        gate: Box<dyn ConfirmationGate>,
        notifier: Box<dyn Notifier>,
        speaker: Box<dyn Speaker>,
        sink: Box<dyn OutputSink>,
    ) -> Result<Self> {
        if !cwd.is_dir() {
            bail!("working directory does not exist: {}", cwd.display());
        }
        Ok(Self {
            cwd,
            history: Vec::new(),
            log: ActivityLog::new(),
            executor: Executor::new(),
            gate,
            notifier,
            speaker,
            sink,
        })
    }

    /// Overrides the execution engine. Test seam.
    #[must_use]
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// The current working directory.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Every phrase processed so far, in order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The activity log.
    #[must_use]
    pub fn activity(&self) -> &ActivityLog {
        &self.log
    }

    /// Processes one free-text phrase end to end: match, confirm where
    /// required, execute, report, log.
    pub async fn process(&mut self, raw: &str, source: Source) -> SessionEvent {
        let phrase = raw.trim();
        if phrase.is_empty() {
            return SessionEvent::Continue;
        }

        self.sink.line(&format!("\n> {phrase}"));
        self.history.push(phrase.to_string());
        self.log.append(source.tag(), phrase);

        let Some(intent) = intent::parse(phrase) else {
            warn!(%phrase, "unrecognized phrase (forbidden characters or empty)");
            self.report_unrecognized();
            return SessionEvent::Continue;
        };
        debug!(rule = ?intent.rule, param = ?intent.param, "matched intent");

        let event = if intent.rule == RuleId::Exit {
            SessionEvent::Exit
        } else {
            SessionEvent::Continue
        };

        if let Some(invocation) = self.interpret(&intent) {
            self.sink.line(&format!("Executing: {}", invocation.command));
            self.log.append("EXECUTE", &invocation.command);
            self.execute(&invocation).await;
        }

        event
    }

    /// Resolves an intent into an optional invocation, applying side
    /// effects (directory changes, file operations, confirmations) in
    /// place. Exposed so the interpretation step can be tested without
    /// executing anything.
    pub fn interpret(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        use RuleId::*;
        match intent.rule {
            Help => {
                self.sink.line(HELP_TEXT);
                None
            }
            Exit => Some(self.capture(vocab::EXIT_ACK)),
            SaveLog => {
                self.save_log_and_report();
                None
            }
            ClearScreen => {
                // Actual clearing is the front-end's concern.
                self.sink.line("Screen cleared. Type 'help' for commands.");
                None
            }
            TimeQuery => Some(self.capture(vocab::TIME_QUERY)),
            DateQuery => Some(self.capture(vocab::DATE_QUERY)),
            ChangeDir | GoTo => self.change_dir(intent),
            GoUp => self.go_up(),
            QuickJump(folder) => self.quick_jump(folder),
            CreateFile => self.create_file(intent),
            OpenFile => self.open_file(intent),
            DeleteFile => self.delete_file(intent),
            Rename => self.two_arg_fs_op(intent, FsOp::Rename),
            MoveItem => self.two_arg_fs_op(intent, FsOp::Move),
            CopyItem => self.two_arg_fs_op(intent, FsOp::Copy),
            ListFiles => Some(self.capture(vocab::LIST_DIR)),
            MakeDir => self.make_dir(intent),
            ListProcesses => Some(self.capture(vocab::PROCESS_LIST)),
            KillProcess => self.kill_process(intent),
            TaskManager => Some(self.launch(vocab::TASK_MANAGER)),
            SystemInfo => Some(self.capture(vocab::SYSTEM_INFO)),
            MemoryUsage => Some(self.capture(vocab::MEMORY_USAGE)),
            DiskSpace => Some(self.capture(vocab::DISK_SPACE)),
            BatteryStatus => Some(self.capture(vocab::BATTERY_STATUS)),
            NetworkInfo => Some(self.capture(vocab::NETWORK_INFO)),
            Calculator => Some(self.launch(vocab::CALCULATOR)),
            Notepad => Some(self.launch(vocab::NOTEPAD)),
            Paint => Some(self.launch(vocab::PAINT)),
            Passthrough => {
                let command = intent.param.clone()?;
                // Launcher prefixes keep fire-and-forget semantics even
                // through passthrough.
                if command.starts_with("start ") || command.starts_with("explorer ") {
                    Some(self.launch(&command))
                } else {
                    Some(self.capture(&command))
                }
            }
        }
    }

    /// Flushes the activity log to the working directory and reports the
    /// resulting file.
    pub fn save_log_and_report(&mut self) {
        match self.log.save(&self.cwd) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.sink.line(&format!("\nLog saved: {name}"));
                self.notifier.notify(TOAST_TITLE, &format!("Log saved: {name}"));
                self.speaker.say("Log saved");
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: Could not save log - {e}"));
                self.speaker.say("Failed to save log");
            }
        }
    }

    // ---- invocation construction ----

    fn capture(&self, command: &str) -> ShellInvocation {
        ShellInvocation::capture(command, self.cwd.clone())
    }

    fn launch(&self, command: &str) -> ShellInvocation {
        ShellInvocation::launch(command, self.cwd.clone())
    }

    // ---- navigation handlers ----

    fn change_dir(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(target) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let resolved = paths::resolve(target, &self.cwd);
        if resolved.is_dir() {
            self.adopt_cwd(resolved);
            Some(self.capture(vocab::LIST_DIR))
        } else {
            let msg = match intent.rule {
                RuleId::GoTo => "ERROR: Target directory not found",
                _ => "ERROR: Directory not found",
            };
            self.sink.line(msg);
            self.speaker.say("Directory not found");
            None
        }
    }

    fn go_up(&mut self) -> Option<ShellInvocation> {
        let parent = paths::resolve("..", &self.cwd);
        if parent.is_dir() {
            self.adopt_cwd(parent);
            Some(self.capture(vocab::LIST_DIR))
        } else {
            self.sink.line("ERROR: Could not go up");
            self.speaker.say("Could not go up");
            None
        }
    }

    fn quick_jump(&mut self, folder: paths::WellKnownFolder) -> Option<ShellInvocation> {
        match folder.locate() {
            Some(path) if path.is_dir() => {
                self.adopt_cwd(path);
                Some(self.capture(vocab::LIST_DIR))
            }
            _ => {
                self.sink.line("ERROR: Target folder not found");
                self.speaker.say("Target folder not found");
                None
            }
        }
    }

    /// Adopts a directory verified to exist at this moment.
    fn adopt_cwd(&mut self, path: PathBuf) {
        self.cwd = path;
        self.sink
            .line(&format!("Directory changed to: {}", self.cwd.display()));
        self.speaker.say("Directory changed");
    }

    // ---- file operation handlers ----

    fn create_file(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(raw) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let mut name = sanitize_name(raw);
        if !name.contains('.') {
            name.push_str(vocab::DEFAULT_EXTENSION);
        }
        match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.cwd.join(&name))
        {
            Ok(_) => {
                self.sink.line(&format!("Created file: {name}"));
                self.speaker.say("File created");
                Some(self.capture(vocab::LIST_DIR))
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: {e}"));
                self.speaker.say("Failed to create file");
                None
            }
        }
    }

    fn open_file(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(raw) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let name = sanitize_name(raw);
        let full = self.cwd.join(&name);
        if full.exists() {
            Some(self.launch(&vocab::open_file(&full.to_string_lossy())))
        } else {
            self.sink.line("ERROR: File not found");
            self.speaker.say("File not found");
            None
        }
    }

    fn delete_file(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(raw) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let name = sanitize_name(raw);
        let full = self.cwd.join(&name);
        if !full.is_file() {
            self.sink.line("ERROR: File not found");
            self.speaker.say("File not found");
            return None;
        }
        if !self
            .gate
            .confirm("Confirm Delete", &format!("Delete file '{name}'?"))
        {
            self.sink.line("Delete cancelled");
            return None;
        }
        match fs::remove_file(&full) {
            Ok(()) => {
                self.sink.line(&format!("Deleted file: {name}"));
                self.speaker.say("File deleted");
                Some(self.capture(vocab::LIST_DIR))
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: {e}"));
                self.speaker.say("Failed to delete file");
                None
            }
        }
    }

    fn two_arg_fs_op(&mut self, intent: &Intent, op: FsOp) -> Option<ShellInvocation> {
        let Some((src, dst)) = intent
            .param
            .as_deref()
            .and_then(|p| p.split_once(" to "))
        else {
            self.sink.line(&format!("Usage: {}", op.usage()));
            return None;
        };
        let src = sanitize_name(src);
        let dst = sanitize_name(dst);
        let src_path = self.cwd.join(&src);
        let dst_path = self.cwd.join(&dst);
        if !src_path.exists() {
            self.sink.line("ERROR: Source not found");
            self.speaker.say("Source not found");
            return None;
        }
        let result = match op {
            FsOp::Rename | FsOp::Move => fs::rename(&src_path, &dst_path),
            FsOp::Copy => copy_recursive(&src_path, &dst_path),
        };
        match result {
            Ok(()) => {
                self.sink.line(&op.done_message(&src, &dst));
                self.speaker.say(op.done_speech());
                Some(self.capture(vocab::LIST_DIR))
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: {e}"));
                self.speaker.say(op.failed_speech());
                None
            }
        }
    }

    fn make_dir(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(raw) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let name = sanitize_name(raw);
        match fs::create_dir_all(self.cwd.join(&name)) {
            Ok(()) => {
                self.sink.line(&format!("Directory created: {name}"));
                self.speaker.say("Directory created");
                Some(self.capture(vocab::LIST_DIR))
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: {e}"));
                self.speaker.say("Failed to create directory");
                None
            }
        }
    }

    // ---- system handlers ----

    fn kill_process(&mut self, intent: &Intent) -> Option<ShellInvocation> {
        let Some(raw) = intent.param.as_deref() else {
            self.report_unrecognized();
            return None;
        };
        let name = sanitize_name(raw);
        let image = if name.to_lowercase().ends_with(vocab::PROCESS_SUFFIX) {
            name
        } else {
            format!("{name}{}", vocab::PROCESS_SUFFIX)
        };
        if self
            .gate
            .confirm("Confirm Kill", &format!("Terminate process '{image}'?"))
        {
            Some(self.capture(&vocab::kill_process(&image)))
        } else {
            self.sink.line("Kill cancelled");
            None
        }
    }

    // ---- execution and reporting ----

    async fn execute(&mut self, invocation: &ShellInvocation) {
        match self.executor.run(invocation).await {
            Ok(ExecOutcome::Launched) => {
                self.sink.line("OK - Application launched");
                self.notifier.notify(TOAST_TITLE, "Application launched");
                self.speaker.say("Application launched");
            }
            Ok(ExecOutcome::Completed(out)) => {
                if !out.stdout.is_empty() {
                    self.sink.line(&out.stdout);
                }
                if out.success() {
                    self.sink.line("OK");
                    self.notifier
                        .notify(TOAST_TITLE, "Command executed successfully");
                    self.speaker.say("Command executed successfully");
                } else {
                    self.sink
                        .line(&format!("ERROR: Exit code {}", out.exit_code));
                    if !out.stderr.is_empty() {
                        self.sink.line(&out.stderr);
                    }
                    self.notifier.notify(TOAST_TITLE, "Command failed");
                    self.speaker.say("Command failed");
                }
            }
            Err(ExecError::Timeout { .. }) => {
                self.sink.line("ERROR: Command timed out");
                self.notifier.notify(TOAST_TITLE, "Command timed out");
                self.speaker.say("Command timed out");
            }
            Err(e) => {
                self.sink.line(&format!("ERROR: {e}"));
                self.notifier.notify(TOAST_TITLE, "Unexpected error");
                self.speaker.say("Unexpected error");
            }
        }
    }

    fn report_unrecognized(&mut self) {
        self.sink
            .line("ERROR: Command not recognized. Type 'help' for commands.");
        self.speaker.say("Command not recognized");
    }
}

/// Two-argument filesystem operations sharing the `<src> to <dst>` shape.
#[derive(Debug, Clone, Copy)]
enum FsOp {
    Rename,
    Move,
    Copy,
}

impl FsOp {
    fn usage(self) -> &'static str {
        match self {
            Self::Rename => "rename <old> to <new>",
            Self::Move => "move <src> to <dst>",
            Self::Copy => "copy <src> to <dst>",
        }
    }

    fn done_message(self, src: &str, dst: &str) -> String {
        match self {
            Self::Rename => format!("Renamed '{src}' to '{dst}'"),
            Self::Move => format!("Moved '{src}' to '{dst}'"),
            Self::Copy => format!("Copied '{src}' to '{dst}'"),
        }
    }

    fn done_speech(self) -> &'static str {
        match self {
            Self::Rename => "Rename completed",
            Self::Move => "Move completed",
            Self::Copy => "Copy completed",
        }
    }

    fn failed_speech(self) -> &'static str {
        match self {
            Self::Rename => "Rename failed",
            Self::Move => "Move failed",
            Self::Copy => "Copy failed",
        }
    }
}

/// Copies a file, or a directory tree recursively.
fn copy_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AssumeYesGate, DenyAllGate};
    use crate::exec::ExecMode;
    use crate::feedback::{NoopNotifier, NoopSpeaker};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct TestSink(Arc<Mutex<Vec<String>>>);

    impl OutputSink for TestSink {
        fn line(&mut self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    impl TestSink {
        fn contains(&self, needle: &str) -> bool {
            self.0.lock().unwrap().iter().any(|l| l.contains(needle))
        }
    }

    fn session_in(dir: &Path, gate: Box<dyn ConfirmationGate>) -> (Session, TestSink) {
        let sink = TestSink::default();
        let session = Session::new(
            dir.to_path_buf(),
            gate,
            Box::new(NoopNotifier),
            Box::new(NoopSpeaker),
            Box::new(sink.clone()),
        )
        .unwrap();
        (session, sink)
    }

    fn interpret(session: &mut Session, phrase: &str) -> Option<ShellInvocation> {
        let intent = intent::parse(phrase).unwrap();
        session.interpret(&intent)
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let result = Session::new(
            PathBuf::from("/definitely/not/a/real/dir"),
            Box::new(DenyAllGate),
            Box::new(NoopNotifier),
            Box::new(NoopSpeaker),
            Box::new(StdoutSink),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_file_gets_default_extension() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        let follow_up = interpret(&mut session, "create file notes").unwrap();
        assert!(dir.path().join("notes.txt").is_file());
        assert_eq!(follow_up.command, vocab::LIST_DIR);
    }

    #[test]
    fn test_create_file_keeps_given_extension() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        interpret(&mut session, "create file report.md").unwrap();
        assert!(dir.path().join("report.md").is_file());
    }

    #[test]
    fn test_delete_declined_produces_no_invocation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doomed.txt"), "x").unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        assert_eq!(interpret(&mut session, "delete file doomed.txt"), None);
        assert!(dir.path().join("doomed.txt").exists());
        assert!(sink.contains("Delete cancelled"));
    }

    #[test]
    fn test_delete_approved_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doomed.txt"), "x").unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(AssumeYesGate));

        let follow_up = interpret(&mut session, "delete file doomed.txt").unwrap();
        assert!(!dir.path().join("doomed.txt").exists());
        assert_eq!(follow_up.command, vocab::LIST_DIR);
        assert!(sink.contains("Deleted file: doomed.txt"));
    }

    #[test]
    fn test_kill_process_appends_exe_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(AssumeYesGate));

        let inv = interpret(&mut session, "kill process chrome").unwrap();
        assert_eq!(inv.command, "taskkill /f /im \"chrome.exe\"");
        assert_eq!(inv.mode, ExecMode::Capture);
    }

    #[test]
    fn test_kill_process_keeps_existing_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(AssumeYesGate));

        let inv = interpret(&mut session, "kill process chrome.exe").unwrap();
        assert_eq!(inv.command, "taskkill /f /im \"chrome.exe\"");
    }

    #[test]
    fn test_kill_declined_produces_no_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        assert_eq!(interpret(&mut session, "kill process chrome"), None);
        assert!(sink.contains("Kill cancelled"));
    }

    #[test]
    fn test_change_dir_and_go_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        let follow_up = interpret(&mut session, "cd sub").unwrap();
        assert_eq!(session.cwd(), dir.path().join("sub"));
        assert_eq!(follow_up.command, vocab::LIST_DIR);

        interpret(&mut session, "go up").unwrap();
        assert_eq!(session.cwd(), dir.path());
    }

    #[test]
    fn test_change_dir_missing_leaves_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        assert_eq!(interpret(&mut session, "cd nowhere"), None);
        assert_eq!(session.cwd(), dir.path());
        assert!(sink.contains("ERROR: Directory not found"));
    }

    #[test]
    fn test_go_to_missing_target_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        assert_eq!(interpret(&mut session, "go to nowhere"), None);
        assert_eq!(session.cwd(), dir.path());
        assert!(sink.contains("ERROR: Target directory not found"));
    }

    #[test]
    fn test_rename_and_move() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        interpret(&mut session, "rename a.txt to b.txt").unwrap();
        assert!(dir.path().join("b.txt").exists());
        assert!(!dir.path().join("a.txt").exists());

        std::fs::create_dir(dir.path().join("inbox")).unwrap();
        interpret(&mut session, "move b.txt to inbox/b.txt").unwrap();
        assert!(dir.path().join("inbox/b.txt").exists());
    }

    #[test]
    fn test_copy_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        std::fs::write(dir.path().join("src/nested/f.txt"), "x").unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        interpret(&mut session, "copy src to dst").unwrap();
        assert!(dir.path().join("dst/nested/f.txt").is_file());
        assert!(dir.path().join("src/nested/f.txt").is_file());
    }

    #[test]
    fn test_rename_without_to_reports_usage() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        assert_eq!(interpret(&mut session, "rename a.txt"), None);
        assert!(sink.contains("Usage: rename <old> to <new>"));
    }

    #[test]
    fn test_make_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        interpret(&mut session, "create directory backup").unwrap();
        assert!(dir.path().join("backup").is_dir());
    }

    #[test]
    fn test_launchers_are_launch_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        for (phrase, template) in [
            ("calculator", vocab::CALCULATOR),
            ("notepad", vocab::NOTEPAD),
            ("paint", vocab::PAINT),
            ("task manager", vocab::TASK_MANAGER),
        ] {
            let inv = interpret(&mut session, phrase).unwrap();
            assert_eq!(inv.command, template);
            assert_eq!(inv.mode, ExecMode::Launch, "{phrase}");
        }
    }

    #[test]
    fn test_passthrough_start_prefix_is_launch_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        let inv = interpret(&mut session, "start winver").unwrap();
        assert_eq!(inv.mode, ExecMode::Launch);
        let inv = interpret(&mut session, "ping localhost").unwrap();
        assert_eq!(inv.mode, ExecMode::Capture);
    }

    #[test]
    fn test_invocation_snapshots_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        interpret(&mut session, "cd sub").unwrap();
        let inv = interpret(&mut session, "list files").unwrap();
        assert_eq!(inv.cwd, dir.path().join("sub"));
    }

    #[tokio::test]
    async fn test_process_pipe_phrase_reports_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        let event = session.process("foo | bar", Source::Manual).await;
        assert_eq!(event, SessionEvent::Continue);
        assert!(sink.contains("ERROR: Command not recognized"));
        // The phrase is still logged even though nothing executed.
        assert_eq!(session.activity().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_process_exit_phrase_signals_exit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        let event = session.process("exit", Source::Manual).await;
        assert_eq!(event, SessionEvent::Exit);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_process_failure_keeps_session_usable() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, sink) = session_in(dir.path(), Box::new(DenyAllGate));

        // Passthrough command that exits non-zero.
        let event = session.process("false", Source::Manual).await;
        assert_eq!(event, SessionEvent::Continue);
        assert!(sink.contains("ERROR: Exit code"));

        // Session continues to work afterwards.
        let event = session.process("echo still alive", Source::Manual).await;
        assert_eq!(event, SessionEvent::Continue);
        assert!(sink.contains("still alive"));
    }

    #[tokio::test]
    async fn test_process_logs_intent_and_execution() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _sink) = session_in(dir.path(), Box::new(DenyAllGate));

        session.process("echo hi", Source::Voice).await;
        let entries = session.activity().entries();
        assert_eq!(entries[0].category, "VOICE");
        assert_eq!(entries[0].message, "echo hi");
        assert_eq!(entries[1].category, "EXECUTE");
        assert_eq!(entries[1].message, "echo hi");
    }
}
