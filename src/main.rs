//! Speakshell - voice-assisted terminal.
//!
//! Thin line-oriented front-end over the session pipeline: phrases arrive
//! from stdin (or the voice listener channel), go through the intent
//! matcher and execution engine, and results stream back to stdout. The
//! activity log is flushed on demand and on session exit.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use speakshell::confirm::{AssumeYesGate, ConfirmationGate, StdinGate};
use speakshell::feedback::{NoopNotifier, NoopSpeaker, Notifier, TracingNotifier};
use speakshell::listen::{Listener, RecognitionTuning, UnavailableBackend};
use speakshell::session::{Session, SessionEvent, Source, StdoutSink};

const WELCOME_HEADER: &str = "\
================================================================================
                                SPEAK SHELL
================================================================================";

#[derive(Parser, Debug)]
#[command(name = "speakshell")]
#[command(about = "Speakshell - voice-assisted terminal: phrases in, commands out")]
#[command(version)]
struct Args {
    /// Working directory to start the session in.
    #[arg(short = 'C', long, default_value = ".")]
    directory: std::path::PathBuf,

    /// Enable debug logging (to stderr, away from the command output).
    #[arg(long)]
    debug: bool,

    /// Approve all confirmation prompts (DANGEROUS: destructive actions
    /// proceed without asking).
    #[arg(long)]
    assume_yes: bool,

    /// Process a single phrase and exit instead of starting the REPL.
    #[arg(short = 'e', long, value_name = "PHRASE")]
    exec: Option<String>,

    /// Start the voice listener alongside typed input.
    #[arg(long)]
    voice: bool,
}

/// Confirmation gate for the REPL. The stdin reader thread owns standard
/// input; while `waiting` is set it diverts the next line here instead of
/// treating it as a command.
struct PromptGate {
    waiting: Arc<AtomicBool>,
    answers: std_mpsc::Receiver<String>,
}

impl ConfirmationGate for PromptGate {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        print!("[{title}] {message} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        self.waiting.store(true, Ordering::SeqCst);
        let answer = match self.answers.recv() {
            Ok(line) => {
                let line = line.trim();
                line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes")
            }
            Err(_) => false,
        };
        self.waiting.store(false, Ordering::SeqCst);
        answer
    }
}

/// Spawns the stdin reader thread. Lines go to `line_tx` normally, or to
/// `answer_tx` while a confirmation prompt is pending.
fn spawn_stdin_reader(
    waiting: Arc<AtomicBool>,
    line_tx: mpsc::UnboundedSender<String>,
    answer_tx: std_mpsc::Sender<String>,
) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if waiting.load(Ordering::SeqCst) {
                if answer_tx.send(line).is_err() {
                    break;
                }
            } else if line_tx.send(line).is_err() {
                break;
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "speakshell=debug" } else { "speakshell=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let cwd = args
        .directory
        .canonicalize()
        .with_context(|| format!("invalid working directory: {}", args.directory.display()))?;

    let notifier: Box<dyn Notifier> = if args.debug {
        Box::new(TracingNotifier)
    } else {
        Box::new(NoopNotifier)
    };

    // One-shot mode: no competing stdin reader, the plain gate suffices.
    if let Some(phrase) = args.exec {
        let gate: Box<dyn ConfirmationGate> = if args.assume_yes {
            Box::new(AssumeYesGate)
        } else {
            Box::new(StdinGate)
        };
        let mut session = Session::new(
            cwd,
            gate,
            notifier,
            Box::new(NoopSpeaker),
            Box::new(StdoutSink),
        )?;
        session.process(&phrase, Source::Manual).await;
        session.save_log_and_report();
        return Ok(());
    }

    let waiting = Arc::new(AtomicBool::new(false));
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let (answer_tx, answer_rx) = std_mpsc::channel();
    spawn_stdin_reader(Arc::clone(&waiting), line_tx, answer_tx);

    let gate: Box<dyn ConfirmationGate> = if args.assume_yes {
        Box::new(AssumeYesGate)
    } else {
        Box::new(PromptGate { waiting, answers: answer_rx })
    };

    let mut session = Session::new(
        cwd,
        gate,
        notifier,
        Box::new(NoopSpeaker),
        Box::new(StdoutSink),
    )?;

    println!("{WELCOME_HEADER}");
    println!("Type commands, or 'help' for the vocabulary. 'exit' quits.");
    println!("CWD: {}", session.cwd().display());

    let (voice_tx, mut voice_rx) = mpsc::unbounded_channel();
    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let listener = if args.voice {
        // No recognition stack is bundled; the listener reports the
        // missing backend and typed input remains available.
        Some(Listener::spawn(
            Box::new(UnavailableBackend),
            RecognitionTuning::default(),
            voice_tx,
            status_tx,
        ))
    } else {
        None
    };

    // One command at a time: each branch awaits process() to completion
    // before the next phrase is taken off a channel.
    loop {
        tokio::select! {
            line = line_rx.recv() => {
                match line {
                    Some(text) => {
                        if session.process(&text, Source::Manual).await == SessionEvent::Exit {
                            break;
                        }
                    }
                    None => break, // stdin closed
                }
            }
            Some(text) = voice_rx.recv() => {
                println!("[Voice] Recognized: {text}");
                if session.process(&text, Source::Voice).await == SessionEvent::Exit {
                    break;
                }
            }
            Some(status) = status_rx.recv() => {
                println!("{status}");
            }
        }
    }

    if let Some(listener) = listener {
        listener.join();
    }
    session.save_log_and_report();
    Ok(())
}
