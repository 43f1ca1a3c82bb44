//! Voice capture seam.
//!
//! Audio capture and speech recognition are external collaborators; the
//! core only sees recognized text arriving over a channel. The listener
//! runs on its own thread, checks a stop flag between iterations
//! (cooperative cancellation: an in-flight recognition completes or times
//! out on its own), and hands text to the owning task through an
//! unbounded `tokio::sync::mpsc` channel. Recognition therefore never
//! interleaves with session-state mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Recognition tuning parameters. Owned by the listener; read-only to the
/// session core.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionTuning {
    /// Microphone energy threshold.
    pub energy_threshold: u32,
    /// Maximum length of a single phrase, in seconds.
    pub phrase_time_limit_secs: u32,
    /// How long one listen iteration waits for speech, in seconds.
    pub listen_timeout_secs: u32,
    /// Recognition engine name.
    pub engine: String,
}

impl Default for RecognitionTuning {
    fn default() -> Self {
        Self {
            energy_threshold: 300,
            phrase_time_limit_secs: 7,
            listen_timeout_secs: 10,
            engine: "google".to_string(),
        }
    }
}

/// Per-iteration listening failures, per the recognition taxonomy.
#[derive(Debug, Error)]
pub enum ListenError {
    /// Nothing was said before the listen timeout. The loop continues.
    #[error("no speech before timeout")]
    NoSpeech,

    /// Audio was captured but could not be understood. Reported, loop
    /// continues.
    #[error("could not understand audio")]
    Unintelligible,

    /// The recognition service itself failed (e.g. network-dependent
    /// backend unreachable). Reported, loop terminates; the caller must
    /// restart listening.
    #[error("recognition service failure: {0}")]
    Service(String),
}

/// A speech recognition backend. One blocking call per phrase.
pub trait SpeechBackend: Send {
    fn listen_once(&mut self, tuning: &RecognitionTuning) -> Result<String, ListenError>;
}

/// Backend used when no recognition stack is available. Fails the loop
/// immediately so the front-end falls back to typed input.
pub struct UnavailableBackend;

impl SpeechBackend for UnavailableBackend {
    fn listen_once(&mut self, _tuning: &RecognitionTuning) -> Result<String, ListenError> {
        Err(ListenError::Service("no speech backend configured".to_string()))
    }
}

/// Handle to a running listener thread.
pub struct Listener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    /// Spawns the listening loop on a dedicated thread. Recognized text is
    /// sent through `tx`; status lines through `status_tx`.
    pub fn spawn(
        mut backend: Box<dyn SpeechBackend>,
        tuning: RecognitionTuning,
        tx: mpsc::UnboundedSender<String>,
        status_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            info!("listening started");
            let _ = status_tx.send("[Voice] Ready! Speak your commands clearly...".to_string());
            while !stop_flag.load(Ordering::Relaxed) {
                match backend.listen_once(&tuning) {
                    Ok(text) => {
                        if !text.is_empty() && tx.send(text).is_err() {
                            break;
                        }
                    }
                    Err(ListenError::NoSpeech) => continue,
                    Err(ListenError::Unintelligible) => {
                        let _ = status_tx.send(
                            "[Voice] Could not understand - please speak more clearly".to_string(),
                        );
                    }
                    Err(ListenError::Service(reason)) => {
                        warn!(%reason, "recognition service failure, stopping listener");
                        let _ = status_tx.send(format!("[Voice] ERROR: {reason}"));
                        let _ =
                            status_tx.send("[Voice] Use manual text input as backup".to_string());
                        break;
                    }
                }
            }
            info!("listening stopped");
        });

        Self { stop, handle: Some(handle) }
    }

    /// Requests a cooperative stop. The in-flight listen call finishes on
    /// its own before the loop observes the flag.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stops the loop and waits for the thread to finish.
    pub fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
