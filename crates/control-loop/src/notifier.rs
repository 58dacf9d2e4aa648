//! Spoken feedback.
//!
//! Phrases go through a bounded channel to a single worker task that runs
//! the speech command once per phrase, so speech never blocks the frame
//! loop and phrases are spoken in order. When the queue is full the phrase
//! is dropped.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use airpoint_common::config::NotifierConfig;

/// Fire-and-forget user notifications.
pub trait Notifier: Send {
    fn notify(&self, text: &str);
}

/// Discards every phrase.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _text: &str) {}
}

/// Speaks phrases by running an external command such as `espeak`.
pub struct SpeechNotifier {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
}

impl SpeechNotifier {
    /// Spawn the speech worker on `handle`.
    pub fn spawn(config: &NotifierConfig, handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(config.queue_capacity.max(1));
        let program = config.command.clone();
        let args = config.args.clone();

        handle.spawn(async move {
            while let Some(text) = rx.recv().await {
                let result = tokio::process::Command::new(&program)
                    .args(&args)
                    .arg(&text)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await;
                match result {
                    Ok(status) if status.success() => {}
                    Ok(status) => debug!(%program, %status, "Speech command failed"),
                    Err(e) => debug!(%program, error = %e, "Speech command could not run"),
                }
            }
            debug!("Speech worker stopped");
        });

        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Phrases dropped because the queue was full or the worker had stopped.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Notifier for SpeechNotifier {
    fn notify(&self, text: &str) {
        match self.tx.try_send(text.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(text)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(%text, "Speech queue full; phrase dropped");
            }
            Err(TrySendError::Closed(text)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(%text, "Speech worker gone; phrase dropped");
            }
        }
    }
}

/// Build the notifier the configuration asks for.
pub fn build_notifier(config: &NotifierConfig, handle: &Handle) -> Box<dyn Notifier> {
    if config.enabled {
        Box::new(SpeechNotifier::spawn(config, handle))
    } else {
        Box::new(NullNotifier)
    }
}

/// Keeps every phrase in memory, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    phrases: Arc<Mutex<Vec<String>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the collected phrases.
    pub fn handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.phrases)
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, text: &str) {
        if let Ok(mut phrases) = self.phrases.lock() {
            phrases.push(text.to_string());
        }
    }
}
