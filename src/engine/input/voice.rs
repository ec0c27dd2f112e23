// Background voice command producer
//
// A recognizer yields partial and final transcripts for an utterance. The
// listener thread spots command keywords in them and pushes voice commands
// into the shared input buffer. Audio capture and speech recognition live
// behind the `Recognizer` trait and are not part of the engine.

use super::buffer::InputBuffer;
use super::command::Command;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Voice producer errors
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Voice recognizer unavailable")]
    Unavailable,

    #[error("Voice recognizer disconnected")]
    Disconnected,

    #[error("Failed to spawn voice thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Text produced by a recognizer for the current utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    /// Hypothesis for an utterance still in progress
    Partial(String),
    /// Final text; the next transcript starts a new utterance
    Final(String),
}

/// Blocking source of transcripts
pub trait Recognizer: Send + 'static {
    /// Wait up to `timeout` for the next transcript; `Ok(None)` on timeout
    fn next_transcript(&mut self, timeout: Duration) -> Result<Option<Transcript>, VoiceError>;
}

/// Recognizer fed through a channel by an external speech pipeline
#[derive(Debug)]
pub struct ChannelRecognizer {
    rx: Receiver<Transcript>,
}

impl ChannelRecognizer {
    /// Create a recognizer and the sender that feeds it
    pub fn pair() -> (Sender<Transcript>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl Recognizer for ChannelRecognizer {
    fn next_transcript(&mut self, timeout: Duration) -> Result<Option<Transcript>, VoiceError> {
        match self.rx.recv_timeout(timeout) {
            Ok(transcript) => Ok(Some(transcript)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(VoiceError::Disconnected),
        }
    }
}

/// Maps transcripts to commands, firing each command once per utterance
#[derive(Debug, Clone)]
pub struct KeywordSpotter {
    keywords: Vec<(String, Command)>,
    fired: HashSet<Command>,
}

impl KeywordSpotter {
    pub fn new(keywords: Vec<(String, Command)>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|(word, command)| (word.to_lowercase(), command))
            .collect();
        Self {
            keywords,
            fired: HashSet::new(),
        }
    }

    /// Commands newly heard in this transcript
    ///
    /// Partial hypotheses grow as the utterance goes on, so a keyword only
    /// fires the first time it shows up. A final transcript closes the
    /// utterance without firing.
    pub fn feed(&mut self, transcript: &Transcript) -> Vec<Command> {
        match transcript {
            Transcript::Partial(text) => {
                let text = text.to_lowercase();
                let mut heard = Vec::new();
                for (word, command) in &self.keywords {
                    if text.contains(word.as_str()) && self.fired.insert(*command) {
                        heard.push(*command);
                    }
                }
                heard
            }
            Transcript::Final(text) => {
                log::debug!("final transcript: {:?}", text);
                self.fired.clear();
                Vec::new()
            }
        }
    }
}

impl Default for KeywordSpotter {
    fn default() -> Self {
        Self::new(vec![
            ("jump".to_string(), Command::VoiceJump),
            ("dash".to_string(), Command::VoiceDash),
        ])
    }
}

/// Contract for an asynchronous command producer
pub trait VoiceProducer {
    fn start(&mut self) -> Result<(), VoiceError>;
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Listener thread timing
#[derive(Debug, Clone, Copy)]
pub struct VoiceConfig {
    /// How long one recognizer poll may block before re-checking the stop flag
    pub poll_interval: Duration,
    /// How long `stop` waits for the thread before detaching it
    pub join_timeout: Duration,
    /// Pause after a recognition error
    pub error_backoff: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            join_timeout: Duration::from_secs(1),
            error_backoff: Duration::from_millis(100),
        }
    }
}

struct Worker<R> {
    handle: JoinHandle<R>,
    done: Receiver<()>,
}

/// Runs a [`Recognizer`] on a background thread and feeds the input buffer
///
/// The recognizer moves into the thread on `start` and is handed back on a
/// clean `stop`, so the listener can be restarted.
pub struct VoiceListener<R: Recognizer> {
    buffer: Arc<InputBuffer>,
    spotter: KeywordSpotter,
    config: VoiceConfig,
    recognizer: Option<R>,
    running: Arc<AtomicBool>,
    worker: Option<Worker<R>>,
}

impl<R: Recognizer> VoiceListener<R> {
    pub fn new(buffer: Arc<InputBuffer>, recognizer: R) -> Self {
        Self::with_config(
            buffer,
            Some(recognizer),
            KeywordSpotter::default(),
            VoiceConfig::default(),
        )
    }

    /// A listener without a recognizer; `start` reports it as unavailable
    pub fn unavailable(buffer: Arc<InputBuffer>) -> Self {
        Self::with_config(buffer, None, KeywordSpotter::default(), VoiceConfig::default())
    }

    pub fn with_config(
        buffer: Arc<InputBuffer>,
        recognizer: Option<R>,
        spotter: KeywordSpotter,
        config: VoiceConfig,
    ) -> Self {
        Self {
            buffer,
            spotter,
            config,
            recognizer,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Whether a recognizer is available to start with
    pub fn is_available(&self) -> bool {
        self.recognizer.is_some() || self.worker.is_some()
    }
}

impl<R: Recognizer> VoiceProducer for VoiceListener<R> {
    fn start(&mut self) -> Result<(), VoiceError> {
        if self.is_active() {
            log::debug!("Voice listener already running");
            return Ok(());
        }
        // A worker that exited on its own still has to be reaped
        self.stop();

        let mut recognizer = self.recognizer.take().ok_or(VoiceError::Unavailable)?;
        let mut spotter = self.spotter.clone();
        let buffer = Arc::clone(&self.buffer);
        let running = Arc::clone(&self.running);
        let config = self.config;
        let (done_tx, done) = mpsc::channel::<()>();

        self.running.store(true, Ordering::SeqCst);
        let spawned = thread::Builder::new()
            .name("voice-listener".to_string())
            .spawn(move || {
                listen(&mut recognizer, &mut spotter, &buffer, &running, config);
                running.store(false, Ordering::SeqCst);
                drop(done_tx);
                recognizer
            });

        match spawned {
            Ok(handle) => {
                log::info!("Voice listener started");
                self.worker = Some(Worker { handle, done });
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(VoiceError::Spawn(e))
            }
        }
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);

        match worker.done.recv_timeout(self.config.join_timeout) {
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Voice listener did not stop in time; detaching it");
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => match worker.handle.join() {
                Ok(recognizer) => {
                    self.recognizer = Some(recognizer);
                    log::info!("Voice listener stopped");
                }
                Err(_) => log::warn!("Voice listener thread panicked"),
            },
        }
    }

    fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self
                .worker
                .as_ref()
                .map_or(false, |worker| !worker.handle.is_finished())
    }
}

impl<R: Recognizer> Drop for VoiceListener<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn listen<R: Recognizer>(
    recognizer: &mut R,
    spotter: &mut KeywordSpotter,
    buffer: &InputBuffer,
    running: &AtomicBool,
    config: VoiceConfig,
) {
    while running.load(Ordering::SeqCst) {
        match recognizer.next_transcript(config.poll_interval) {
            Ok(Some(transcript)) => {
                for command in spotter.feed(&transcript) {
                    log::debug!("Voice command heard: {:?}", command);
                    buffer.push_now(command);
                }
            }
            Ok(None) => {}
            Err(VoiceError::Disconnected) => {
                log::warn!("Voice recognizer disconnected; listener exiting");
                break;
            }
            Err(e) => {
                log::warn!("Voice recognition error: {}", e);
                thread::sleep(config.error_backoff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::clock::ManualClock;
    use std::time::Instant;

    fn buffer() -> Arc<InputBuffer> {
        Arc::new(InputBuffer::new(Arc::new(ManualClock::new())))
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_spotter_fires_once_per_utterance() {
        let mut spotter = KeywordSpotter::default();
        assert_eq!(
            spotter.feed(&Transcript::Partial("ju".into())),
            Vec::<Command>::new()
        );
        assert_eq!(
            spotter.feed(&Transcript::Partial("JUMP".into())),
            vec![Command::VoiceJump]
        );
        assert!(spotter.feed(&Transcript::Partial("jump now".into())).is_empty());

        assert!(spotter.feed(&Transcript::Final("jump now".into())).is_empty());
        assert_eq!(
            spotter.feed(&Transcript::Partial("jump".into())),
            vec![Command::VoiceJump]
        );
    }

    #[test]
    fn test_spotter_multiple_keywords() {
        let mut spotter = KeywordSpotter::default();
        let heard = spotter.feed(&Transcript::Partial("dash and jump".into()));
        assert_eq!(heard.len(), 2);
        assert!(heard.contains(&Command::VoiceJump));
        assert!(heard.contains(&Command::VoiceDash));
    }

    #[test]
    fn test_channel_recognizer_timeout_and_disconnect() {
        let (tx, mut recognizer) = ChannelRecognizer::pair();
        let none = recognizer.next_transcript(Duration::from_millis(1));
        assert!(matches!(none, Ok(None)));

        tx.send(Transcript::Partial("dash".into())).unwrap();
        let some = recognizer.next_transcript(Duration::from_millis(100));
        assert!(matches!(some, Ok(Some(Transcript::Partial(_)))));

        drop(tx);
        let gone = recognizer.next_transcript(Duration::from_millis(1));
        assert!(matches!(gone, Err(VoiceError::Disconnected)));
    }

    #[test]
    fn test_listener_pushes_commands() {
        let buffer = buffer();
        let (tx, recognizer) = ChannelRecognizer::pair();
        let mut listener = VoiceListener::new(Arc::clone(&buffer), recognizer);

        listener.start().unwrap();
        assert!(listener.is_active());

        tx.send(Transcript::Partial("jump".into())).unwrap();
        assert!(wait_until(|| buffer.has_input(Command::VoiceJump)));

        listener.stop();
        assert!(!listener.is_active());
    }

    #[test]
    fn test_stop_keeps_buffered_events_and_allows_restart() {
        let buffer = buffer();
        let (tx, recognizer) = ChannelRecognizer::pair();
        let mut listener = VoiceListener::new(Arc::clone(&buffer), recognizer);

        listener.start().unwrap();
        tx.send(Transcript::Partial("dash".into())).unwrap();
        assert!(wait_until(|| buffer.len() == 1));
        listener.stop();
        assert_eq!(buffer.len(), 1, "stopping must not drop buffered events");

        assert!(listener.is_available());
        listener.start().unwrap();
        tx.send(Transcript::Final("dash".into())).unwrap();
        tx.send(Transcript::Partial("jump".into())).unwrap();
        assert!(wait_until(|| buffer.len() == 2));
        listener.stop();
    }

    #[test]
    fn test_unavailable_recognizer() {
        let mut listener: VoiceListener<ChannelRecognizer> = VoiceListener::unavailable(buffer());
        assert!(!listener.is_available());
        assert!(matches!(listener.start(), Err(VoiceError::Unavailable)));
        assert!(!listener.is_active());
        listener.stop();
    }

    #[test]
    fn test_listener_exits_when_recognizer_disconnects() {
        let (tx, recognizer) = ChannelRecognizer::pair();
        let mut listener = VoiceListener::new(buffer(), recognizer);
        listener.start().unwrap();

        drop(tx);
        assert!(wait_until(|| !listener.is_active()));
        listener.stop();
    }

    #[test]
    fn test_start_twice_is_harmless() {
        let (_tx, recognizer) = ChannelRecognizer::pair();
        let mut listener = VoiceListener::new(buffer(), recognizer);
        listener.start().unwrap();
        listener.start().unwrap();
        assert!(listener.is_active());
        listener.stop();
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            VoiceError::Unavailable.to_string(),
            "Voice recognizer unavailable"
        );
    }
}
