use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use crate::error::VoiceError;

#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: f32,
}

/// Receives the results of one recognition session. Called from whatever
/// thread the backend runs on.
pub trait SpeechListener: Send {
    fn on_transcript(&mut self, transcript: Transcript);
    fn on_session_end(&mut self);
}

/// A speech-to-text backend. One session at a time; `cancel` must guarantee
/// that the listener of the current session is not called afterwards.
pub trait SpeechRecognizer {
    fn start(&mut self, listener: Box<dyn SpeechListener>) -> Result<(), VoiceError>;
    fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening,
}

#[derive(Debug)]
enum SpeechEvent {
    Transcript(Transcript),
    SessionEnded,
}

struct ChannelListener {
    tx: Sender<SpeechEvent>,
}

impl SpeechListener for ChannelListener {
    fn on_transcript(&mut self, transcript: Transcript) {
        // receiver gone means the capture was torn down
        let _ = self.tx.send(SpeechEvent::Transcript(transcript));
    }

    fn on_session_end(&mut self) {
        let _ = self.tx.send(SpeechEvent::SessionEnded);
    }
}

/// Voice logging session state. Backend callbacks are queued and only
/// applied on the owner's thread, in [`pump`](Self::pump) or
/// [`wait_for_end`](Self::wait_for_end).
pub struct VoiceCapture<R: SpeechRecognizer> {
    recognizer: R,
    state: VoiceState,
    transcript: Option<Transcript>,
    events: Option<Receiver<SpeechEvent>>,
}

impl<R: SpeechRecognizer> VoiceCapture<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            state: VoiceState::Idle,
            transcript: None,
            events: None,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    /// Hand the recognized text over, e.g. to log it, clearing it here.
    pub fn take_transcript(&mut self) -> Option<Transcript> {
        self.transcript.take()
    }

    pub fn start(&mut self) -> Result<(), VoiceError> {
        if self.is_listening() {
            return Err(VoiceError::AlreadyListening);
        }
        self.transcript = None;

        let (tx, rx) = mpsc::channel();
        self.recognizer.start(Box::new(ChannelListener { tx }))?;
        self.events = Some(rx);
        self.state = VoiceState::Listening;
        tracing::debug!("voice capture listening");
        Ok(())
    }

    /// Apply every event delivered so far. Returns the number applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(rx) = &self.events {
            match rx.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.end_session(),
            }
        }
        applied
    }

    /// Block until the session ends or `timeout` elapses, applying events as
    /// they arrive.
    pub fn wait_for_end(&mut self, timeout: Duration) -> VoiceState {
        let deadline = Instant::now() + timeout;
        while let Some(rx) = &self.events {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => self.end_session(),
            }
        }
        self.state
    }

    fn apply(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Transcript(transcript) => {
                tracing::debug!(text = %transcript.text, "voice transcript received");
                self.transcript = Some(transcript);
            }
            SpeechEvent::SessionEnded => self.end_session(),
        }
    }

    fn end_session(&mut self) {
        self.events = None;
        self.state = VoiceState::Idle;
        tracing::debug!("voice capture idle");
    }
}

impl<R: SpeechRecognizer> Drop for VoiceCapture<R> {
    fn drop(&mut self) {
        if self.is_listening() {
            self.recognizer.cancel();
        }
    }
}
