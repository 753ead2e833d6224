use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::voice::{SpeechListener, SpeechRecognizer, Transcript};

struct PendingSession {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

/// Stand-in recognizer: after a fixed delay it "hears" a canned transcript
/// and ends the session. The timer runs on its own thread and is cancelled
/// on [`cancel`](SpeechRecognizer::cancel) and on drop.
pub struct MockSpeechRecognizer {
    delay: Duration,
    transcript: String,
    confidence: f32,
    pending: Option<PendingSession>,
}

impl MockSpeechRecognizer {
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            delay: config.delay(),
            transcript: config.transcript.clone(),
            confidence: config.confidence,
            pending: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockSpeechRecognizer {
    fn default() -> Self {
        Self::new(&VoiceConfig::default())
    }
}

impl SpeechRecognizer for MockSpeechRecognizer {
    fn start(&mut self, mut listener: Box<dyn SpeechListener>) -> Result<(), VoiceError> {
        self.cancel();

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let delay = self.delay;
        let transcript = Transcript {
            text: self.transcript.clone(),
            confidence: self.confidence,
        };

        let handle = thread::Builder::new()
            .name("mock-speech".to_string())
            .spawn(move || match cancel_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {
                    listener.on_transcript(transcript);
                    listener.on_session_end();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("mock speech session cancelled");
                }
            })
            .map_err(|e| VoiceError::Backend(e.to_string()))?;

        self.pending = Some(PendingSession {
            cancel: cancel_tx,
            handle,
        });
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(session) = self.pending.take() {
            // fails harmlessly when the timer already fired
            let _ = session.cancel.send(());
            if session.handle.join().is_err() {
                tracing::warn!("mock speech thread panicked");
            }
        }
    }
}

impl Drop for MockSpeechRecognizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOICE_TRANSCRIPT;
    use crate::voice::{VoiceCapture, VoiceState};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechListener for Recorder {
        fn on_transcript(&mut self, transcript: Transcript) {
            self.events.lock().unwrap().push(transcript.text);
        }

        fn on_session_end(&mut self) {
            self.events.lock().unwrap().push("end".to_string());
        }
    }

    /// Forwards to a mock recognizer and records every callback and cancel.
    struct Tapped {
        inner: MockSpeechRecognizer,
        recorder: Recorder,
    }

    struct TappedListener {
        inner: Box<dyn SpeechListener>,
        recorder: Recorder,
    }

    impl SpeechListener for TappedListener {
        fn on_transcript(&mut self, transcript: Transcript) {
            self.recorder.on_transcript(transcript.clone());
            self.inner.on_transcript(transcript);
        }

        fn on_session_end(&mut self) {
            self.recorder.on_session_end();
            self.inner.on_session_end();
        }
    }

    impl SpeechRecognizer for Tapped {
        fn start(&mut self, listener: Box<dyn SpeechListener>) -> Result<(), VoiceError> {
            self.inner.start(Box::new(TappedListener {
                inner: listener,
                recorder: self.recorder.clone(),
            }))
        }

        fn cancel(&mut self) {
            self.recorder.events.lock().unwrap().push("cancel".to_string());
            self.inner.cancel();
        }
    }

    fn fast_recognizer(delay_ms: u64) -> MockSpeechRecognizer {
        MockSpeechRecognizer::default().with_delay(Duration::from_millis(delay_ms))
    }

    #[test]
    fn test_default_delay_is_two_seconds() {
        assert_eq!(MockSpeechRecognizer::default().delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_capture_receives_canned_transcript() {
        let mut capture = VoiceCapture::new(fast_recognizer(20));

        capture.start().unwrap();
        assert_eq!(capture.state(), VoiceState::Listening);

        let state = capture.wait_for_end(Duration::from_secs(5));

        assert_eq!(state, VoiceState::Idle);
        let transcript = capture.transcript().unwrap();
        assert_eq!(transcript.text, "Used a reusable water bottle today");
        assert_eq!(transcript.text, DEFAULT_VOICE_TRANSCRIPT);
        assert_eq!(transcript.confidence, 0.9);
    }

    #[test]
    fn test_nothing_delivered_before_delay() {
        let mut capture = VoiceCapture::new(fast_recognizer(500));
        capture.start().unwrap();

        assert_eq!(capture.pump(), 0);
        assert!(capture.is_listening());
        assert!(capture.transcript().is_none());
    }

    #[test]
    fn test_listener_called_in_order() {
        let recorder = Recorder::default();
        let mut recognizer = fast_recognizer(10);

        recognizer.start(Box::new(recorder.clone())).unwrap();
        thread::sleep(Duration::from_millis(200));
        recognizer.cancel();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec![DEFAULT_VOICE_TRANSCRIPT.to_string(), "end".to_string()]);
    }

    #[test]
    fn test_cancel_before_delay_suppresses_callbacks() {
        let recorder = Recorder::default();
        let mut recognizer = fast_recognizer(1_000);

        recognizer.start(Box::new(recorder.clone())).unwrap();
        recognizer.cancel();

        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dropping_listening_capture_cancels_session() {
        let recorder = Recorder::default();
        {
            let mut capture = VoiceCapture::new(Tapped {
                inner: fast_recognizer(200),
                recorder: recorder.clone(),
            });
            capture.start().unwrap();
            assert!(capture.is_listening());
        }
        thread::sleep(Duration::from_millis(400));

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec!["cancel".to_string()]);
    }

    #[test]
    fn test_dropping_idle_capture_does_not_cancel() {
        let recorder = Recorder::default();
        {
            let mut capture = VoiceCapture::new(Tapped {
                inner: fast_recognizer(10),
                recorder: recorder.clone(),
            });
            capture.start().unwrap();
            assert_eq!(capture.wait_for_end(Duration::from_secs(5)), VoiceState::Idle);
        }

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec![DEFAULT_VOICE_TRANSCRIPT.to_string(), "end".to_string()]);
    }

    #[test]
    fn test_drop_cancels_pending_timer() {
        let recorder = Recorder::default();
        {
            let mut recognizer = fast_recognizer(1_000);
            recognizer.start(Box::new(recorder.clone())).unwrap();
        }
        assert!(recorder.events.lock().unwrap().is_empty());
    }
}
