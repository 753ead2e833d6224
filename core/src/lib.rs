pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ffi;
pub mod metrics;
pub mod models;
pub mod number;
pub mod storage;
pub mod vehicle;
pub mod voice;
pub mod voice_mock;

uniffi::setup_scaffolding!("ecotrack");

pub use catalog::{CustomActionDraft, ImpactInput, QuantityInput};
pub use config::TrackerConfig;
pub use dashboard::ActionLogger;
pub use error::{ConfigError, LoggerError, StoreError, VehicleProfileError, VoiceError};
pub use metrics::DailyStats;
pub use models::{ActionId, Category, EcoAction, EcoLogEntry, Impact, LogId, NewEcoAction};
pub use storage::{MemoryStore, UserStore};
pub use vehicle::{VehicleField, VehicleForm, VehicleProfile, VehicleSpec};
pub use voice::{SpeechListener, SpeechRecognizer, Transcript, VoiceCapture, VoiceState};
pub use voice_mock::MockSpeechRecognizer;
