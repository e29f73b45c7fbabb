//! Continuous finger-spelling recognition.
//!
//! ```text
//! skeleton tracker → normalize_landmarks → FeatureVector
//!                        → LetterClassifier → per-frame arg-max letter
//!                        → LetterStreamDecoder → stabilized text
//! ```
//!
//! The normalizer and decoder are pure functions; the classifier is the only
//! component with lifecycle state. [`worker::start_spelling_worker`] wires
//! the three together on a dedicated thread behind crossbeam channels.

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod landmarks;
pub mod model_download;
pub mod text;
pub mod types;
pub mod worker;

// Re-exports for convenience
pub use classifier::{
    ClassifierBackend, LETTER_LABELS, LetterClassifier, NO_GESTURE_LABEL, argmax,
};
pub use decoder::{DecoderConfig, LetterStreamDecoder, StreamingDecoder};
pub use error::FingerspellError;
pub use landmarks::normalize_landmarks;
pub use text::{fold, letters_only};
pub use types::{
    FEATURE_LEN, FeatureVector, HAND_JOINT_COUNT, LetterFrame, LetterProbability, SkeletonFrame,
    SkeletonPoint,
};
pub use worker::start_spelling_worker;
