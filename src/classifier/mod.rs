mod forest;
mod ort;

use std::path::{Path, PathBuf};

pub use forest::DecisionForestClassifier;
pub use ort::NeuralNetClassifier;

use crate::{
    error::FingerspellError,
    types::{FeatureVector, LetterProbability},
};

/// Closed label alphabet the models were trained on: the Czech one-hand
/// finger alphabet with the digraph "Ch" after "H", plus the explicit
/// no-gesture label. Output tensor order matches this list.
pub const LETTER_LABELS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "Ch", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
    "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "None",
];

/// Label emitted when no gesture is present.
pub const NO_GESTURE_LABEL: &str = "None";

/// Capability interface for the pluggable letter classifier.
///
/// Lifecycle: unloaded until [`load`](LetterClassifier::load) succeeds, ready
/// afterwards. `load` is idempotent; the `&mut self` receiver makes it
/// structurally impossible to race two loads on one instance. Calling
/// [`predict`](LetterClassifier::predict) while unloaded fails with
/// [`FingerspellError::NotReady`] — implementations do not load implicitly.
/// A failed `predict` leaves the classifier in the same ready state it was
/// in before the call.
pub trait LetterClassifier: Send + 'static {
    /// Side-effect-free readiness query.
    fn ready(&self) -> bool;

    /// Acquires the model; a no-op when already ready.
    fn load(&mut self) -> Result<(), FingerspellError>;

    /// Scores the feature vector against every label in [`LETTER_LABELS`].
    /// Scores are classifier-defined and need not sum to 1.
    fn predict(
        &mut self,
        features: &FeatureVector,
    ) -> Result<Vec<LetterProbability>, FingerspellError>;
}

/// Picks the highest-probability label from one frame's distribution.
pub fn argmax(probabilities: &[LetterProbability]) -> Option<&LetterProbability> {
    probabilities.iter().max_by(|a, b| {
        a.probability
            .partial_cmp(&b.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Which concrete model backs the classifier, selected at configuration time.
#[derive(Clone, Debug)]
pub enum ClassifierBackend {
    NeuralNet {
        model_path: PathBuf,
        model_url: Option<String>,
    },
    DecisionForest {
        model_path: PathBuf,
        model_url: Option<String>,
    },
}

impl ClassifierBackend {
    pub fn label(&self) -> &'static str {
        match self {
            ClassifierBackend::NeuralNet { .. } => "neural-net",
            ClassifierBackend::DecisionForest { .. } => "decision-forest",
        }
    }

    pub fn model_path(&self) -> &Path {
        match self {
            ClassifierBackend::NeuralNet { model_path, .. } => model_path,
            ClassifierBackend::DecisionForest { model_path, .. } => model_path,
        }
    }

    pub fn build(&self) -> Box<dyn LetterClassifier> {
        match self {
            ClassifierBackend::NeuralNet {
                model_path,
                model_url,
            } => Box::new(NeuralNetClassifier::new(model_path.clone(), model_url.clone())),
            ClassifierBackend::DecisionForest {
                model_path,
                model_url,
            } => Box::new(DecisionForestClassifier::new(
                model_path.clone(),
                model_url.clone(),
            )),
        }
    }
}

impl Default for ClassifierBackend {
    fn default() -> Self {
        ClassifierBackend::NeuralNet {
            model_path: PathBuf::from("models").join("letter_classifier_nn.onnx"),
            model_url: None,
        }
    }
}

/// Pairs a raw score tensor with the label alphabet.
pub(crate) fn scores_to_probabilities(
    scores: &[f32],
) -> Result<Vec<LetterProbability>, FingerspellError> {
    if scores.len() < LETTER_LABELS.len() {
        return Err(FingerspellError::Inference(format!(
            "model produced {} scores for {} labels",
            scores.len(),
            LETTER_LABELS.len()
        )));
    }

    Ok(LETTER_LABELS
        .iter()
        .zip(scores)
        .map(|(label, score)| LetterProbability {
            label: (*label).to_string(),
            probability: *score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_digraph_and_no_gesture_label() {
        assert_eq!(LETTER_LABELS.len(), 28);
        assert_eq!(LETTER_LABELS[8], "Ch");
        assert_eq!(LETTER_LABELS[LETTER_LABELS.len() - 1], NO_GESTURE_LABEL);
    }

    #[test]
    fn argmax_picks_highest_score() {
        let probs = scores_to_probabilities(&{
            let mut v = vec![0.01f32; LETTER_LABELS.len()];
            v[8] = 0.9;
            v
        })
        .unwrap();

        assert_eq!(argmax(&probs).unwrap().label, "Ch");
    }

    #[test]
    fn argmax_of_empty_distribution_is_none() {
        assert!(argmax(&[]).is_none());
    }

    #[test]
    fn short_score_tensor_is_an_inference_error() {
        let result = scores_to_probabilities(&[0.5; 4]);
        assert!(matches!(result, Err(FingerspellError::Inference(_))));
    }

    #[test]
    fn backends_start_unloaded_and_refuse_predict() {
        use crate::types::{FEATURE_LEN, FeatureVector};

        for backend in [
            ClassifierBackend::default(),
            ClassifierBackend::DecisionForest {
                model_path: "models/letter_classifier_df.onnx".into(),
                model_url: None,
            },
        ] {
            let mut classifier = backend.build();
            assert!(!classifier.ready());

            let features = FeatureVector(vec![0.5; FEATURE_LEN]);
            assert!(matches!(
                classifier.predict(&features),
                Err(FingerspellError::NotReady)
            ));
        }
    }

    #[test]
    fn wrong_arity_feature_vector_is_rejected() {
        let mut classifier = ClassifierBackend::default().build();
        let result = classifier.predict(&FeatureVector(vec![0.0; 10]));
        assert!(matches!(
            result,
            Err(FingerspellError::InvalidFeatureLength {
                expected: crate::types::FEATURE_LEN,
                actual: 10,
            })
        ));
    }

    #[test]
    fn missing_model_with_no_url_fails_load() {
        let mut classifier = ClassifierBackend::NeuralNet {
            model_path: "models/does_not_exist.onnx".into(),
            model_url: None,
        }
        .build();
        assert!(matches!(
            classifier.load(),
            Err(FingerspellError::ModelNotFound(_))
        ));
        assert!(!classifier.ready());
    }
}
