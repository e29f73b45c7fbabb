use std::path::PathBuf;

use ort::session::Session;

use super::{LetterClassifier, ort::build_session, ort::feature_tensor, scores_to_probabilities};
use crate::{
    error::FingerspellError,
    model_download::{ModelKind, ensure_model_ready},
    types::{FeatureVector, LetterProbability},
};

/// Gradient-boosted decision-forest letter classifier, exported to ONNX via
/// the tree-ensemble converters. Those graphs emit the predicted label tensor
/// first and the per-class score tensor second, so scores are read from the
/// second output.
pub struct DecisionForestClassifier {
    model_path: PathBuf,
    model_url: Option<String>,
    session: Option<Session>,
}

impl DecisionForestClassifier {
    pub fn new(model_path: PathBuf, model_url: Option<String>) -> Self {
        Self {
            model_path,
            model_url,
            session: None,
        }
    }
}

impl LetterClassifier for DecisionForestClassifier {
    fn ready(&self) -> bool {
        self.session.is_some()
    }

    fn load(&mut self) -> Result<(), FingerspellError> {
        if self.session.is_some() {
            return Ok(());
        }

        ensure_model_ready(
            ModelKind::DecisionForest,
            &self.model_path,
            self.model_url.as_deref(),
            |_evt| {},
        )?;
        let session = build_session(&self.model_path)?;
        log::info!(
            "decision-forest letter classifier ready using {}",
            self.model_path.display()
        );
        self.session = Some(session);
        Ok(())
    }

    fn predict(
        &mut self,
        features: &FeatureVector,
    ) -> Result<Vec<LetterProbability>, FingerspellError> {
        let input = feature_tensor(features)?;
        let session = self.session.as_mut().ok_or(FingerspellError::NotReady)?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| FingerspellError::Inference(e.to_string()))?;
        if outputs.len() < 2 {
            return Err(FingerspellError::Inference(format!(
                "tree-ensemble model returned {} outputs, expected label + scores",
                outputs.len()
            )));
        }

        let scores = outputs[1]
            .try_extract_array::<f32>()
            .map_err(|e| FingerspellError::Inference(e.to_string()))?;
        let flat: Vec<f32> = scores.iter().copied().collect();
        scores_to_probabilities(&flat)
    }
}
