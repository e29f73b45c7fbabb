use std::path::{Path, PathBuf};

use anyhow::Context;
use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use super::{LetterClassifier, scores_to_probabilities};
use crate::{
    error::FingerspellError,
    model_download::{ModelKind, ensure_model_ready},
    types::{FEATURE_LEN, FeatureVector, LetterProbability},
};

/// Dense neural-net letter classifier: a `(1, 42)` landmark tensor in, one
/// probability per alphabet label out.
pub struct NeuralNetClassifier {
    model_path: PathBuf,
    model_url: Option<String>,
    session: Option<Session>,
}

impl NeuralNetClassifier {
    pub fn new(model_path: PathBuf, model_url: Option<String>) -> Self {
        Self {
            model_path,
            model_url,
            session: None,
        }
    }
}

impl LetterClassifier for NeuralNetClassifier {
    fn ready(&self) -> bool {
        self.session.is_some()
    }

    fn load(&mut self) -> Result<(), FingerspellError> {
        if self.session.is_some() {
            return Ok(());
        }

        ensure_model_ready(
            ModelKind::NeuralNet,
            &self.model_path,
            self.model_url.as_deref(),
            |_evt| {},
        )?;
        let session = build_session(&self.model_path)?;
        log::info!(
            "neural-net letter classifier ready using {}",
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
        if outputs.len() == 0 {
            return Err(FingerspellError::Inference(
                "model returned no outputs".to_string(),
            ));
        }

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| FingerspellError::Inference(e.to_string()))?;
        let flat: Vec<f32> = scores.iter().copied().collect();
        scores_to_probabilities(&flat)
    }
}

pub(crate) fn build_session(model_path: &Path) -> Result<Session, FingerspellError> {
    let session = (|| -> anyhow::Result<Session> {
        Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("failed to load ORT session from {}", model_path.display())
            })
    })()
    .map_err(FingerspellError::ModelLoad)?;

    Ok(session)
}

pub(crate) fn feature_tensor(features: &FeatureVector) -> Result<Tensor<f32>, FingerspellError> {
    if features.len() != FEATURE_LEN {
        return Err(FingerspellError::InvalidFeatureLength {
            expected: FEATURE_LEN,
            actual: features.len(),
        });
    }

    let array = Array2::from_shape_vec((1, FEATURE_LEN), features.as_slice().to_vec())
        .map_err(|e| FingerspellError::Inference(e.to_string()))?;
    Tensor::from_array(array).map_err(|e| FingerspellError::Inference(e.to_string()))
}
