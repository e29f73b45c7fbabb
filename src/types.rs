/// Joints tracked per hand by the MediaPipe-style skeleton (wrist is index 0).
pub const HAND_JOINT_COUNT: usize = 21;

/// Feature arity the classifiers expect: x and y per joint.
pub const FEATURE_LEN: usize = HAND_JOINT_COUNT * 2;

/// One tracked point of the hand skeleton. Coordinates are fractions of the
/// source frame's width/height; `z` is present only when the tracker emits
/// depth, and is dropped during normalization either way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonPoint {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
}

impl SkeletonPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// One captured frame from the skeleton tracker: an ordered joint sequence
/// (index = anatomical joint) plus the originating frame's pixel dimensions.
#[derive(Clone, Debug)]
pub struct SkeletonFrame {
    pub points: Vec<SkeletonPoint>,
    pub width: u32,
    pub height: u32,
}

/// Flat, wrist-relative, max-abs-scaled landmark vector, interleaved
/// `[x0, y0, x1, y1, ..]`. Every element lies in [-1, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(pub Vec<f32>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every component is zero — the fully-collapsed-hand case.
    /// Downstream code special-cases this instead of classifying it.
    pub fn is_degenerate(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

/// Confidence the classifier assigns to one letter label for one frame.
/// Scores need not sum to 1 across the alphabet.
#[derive(Clone, Debug)]
pub struct LetterProbability {
    pub label: String,
    pub probability: f32,
}

/// Per-frame worker output: the arg-max label and its confidence.
#[derive(Clone, Debug)]
pub struct LetterFrame {
    pub label: String,
    pub confidence: f32,
}
