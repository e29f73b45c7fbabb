use crate::types::{FeatureVector, SkeletonFrame};

/// Converts a tracked skeleton frame into the flat, translation- and
/// scale-invariant vector the letter classifiers consume.
///
/// Steps: project the fractional coordinates onto the pixel grid (clamping at
/// the far edge), translate so the wrist (joint 0) sits at the origin, flatten
/// to `[x0, y0, x1, y1, ..]`, then divide by the largest absolute component.
/// Depth is dropped; the classifiers work on the 2D projection.
///
/// A fully-collapsed hand (all joints coincident) comes back as the all-zero
/// vector rather than dividing by zero; callers detect that case with
/// [`FeatureVector::is_degenerate`]. The caller validates the joint count
/// before invoking — an empty frame yields an empty vector.
pub fn normalize_landmarks(frame: &SkeletonFrame) -> FeatureVector {
    if frame.points.is_empty() {
        return FeatureVector(Vec::new());
    }

    let max_px = frame.width.saturating_sub(1) as i64;
    let max_py = frame.height.saturating_sub(1) as i64;
    let pixels: Vec<(i64, i64)> = frame
        .points
        .iter()
        .map(|p| {
            let px = ((p.x * frame.width as f32).floor() as i64).min(max_px);
            let py = ((p.y * frame.height as f32).floor() as i64).min(max_py);
            (px, py)
        })
        .collect();

    // Wrist-relative offsets, interleaved x/y per joint
    let (base_x, base_y) = pixels[0];
    let mut flat = Vec::with_capacity(pixels.len() * 2);
    for (px, py) in pixels {
        flat.push((px - base_x) as f32);
        flat.push((py - base_y) as f32);
    }

    let max_abs = flat.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if max_abs > 0.0 {
        for v in &mut flat {
            *v /= max_abs;
        }
    }

    FeatureVector(flat)
}
