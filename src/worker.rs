use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::{
    classifier::{ClassifierBackend, LetterClassifier, NO_GESTURE_LABEL, argmax},
    landmarks::normalize_landmarks,
    types::{HAND_JOINT_COUNT, LetterFrame, SkeletonFrame},
};

/// Spawns the recognition worker: skeleton frames in, one [`LetterFrame`]
/// per classified frame out. The worker loads the backend's model first and
/// exits when the frame channel closes.
///
/// Every frame is processed in order — run lengths downstream are dwell
/// measurements, so frames are never coalesced or dropped to catch up.
pub fn start_spelling_worker(
    backend: ClassifierBackend,
    frame_rx: Receiver<SkeletonFrame>,
    letter_tx: Sender<LetterFrame>,
) -> thread::JoinHandle<()> {
    log::info!("starting spelling worker with {} backend", backend.label());

    thread::spawn(move || {
        let mut classifier = backend.build();
        if let Err(err) = classifier.load() {
            log::error!("failed to load {} classifier: {err}", backend.label());
            return;
        }

        run_worker_loop(classifier.as_mut(), frame_rx, letter_tx);
    })
}

fn run_worker_loop<C: LetterClassifier + ?Sized>(
    classifier: &mut C,
    frame_rx: Receiver<SkeletonFrame>,
    letter_tx: Sender<LetterFrame>,
) {
    while let Ok(frame) = frame_rx.recv() {
        if frame.points.len() != HAND_JOINT_COUNT {
            log::warn!(
                "skipping skeleton frame with {} joints, expected {HAND_JOINT_COUNT}",
                frame.points.len()
            );
            continue;
        }

        let features = normalize_landmarks(&frame);
        let letter = if features.is_degenerate() {
            // Collapsed hand: classify nothing, report the sentinel label
            log::debug!("degenerate landmark frame, emitting no-gesture label");
            LetterFrame {
                label: NO_GESTURE_LABEL.to_string(),
                confidence: 0.0,
            }
        } else {
            match classifier.predict(&features) {
                Ok(probabilities) => match argmax(&probabilities) {
                    Some(best) => LetterFrame {
                        label: best.label.clone(),
                        confidence: best.probability,
                    },
                    None => LetterFrame {
                        label: NO_GESTURE_LABEL.to_string(),
                        confidence: 0.0,
                    },
                },
                Err(err) => {
                    log::warn!("letter inference failed: {err}");
                    continue;
                }
            }
        };

        if letter_tx.send(letter).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FingerspellError,
        types::{FeatureVector, LetterProbability, SkeletonPoint},
    };
    use crossbeam_channel::unbounded;

    /// Labels every frame by the sign of the last feature component.
    struct StubClassifier {
        loaded: bool,
    }

    impl LetterClassifier for StubClassifier {
        fn ready(&self) -> bool {
            self.loaded
        }

        fn load(&mut self) -> Result<(), FingerspellError> {
            self.loaded = true;
            Ok(())
        }

        fn predict(
            &mut self,
            features: &FeatureVector,
        ) -> Result<Vec<LetterProbability>, FingerspellError> {
            if !self.loaded {
                return Err(FingerspellError::NotReady);
            }
            let label = if features.as_slice().last().copied().unwrap_or(0.0) > 0.0 {
                "A"
            } else {
                "B"
            };
            Ok(vec![LetterProbability {
                label: label.to_string(),
                probability: 0.9,
            }])
        }
    }

    fn hand_frame(spread: f32) -> SkeletonFrame {
        let mut points = vec![SkeletonPoint::new(0.5, 0.5)];
        for i in 1..HAND_JOINT_COUNT {
            let offset = spread * i as f32 / HAND_JOINT_COUNT as f32;
            points.push(SkeletonPoint::new(0.5 + offset, 0.5 + offset));
        }
        SkeletonFrame {
            points,
            width: 640,
            height: 480,
        }
    }

    fn collapsed_frame() -> SkeletonFrame {
        SkeletonFrame {
            points: vec![SkeletonPoint::new(0.5, 0.5); HAND_JOINT_COUNT],
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn worker_labels_frames_in_order() {
        let (frame_tx, frame_rx) = unbounded();
        let (letter_tx, letter_rx) = unbounded();

        let mut classifier = StubClassifier { loaded: false };
        classifier.load().unwrap();

        frame_tx.send(hand_frame(0.2)).unwrap();
        frame_tx.send(hand_frame(-0.2)).unwrap();
        drop(frame_tx);

        run_worker_loop(&mut classifier, frame_rx, letter_tx);

        let letters: Vec<LetterFrame> = letter_rx.iter().collect();
        assert_eq!(letters.len(), 2);
        assert_eq!(letters[0].label, "A");
        assert_eq!(letters[1].label, "B");
    }

    #[test]
    fn degenerate_frame_maps_to_no_gesture_label() {
        let (frame_tx, frame_rx) = unbounded();
        let (letter_tx, letter_rx) = unbounded();

        let mut classifier = StubClassifier { loaded: false };
        classifier.load().unwrap();

        frame_tx.send(collapsed_frame()).unwrap();
        drop(frame_tx);

        run_worker_loop(&mut classifier, frame_rx, letter_tx);

        let letters: Vec<LetterFrame> = letter_rx.iter().collect();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].label, NO_GESTURE_LABEL);
        assert_eq!(letters[0].confidence, 0.0);
    }

    #[test]
    fn wrong_joint_count_is_skipped() {
        let (frame_tx, frame_rx) = unbounded();
        let (letter_tx, letter_rx) = unbounded();

        let mut classifier = StubClassifier { loaded: false };
        classifier.load().unwrap();

        frame_tx
            .send(SkeletonFrame {
                points: vec![SkeletonPoint::new(0.1, 0.1); 3],
                width: 640,
                height: 480,
            })
            .unwrap();
        frame_tx.send(hand_frame(0.2)).unwrap();
        drop(frame_tx);

        run_worker_loop(&mut classifier, frame_rx, letter_tx);

        let letters: Vec<LetterFrame> = letter_rx.iter().collect();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].label, "A");
    }

    #[test]
    fn unloaded_classifier_drops_frames_with_a_warning() {
        let (frame_tx, frame_rx) = unbounded();
        let (letter_tx, letter_rx) = unbounded();

        let mut classifier = StubClassifier { loaded: false };

        frame_tx.send(hand_frame(0.2)).unwrap();
        drop(frame_tx);

        run_worker_loop(&mut classifier, frame_rx, letter_tx);

        assert!(letter_rx.iter().next().is_none());
    }
}
