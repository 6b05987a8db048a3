//! Decoding of raw YOLO output into scored, class-labelled boxes.
//!
//! The detection head emits `[4 + nc, anchors]` per image: rows 0..4 hold the
//! box center, width and height in letterboxed pixels, the remaining rows
//! hold per-class scores that are already sigmoid-activated.

use super::geometry::BoundingBox;
use super::letterbox::LetterboxInfo;
use crate::core::errors::{DetectError, DetectResult};
use ndarray::ArrayView2;
use std::cmp::Ordering;
use tracing::debug;

/// Upper bound on boxes entering NMS.
const MAX_NMS_CANDIDATES: usize = 30_000;

/// A box that passed the confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bbox: BoundingBox,
    pub score: f32,
    /// Index into the active class list.
    pub class_id: usize,
}

/// Confidence filtering, class restriction and NMS for YOLO detection heads.
#[derive(Debug, Clone)]
pub struct YoloPostProcess {
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub max_det: usize,
    pub agnostic: bool,
}

impl Default for YoloPostProcess {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_det: 300,
            agnostic: false,
        }
    }
}

impl YoloPostProcess {
    pub fn new(conf_threshold: f32, iou_threshold: f32, max_det: usize, agnostic: bool) -> Self {
        Self {
            conf_threshold,
            iou_threshold,
            max_det,
            agnostic,
        }
    }

    /// Runs decode, NMS and rescaling for one image.
    pub fn apply(
        &self,
        output: ArrayView2<'_, f32>,
        allowed: Option<&[usize]>,
        info: &LetterboxInfo,
    ) -> DetectResult<Vec<Candidate>> {
        let candidates = self.decode(output, allowed)?;
        let before = candidates.len();
        let kept = self.nms(candidates);
        debug!("NMS kept {} of {} candidates", kept.len(), before);
        Ok(scale_boxes(kept, info))
    }

    /// Picks the best allowed class per anchor and keeps anchors above the threshold.
    ///
    /// With `allowed = Some(ids)` only the listed vocabulary rows are scored and
    /// the resulting `class_id` is the position within `ids`.
    pub fn decode(
        &self,
        output: ArrayView2<'_, f32>,
        allowed: Option<&[usize]>,
    ) -> DetectResult<Vec<Candidate>> {
        let (channels, anchors) = output.dim();
        if channels <= 4 {
            return Err(DetectError::post_processing_message(format!(
                "detection output needs more than 4 channels, got {}",
                channels
            )));
        }
        let num_classes = channels - 4;

        let class_rows: Vec<usize> = match allowed {
            Some(ids) => {
                if let Some(bad) = ids.iter().find(|&&id| id >= num_classes) {
                    return Err(DetectError::post_processing_message(format!(
                        "class index {} is outside the model's {} classes",
                        bad, num_classes
                    )));
                }
                ids.to_vec()
            }
            None => (0..num_classes).collect(),
        };

        let mut candidates = Vec::new();
        for a in 0..anchors {
            let mut best: Option<(usize, f32)> = None;
            for (pos, &row) in class_rows.iter().enumerate() {
                let score = output[[4 + row, a]];
                if !score.is_finite() {
                    continue;
                }
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((pos, score));
                }
            }
            let Some((class_id, score)) = best else {
                continue;
            };
            if score <= self.conf_threshold {
                continue;
            }

            let bbox = BoundingBox::from_xywh(
                output[[0, a]],
                output[[1, a]],
                output[[2, a]],
                output[[3, a]],
            );
            candidates.push(Candidate {
                bbox,
                score,
                class_id,
            });
        }

        Ok(candidates)
    }

    /// Greedy non-maximum suppression.
    ///
    /// Candidates are visited by descending score; ties keep their input order.
    /// Boxes of different classes never suppress each other unless `agnostic`.
    pub fn nms(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(MAX_NMS_CANDIDATES);

        let mut keep: Vec<Candidate> = Vec::new();
        let mut suppressed = vec![false; candidates.len()];

        for i in 0..candidates.len() {
            if suppressed[i] {
                continue;
            }
            keep.push(candidates[i]);
            if keep.len() >= self.max_det {
                break;
            }

            for j in (i + 1)..candidates.len() {
                if suppressed[j] {
                    continue;
                }
                if !self.agnostic && candidates[i].class_id != candidates[j].class_id {
                    continue;
                }
                if candidates[i].bbox.iou(&candidates[j].bbox) > self.iou_threshold {
                    suppressed[j] = true;
                }
            }
        }

        keep
    }
}

/// Maps letterboxed boxes back onto the original image and clips them to it.
pub fn scale_boxes(candidates: Vec<Candidate>, info: &LetterboxInfo) -> Vec<Candidate> {
    let (w, h) = (info.orig_size.0 as f32, info.orig_size.1 as f32);
    candidates
        .into_iter()
        .map(|c| {
            let (x1, y1) = info.to_original(c.bbox.x1, c.bbox.y1);
            let (x2, y2) = info.to_original(c.bbox.x2, c.bbox.y2);
            Candidate {
                bbox: BoundingBox::new(x1, y1, x2, y2).clip(w, h),
                ..c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Builds a `[4 + nc, anchors]` output from (cx, cy, w, h, scores) rows.
    fn output(anchors: &[(f32, f32, f32, f32, Vec<f32>)]) -> Array2<f32> {
        let nc = anchors[0].4.len();
        let mut out = Array2::zeros((4 + nc, anchors.len()));
        for (a, (cx, cy, w, h, scores)) in anchors.iter().enumerate() {
            out[[0, a]] = *cx;
            out[[1, a]] = *cy;
            out[[2, a]] = *w;
            out[[3, a]] = *h;
            for (c, s) in scores.iter().enumerate() {
                out[[4 + c, a]] = *s;
            }
        }
        out
    }

    fn identity_info(w: u32, h: u32) -> LetterboxInfo {
        LetterboxInfo {
            ratio: 1.0,
            pad: (0.0, 0.0),
            orig_size: (w, h),
        }
    }

    #[test]
    fn test_decode_applies_threshold_and_best_class() {
        let out = output(&[
            (50.0, 50.0, 20.0, 20.0, vec![0.1, 0.9, 0.3]),
            (10.0, 10.0, 4.0, 4.0, vec![0.2, 0.1, 0.05]),
        ]);
        let post = YoloPostProcess::default();
        let cands = post.decode(out.view(), None).unwrap();

        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].class_id, 1);
        assert_eq!(cands[0].score, 0.9);
        assert_eq!(cands[0].bbox, BoundingBox::new(40.0, 40.0, 60.0, 60.0));
    }

    #[test]
    fn test_decode_with_restricted_classes_remaps_ids() {
        let out = output(&[(50.0, 50.0, 20.0, 20.0, vec![0.95, 0.1, 0.6])]);
        let post = YoloPostProcess::default();

        // Only classes 2 and 1 are allowed: class 0 must be ignored despite its score.
        let cands = post.decode(out.view(), Some(&[2, 1])).unwrap();
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].class_id, 0);
        assert_eq!(cands[0].score, 0.6);

        assert!(post.decode(out.view(), Some(&[3])).is_err());
    }

    #[test]
    fn test_decode_skips_non_finite_scores() {
        let out = output(&[(50.0, 50.0, 20.0, 20.0, vec![f32::NAN, 0.9, f32::INFINITY])]);
        let cands = YoloPostProcess::default().decode(out.view(), None).unwrap();

        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].class_id, 1);
        assert_eq!(cands[0].score, 0.9);
    }

    #[test]
    fn test_decode_rejects_headless_output() {
        let out = Array2::<f32>::zeros((4, 10));
        assert!(YoloPostProcess::default().decode(out.view(), None).is_err());
    }

    #[test]
    fn test_nms_is_class_aware() {
        let a = Candidate {
            bbox: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            score: 0.9,
            class_id: 0,
        };
        let b = Candidate {
            bbox: BoundingBox::new(5.0, 5.0, 100.0, 100.0),
            score: 0.8,
            class_id: 0,
        };
        let c = Candidate {
            class_id: 1,
            score: 0.7,
            ..b
        };

        let post = YoloPostProcess::default();
        let kept = post.nms(vec![b, c, a]);
        assert_eq!(kept, vec![a, c]);

        let agnostic = YoloPostProcess {
            agnostic: true,
            ..Default::default()
        };
        assert_eq!(agnostic.nms(vec![a, b, c]), vec![a]);
    }

    #[test]
    fn test_nms_respects_max_det_and_tie_order() {
        let boxes: Vec<Candidate> = (0..5)
            .map(|i| Candidate {
                bbox: BoundingBox::new(i as f32 * 200.0, 0.0, i as f32 * 200.0 + 50.0, 50.0),
                score: 0.5,
                class_id: 0,
            })
            .collect();
        let post = YoloPostProcess {
            max_det: 3,
            ..Default::default()
        };
        let kept = post.nms(boxes.clone());
        assert_eq!(kept, boxes[..3].to_vec());
    }

    #[test]
    fn test_apply_scales_back_to_original() {
        let out = output(&[(320.0, 320.0, 100.0, 100.0, vec![0.8])]);
        let info = LetterboxInfo {
            ratio: 0.5,
            pad: (0.0, 80.0),
            orig_size: (1280, 960),
        };
        let cands = YoloPostProcess::default()
            .apply(out.view(), None, &info)
            .unwrap();

        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].bbox, BoundingBox::new(540.0, 380.0, 740.0, 580.0));
    }

    #[test]
    fn test_scale_boxes_clips() {
        let cand = Candidate {
            bbox: BoundingBox::new(-10.0, -10.0, 120.0, 90.0),
            score: 0.5,
            class_id: 0,
        };
        let scaled = scale_boxes(vec![cand], &identity_info(100, 80));
        assert_eq!(scaled[0].bbox, BoundingBox::new(0.0, 0.0, 100.0, 80.0));
    }
}
