//! Prediction results.

use crate::core::errors::DetectResult;
use crate::processors::{BoundingBox, Candidate};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Box on the original image, in pixels.
    pub bbox: BoundingBox,
    /// Index into [`DetectionResult::names`].
    pub class_id: usize,
    pub class_name: String,
    pub confidence: f32,
}

/// Wall-clock time spent in each stage, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub preprocess: f64,
    pub inference: f64,
    pub postprocess: f64,
}

impl Speed {
    pub fn total(&self) -> f64 {
        self.preprocess + self.inference + self.postprocess
    }
}

/// Detections for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Source file, when the image was loaded from disk.
    pub path: Option<PathBuf>,
    /// Original (width, height).
    pub orig_size: (u32, u32),
    /// Detections ordered by descending confidence.
    pub detections: Vec<Detection>,
    /// Class names active when the prediction ran.
    pub names: Vec<String>,
    pub speed: Speed,
    /// The image the prediction ran on, kept for plotting.
    #[serde(skip)]
    pub orig_img: Option<RgbImage>,
}

impl DetectionResult {
    /// Builds a result from post-processed candidates, labelling them with `names`.
    pub fn from_candidates(
        candidates: Vec<Candidate>,
        names: &[String],
        orig_size: (u32, u32),
    ) -> Self {
        let detections = candidates
            .into_iter()
            .map(|c| Detection {
                bbox: c.bbox,
                class_id: c.class_id,
                class_name: names
                    .get(c.class_id)
                    .cloned()
                    .unwrap_or_else(|| format!("class{}", c.class_id)),
                confidence: c.score,
            })
            .collect();

        Self {
            path: None,
            orig_size,
            detections,
            names: names.to_vec(),
            speed: Speed::default(),
            orig_img: None,
        }
    }

    /// Attaches the source image so the result can be plotted.
    pub fn with_image(mut self, img: RgbImage) -> Self {
        self.orig_img = Some(img);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Number of detections per class, in `names` order, omitting classes with none.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut counts = vec![0usize; self.names.len()];
        for det in &self.detections {
            if let Some(count) = counts.get_mut(det.class_id) {
                *count += 1;
            }
        }
        self.names
            .iter()
            .zip(counts)
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| (name.as_str(), n))
            .collect()
    }

    /// One-line summary such as `640x480 2 soups, 1 pasta`.
    pub fn summary(&self) -> String {
        let (w, h) = self.orig_size;
        let counts = self.counts();
        if counts.is_empty() {
            return format!("{}x{} (no detections)", w, h);
        }
        let parts: Vec<String> = counts
            .into_iter()
            .map(|(name, n)| {
                if n > 1 {
                    format!("{} {}s", n, name)
                } else {
                    format!("{} {}", n, name)
                }
            })
            .collect();
        format!("{}x{} {}", w, h, parts.join(", "))
    }

    pub fn to_json(&self) -> DetectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(class_id: usize, score: f32) -> Candidate {
        Candidate {
            bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            score,
            class_id,
        }
    }

    fn names() -> Vec<String> {
        vec!["soup".to_string(), "pasta".to_string()]
    }

    #[test]
    fn test_from_candidates_labels_detections() {
        let result = DetectionResult::from_candidates(
            vec![candidate(1, 0.9), candidate(0, 0.8)],
            &names(),
            (640, 480),
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.detections[0].class_name, "pasta");
        assert_eq!(result.detections[1].class_name, "soup");
        assert_eq!(result.names, names());
    }

    #[test]
    fn test_summary_pluralizes_counts() {
        let result = DetectionResult::from_candidates(
            vec![candidate(0, 0.9), candidate(1, 0.8), candidate(0, 0.7)],
            &names(),
            (640, 480),
        );
        assert_eq!(result.summary(), "640x480 2 soups, 1 pasta");
        assert_eq!(result.counts(), vec![("soup", 2), ("pasta", 1)]);
    }

    #[test]
    fn test_summary_without_detections() {
        let result = DetectionResult::from_candidates(Vec::new(), &names(), (32, 16));
        assert!(result.is_empty());
        assert_eq!(result.summary(), "32x16 (no detections)");
    }

    #[test]
    fn test_to_json_contains_fields() {
        let result =
            DetectionResult::from_candidates(vec![candidate(0, 0.5)], &names(), (100, 100));
        let json = result.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["detections"][0]["class_name"], "soup");
        assert_eq!(value["orig_size"][0], 100);
    }

    #[test]
    fn test_speed_total_sums_stages() {
        let speed = Speed {
            preprocess: 1.5,
            inference: 10.0,
            postprocess: 0.5,
        };
        assert_eq!(speed.total(), 12.0);
        assert_eq!(Speed::default().total(), 0.0);
    }
}
