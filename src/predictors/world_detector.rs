//! YOLO-World detector.
//!
//! The three steps of a typical run map onto three calls:
//!
//! ```rust,no_run
//! use yolo_world::predictors::WorldDetector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = WorldDetector::builder()
//!     .text_encoder("clip_text.onnx", "clip_tokenizer.json")
//!     .build("yolov8s-world.onnx")?;
//! detector.set_classes(&["soup", "pasta"])?;
//! let results = detector.predict_path("yemek.jpg")?;
//! println!("{}", results[0].summary());
//! # Ok(())
//! # }
//! ```

use super::builder::{PredictorBuilderState, TaskPredictorBuilder};
use crate::core::config::{DEFAULT_IMGSZ, MODEL_STRIDE, OrtSessionConfig, WorldDetectorConfig};
use crate::core::errors::{DetectError, DetectResult, OpaqueError};
use crate::core::inference::OrtInfer;
use crate::core::tensor::Tensor3D;
use crate::domain::{
    ClassPrompts, ClassSelection, ClipTextEncoder, DetectionResult, Speed, TextEmbeddings,
    Vocabulary,
};
use crate::processors::{LetterBox, LetterboxInfo, YoloPostProcess, to_tensor};
use crate::utils::{load_image, load_images};
use image::RgbImage;
use ndarray::Axis;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Open-vocabulary object detector backed by an ONNX export of YOLO-World.
#[derive(Debug)]
pub struct WorldDetector {
    infer: OrtInfer,
    config: WorldDetectorConfig,
    letterbox: LetterBox,
    postprocess: YoloPostProcess,
    classes: ActiveClasses,
}

impl WorldDetector {
    pub fn builder() -> WorldDetectorBuilder {
        WorldDetectorBuilder::new()
    }

    /// Loads a detector with default settings.
    pub fn load(model_path: impl AsRef<Path>) -> DetectResult<Self> {
        Self::builder().build(model_path)
    }

    /// Restricts detection to `classes`, in that order.
    ///
    /// Afterwards class ids index `classes` and [`names`](Self::names) returns them.
    /// With a text encoder any name works. Otherwise a name must be in the model's
    /// vocabulary or its text embedding bank, or [`DetectError::UnknownClass`] is
    /// returned.
    pub fn set_classes<S: AsRef<str>>(&mut self, classes: &[S]) -> DetectResult<()> {
        self.classes.set(classes)?;
        info!("Restricted classes to {:?}", self.classes.names());
        self.config.classes = Some(self.classes.names().to_vec());
        Ok(())
    }

    /// Drops any restriction and returns to the model's full vocabulary.
    pub fn clear_classes(&mut self) -> DetectResult<()> {
        self.classes.clear()?;
        self.config.classes = None;
        Ok(())
    }

    /// Names of the currently active classes. Empty when the model carries no names.
    pub fn names(&self) -> &[String] {
        self.classes.names()
    }

    pub fn config(&self) -> &WorldDetectorConfig {
        &self.config
    }

    /// Input size the detector letterboxes to, as (height, width).
    pub fn input_size(&self) -> (u32, u32) {
        self.letterbox.target_size()
    }

    pub fn model_name(&self) -> &str {
        self.infer.model_name()
    }

    /// Runs detection on one in-memory image.
    pub fn predict_image(&self, img: &RgbImage) -> DetectResult<DetectionResult> {
        let start = Instant::now();
        let (letterboxed, info) = self.letterbox.apply(img)?;
        let tensor = to_tensor(&letterboxed);
        let preprocessed = Instant::now();

        let output = self
            .infer
            .infer_3d(&tensor, self.classes.text_features())?;
        let inferred = Instant::now();

        let mut result = decode_output(
            &output,
            &self.classes,
            &self.postprocess,
            &info,
            self.infer.model_name(),
        )?;
        let done = Instant::now();

        result.speed = Speed {
            preprocess: millis(start, preprocessed),
            inference: millis(preprocessed, inferred),
            postprocess: millis(inferred, done),
        };
        Ok(result.with_image(img.clone()))
    }

    /// Runs detection on each image, returning one result per image.
    pub fn predict(&self, images: Vec<RgbImage>) -> DetectResult<Vec<DetectionResult>> {
        if images.is_empty() {
            return Err(DetectError::invalid_input("No images provided for detection"));
        }
        images.iter().map(|img| self.predict_image(img)).collect()
    }

    /// Loads an image file and runs detection on it.
    ///
    /// Returns a single-element list, matching [`predict_batch`](Self::predict_batch).
    pub fn predict_path(&self, path: impl AsRef<Path>) -> DetectResult<Vec<DetectionResult>> {
        let path = path.as_ref();
        let img = load_image(path)?;
        let result = self.predict_image(&img)?.with_path(path);
        log_result(path, &result);
        Ok(vec![result])
    }

    /// Loads the images in parallel, then detects on each in order.
    pub fn predict_batch<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
    ) -> DetectResult<Vec<DetectionResult>> {
        if paths.is_empty() {
            return Err(DetectError::invalid_input("No images provided for detection"));
        }
        let images = load_images(paths)?;
        paths
            .iter()
            .zip(images.iter())
            .map(|(path, img)| {
                let result = self.predict_image(img)?.with_path(path.as_ref());
                log_result(path.as_ref(), &result);
                Ok(result)
            })
            .collect()
    }
}

fn log_result(path: &Path, result: &DetectionResult) {
    info!(
        "{}: {}, {:.1}ms inference, {:.1}ms total",
        path.display(),
        result.summary(),
        result.speed.inference,
        result.speed.total()
    );
}

fn millis(from: Instant, to: Instant) -> f64 {
    to.duration_since(from).as_secs_f64() * 1000.0
}

/// Class state of a detector: the model's vocabulary, its prompt source for
/// text-feature exports, and the restriction currently in force.
#[derive(Debug)]
struct ActiveClasses {
    vocabulary: Option<Vocabulary>,
    prompts: Option<Box<dyn ClassPrompts>>,
    selection: Option<ClassSelection>,
}

impl ActiveClasses {
    fn new(
        vocabulary: Option<Vocabulary>,
        prompts: Option<Box<dyn ClassPrompts>>,
    ) -> DetectResult<Self> {
        let mut classes = Self {
            vocabulary,
            prompts,
            selection: None,
        };
        classes.selection = classes.default_selection()?;
        Ok(classes)
    }

    /// Selection used when no classes were requested: none for baked
    /// vocabularies, every known name for prompt sources.
    fn default_selection(&self) -> DetectResult<Option<ClassSelection>> {
        let Some(prompts) = self.prompts.as_deref() else {
            return Ok(None);
        };
        let names = match &self.vocabulary {
            Some(vocab) if vocab.names().iter().all(|n| prompts.resolve(n).is_some()) => {
                vocab.names().to_vec()
            }
            _ => prompts.known_names(),
        };
        if names.is_empty() {
            return Ok(None);
        }
        ClassSelection::from_prompts(&names, prompts).map(Some)
    }

    fn set<S: AsRef<str>>(&mut self, classes: &[S]) -> DetectResult<()> {
        let selection = if let Some(prompts) = self.prompts.as_deref() {
            ClassSelection::from_prompts(classes, prompts)?
        } else if let Some(vocabulary) = &self.vocabulary {
            ClassSelection::from_vocabulary(classes, vocabulary)?
        } else {
            return Err(DetectError::config_error(
                "model carries no class names; provide a class name file to restrict classes",
            ));
        };
        self.selection = Some(selection);
        Ok(())
    }

    fn clear(&mut self) -> DetectResult<()> {
        let selection = self.default_selection()?;
        if selection.is_none() && self.prompts.is_some() {
            return Err(DetectError::config_error(
                "no default class list for this text-feature model; call set_classes instead",
            ));
        }
        self.selection = selection;
        Ok(())
    }

    fn names(&self) -> &[String] {
        if let Some(selection) = &self.selection {
            selection.names()
        } else if let Some(vocabulary) = &self.vocabulary {
            vocabulary.names()
        } else {
            &[]
        }
    }

    fn text_features(&self) -> Option<&Tensor3D> {
        self.selection.as_ref().and_then(ClassSelection::text_features)
    }

    fn allowed_indices(&self) -> Option<&[usize]> {
        self.selection.as_ref().and_then(ClassSelection::allowed_indices)
    }

    /// Number of class channels the model output must carry, when known.
    fn expected_channels(&self) -> Option<usize> {
        if self.prompts.is_some() {
            self.selection.as_ref().map(ClassSelection::len)
        } else {
            self.vocabulary.as_ref().map(Vocabulary::len)
        }
    }
}

/// Turns one raw `[1, 4 + nc, anchors]` output into a labelled result.
fn decode_output(
    output: &Tensor3D,
    classes: &ActiveClasses,
    postprocess: &YoloPostProcess,
    info: &LetterboxInfo,
    model_name: &str,
) -> DetectResult<DetectionResult> {
    let (_, channels, anchors) = output.dim();
    let num_classes = channels.saturating_sub(4);
    if let Some(expected) = classes.expected_channels()
        && expected != num_classes
    {
        return Err(DetectError::model_inference_error(
            model_name,
            "output_validation",
            output.shape(),
            &format!(
                "model output has {} classes but {} class names are active",
                num_classes, expected
            ),
            OpaqueError("Class count mismatch".to_string()),
        ));
    }
    debug!("Model output: {} classes x {} anchors", num_classes, anchors);

    let candidates =
        postprocess.apply(output.index_axis(Axis(0), 0), classes.allowed_indices(), info)?;

    let names: Vec<String> = if classes.names().is_empty() {
        Vocabulary::generic(num_classes).names().to_vec()
    } else {
        classes.names().to_vec()
    };
    Ok(DetectionResult::from_candidates(
        candidates,
        &names,
        info.orig_size,
    ))
}

/// Builder for [`WorldDetector`].
#[derive(Debug)]
pub struct WorldDetectorBuilder {
    state: PredictorBuilderState<WorldDetectorConfig>,
    class_names_file: Option<PathBuf>,
    text_embeddings_file: Option<PathBuf>,
    text_encoder: Option<(PathBuf, PathBuf)>,
}

impl TaskPredictorBuilder for WorldDetectorBuilder {
    type Config = WorldDetectorConfig;

    fn state_mut(&mut self) -> &mut PredictorBuilderState<WorldDetectorConfig> {
        &mut self.state
    }
}

impl WorldDetectorBuilder {
    pub fn new() -> Self {
        Self {
            state: PredictorBuilderState::new(WorldDetectorConfig::default()),
            class_names_file: None,
            text_embeddings_file: None,
            text_encoder: None,
        }
    }

    /// Replace the full detector configuration.
    pub fn with_config(self, config: WorldDetectorConfig) -> Self {
        <Self as TaskPredictorBuilder>::with_config(self, config)
    }

    /// Configure ONNX Runtime session options.
    pub fn with_ort_config(self, config: OrtSessionConfig) -> Self {
        <Self as TaskPredictorBuilder>::with_ort_config(self, config)
    }

    /// Conditionally configure ONNX Runtime session options if present.
    pub fn with_optional_ort_config(self, config: Option<OrtSessionConfig>) -> Self {
        <Self as TaskPredictorBuilder>::with_optional_ort_config(self, config)
    }

    pub fn conf_threshold(mut self, threshold: f32) -> Self {
        self.state.config_mut().conf_threshold = threshold;
        self
    }

    pub fn iou_threshold(mut self, threshold: f32) -> Self {
        self.state.config_mut().iou_threshold = threshold;
        self
    }

    pub fn max_det(mut self, max_det: usize) -> Self {
        self.state.config_mut().max_det = max_det;
        self
    }

    pub fn imgsz(mut self, imgsz: u32) -> Self {
        self.state.config_mut().imgsz = Some(imgsz);
        self
    }

    pub fn agnostic_nms(mut self, agnostic: bool) -> Self {
        self.state.config_mut().agnostic_nms = agnostic;
        self
    }

    /// Classes to restrict to right after loading.
    pub fn classes<S: Into<String>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.state.config_mut().classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    /// Class names to use instead of the ones embedded in the model, one per line.
    pub fn class_names_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.class_names_file = Some(path.into());
        self
    }

    /// JSON bank of class text embeddings, for exports with a text-feature input.
    pub fn text_embeddings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.text_embeddings_file = Some(path.into());
        self
    }

    /// CLIP text tower (ONNX) and its `tokenizer.json`, for exports with a
    /// text-feature input. Lets `set_classes` take arbitrary names.
    pub fn text_encoder(
        mut self,
        model_path: impl Into<PathBuf>,
        tokenizer_path: impl Into<PathBuf>,
    ) -> Self {
        self.text_encoder = Some((model_path.into(), tokenizer_path.into()));
        self
    }

    pub fn build(self, model_path: impl AsRef<Path>) -> DetectResult<WorldDetector> {
        let (config, ort_config) = self.state.into_parts();
        config.validate()?;

        let prompts: Option<Box<dyn ClassPrompts>> =
            match (&self.text_embeddings_file, &self.text_encoder) {
                (Some(_), Some(_)) => {
                    return Err(DetectError::config_error(
                        "use either a text embedding file or a text encoder, not both",
                    ));
                }
                (Some(path), None) => {
                    let bank = TextEmbeddings::from_json_file(path)?;
                    Some(Box::new(bank) as Box<dyn ClassPrompts>)
                }
                (None, Some((encoder, tokenizer))) => {
                    let encoder =
                        ClipTextEncoder::from_config(encoder, tokenizer, ort_config.as_ref())?;
                    Some(Box::new(encoder) as Box<dyn ClassPrompts>)
                }
                (None, None) => None,
            };

        let infer = OrtInfer::from_config(model_path.as_ref(), ort_config.as_ref())?;

        let vocabulary = match &self.class_names_file {
            Some(path) => Some(Vocabulary::from_file(path)?),
            None => infer.metadata().names.clone().map(Vocabulary::new),
        };

        match (prompts.as_deref(), infer.accepts_text_features()) {
            (None, true) => {
                return Err(DetectError::config_error(format!(
                    "model '{}' takes class text embeddings; provide a text encoder or a text embedding file",
                    infer.model_name()
                )));
            }
            (Some(_), false) => {
                return Err(DetectError::config_error(format!(
                    "model '{}' has a fixed vocabulary and no text-feature input; text prompts cannot be used",
                    infer.model_name()
                )));
            }
            (Some(prompts), true) => {
                if let (Some(expected), Some(dim)) = (infer.text_feature_dim(), prompts.dim())
                    && expected != dim
                {
                    return Err(DetectError::config_error(format!(
                        "text embeddings have {} dimensions but the model expects {}",
                        dim, expected
                    )));
                }
            }
            (None, false) => {}
        }

        let imgsz = resolve_imgsz(
            config.imgsz,
            infer.static_input_size(),
            infer.metadata().imgsz,
        );
        info!(
            "Detector '{}' ready: input {}x{}, conf {}, iou {}",
            infer.model_name(),
            imgsz.1,
            imgsz.0,
            config.conf_threshold,
            config.iou_threshold
        );

        let postprocess = YoloPostProcess::new(
            config.conf_threshold,
            config.iou_threshold,
            config.max_det,
            config.agnostic_nms,
        );
        let text_model = prompts.is_some();
        let classes = ActiveClasses::new(vocabulary, prompts)?;
        let requested = config.classes.clone();
        if text_model && requested.is_none() && classes.selection.is_none() {
            return Err(DetectError::config_error(format!(
                "model '{}' has no class names to prompt with; pass classes or a class name file",
                infer.model_name()
            )));
        }

        let mut detector = WorldDetector {
            infer,
            config,
            letterbox: LetterBox::new(imgsz.0, imgsz.1),
            postprocess,
            classes,
        };
        if let Some(classes) = requested {
            detector.set_classes(&classes)?;
        }
        Ok(detector)
    }
}

impl Default for WorldDetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the input size as (height, width): a static graph input wins, then the
/// configured size, then the exporter's metadata, then the default.
fn resolve_imgsz(
    requested: Option<u32>,
    fixed: Option<(u32, u32)>,
    exported: Option<(u32, u32)>,
) -> (u32, u32) {
    if let Some(size) = fixed {
        if let Some(requested) = requested
            && (requested, requested) != size
        {
            warn!(
                "Model input is fixed at {}x{}; ignoring requested imgsz {}",
                size.1, size.0, requested
            );
        }
        return size;
    }
    if let Some(size) = requested {
        return (size, size);
    }
    if let Some((h, w)) = exported
        && h % MODEL_STRIDE == 0
        && w % MODEL_STRIDE == 0
    {
        return (h, w);
    }
    (DEFAULT_IMGSZ, DEFAULT_IMGSZ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn menu() -> Vocabulary {
        Vocabulary::new(["person", "soup", "pasta"])
    }

    fn bank() -> TextEmbeddings {
        let mut map = BTreeMap::new();
        map.insert("pasta".to_string(), vec![0.0, 1.0]);
        map.insert("soup".to_string(), vec![1.0, 0.0]);
        TextEmbeddings::from_map(map).unwrap()
    }

    fn identity_info() -> LetterboxInfo {
        LetterboxInfo {
            ratio: 1.0,
            pad: (0.0, 0.0),
            orig_size: (640, 640),
        }
    }

    /// Builds a `[1, 4 + nc, anchors]` output from (cx, cy, w, h, scores) rows.
    fn raw_output(anchors: &[(f32, f32, f32, f32, Vec<f32>)]) -> Tensor3D {
        let nc = anchors[0].4.len();
        let mut out = Tensor3D::zeros((1, 4 + nc, anchors.len()));
        for (a, (cx, cy, w, h, scores)) in anchors.iter().enumerate() {
            out[[0, 0, a]] = *cx;
            out[[0, 1, a]] = *cy;
            out[[0, 2, a]] = *w;
            out[[0, 3, a]] = *h;
            for (c, s) in scores.iter().enumerate() {
                out[[0, 4 + c, a]] = *s;
            }
        }
        out
    }

    #[test]
    fn test_restricted_vocabulary_remaps_ids_and_names() {
        let mut classes = ActiveClasses::new(Some(menu()), None).unwrap();
        classes.set(&["pasta", "soup"]).unwrap();
        assert_eq!(classes.names(), &["pasta".to_string(), "soup".to_string()]);

        let output = raw_output(&[
            (50.0, 50.0, 20.0, 20.0, vec![0.95, 0.1, 0.8]),
            (300.0, 300.0, 40.0, 40.0, vec![0.0, 0.7, 0.0]),
        ]);
        let result = decode_output(
            &output,
            &classes,
            &YoloPostProcess::default(),
            &identity_info(),
            "yolov8s-world",
        )
        .unwrap();

        assert_eq!(result.names, vec!["pasta".to_string(), "soup".to_string()]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.detections[0].class_id, 0);
        assert_eq!(result.detections[0].class_name, "pasta");
        assert_eq!(result.detections[0].confidence, 0.8);
        assert_eq!(result.detections[1].class_id, 1);
        assert_eq!(result.detections[1].class_name, "soup");
    }

    #[test]
    fn test_channel_mismatch_is_an_inference_error() {
        let classes = ActiveClasses::new(Some(menu()), None).unwrap();
        let output = raw_output(&[(50.0, 50.0, 20.0, 20.0, vec![0.9, 0.1])]);
        let err = decode_output(
            &output,
            &classes,
            &YoloPostProcess::default(),
            &identity_info(),
            "yolov8s-world",
        )
        .unwrap_err();
        assert!(matches!(err, DetectError::ModelInference { .. }));
    }

    #[test]
    fn test_clear_restores_full_vocabulary() {
        let mut classes = ActiveClasses::new(Some(menu()), None).unwrap();
        classes.set(&["soup"]).unwrap();
        assert_eq!(classes.allowed_indices(), Some(&[1][..]));

        classes.clear().unwrap();
        assert_eq!(classes.names(), menu().names());
        assert!(classes.allowed_indices().is_none());
        assert_eq!(classes.expected_channels(), Some(3));
    }

    #[test]
    fn test_unnamed_model_uses_generic_labels() {
        let mut classes = ActiveClasses::new(None, None).unwrap();
        assert!(classes.names().is_empty());
        assert!(matches!(
            classes.set(&["soup"]),
            Err(DetectError::ConfigError { .. })
        ));

        let output = raw_output(&[(50.0, 50.0, 20.0, 20.0, vec![0.1, 0.6])]);
        let result = decode_output(
            &output,
            &classes,
            &YoloPostProcess::default(),
            &identity_info(),
            "model",
        )
        .unwrap();
        assert_eq!(result.names, vec!["class0".to_string(), "class1".to_string()]);
        assert_eq!(result.detections[0].class_name, "class1");
    }

    #[test]
    fn test_prompted_classes_feed_text_features() {
        let mut classes = ActiveClasses::new(None, Some(Box::new(bank()))).unwrap();
        assert_eq!(classes.names(), &["pasta".to_string(), "soup".to_string()]);
        assert_eq!(classes.text_features().unwrap().shape(), &[1, 2, 2]);

        classes.set(&["Soup"]).unwrap();
        assert_eq!(classes.expected_channels(), Some(1));
        assert_eq!(classes.text_features().unwrap().shape(), &[1, 1, 2]);
        assert!(classes.allowed_indices().is_none());

        let output = raw_output(&[(50.0, 50.0, 20.0, 20.0, vec![0.6])]);
        let result = decode_output(
            &output,
            &classes,
            &YoloPostProcess::default(),
            &identity_info(),
            "yolov8s-worldv2-text",
        )
        .unwrap();
        assert_eq!(result.detections[0].class_name, "Soup");

        assert!(matches!(
            classes.set(&["bean"]),
            Err(DetectError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_prompted_default_follows_vocabulary_order() {
        let vocab = Vocabulary::new(["soup", "pasta"]);
        let classes = ActiveClasses::new(Some(vocab.clone()), Some(Box::new(bank()))).unwrap();
        assert_eq!(classes.names(), vocab.names());
    }

    #[test]
    fn test_resolve_imgsz_precedence() {
        assert_eq!(resolve_imgsz(Some(320), Some((480, 640)), None), (480, 640));
        assert_eq!(resolve_imgsz(Some(320), None, Some((640, 640))), (320, 320));
        assert_eq!(resolve_imgsz(None, None, Some((384, 640))), (384, 640));
        assert_eq!(resolve_imgsz(None, None, Some((100, 100))), (640, 640));
        assert_eq!(resolve_imgsz(None, None, None), (640, 640));
    }

    #[test]
    fn test_builder_collects_settings() {
        let builder = WorldDetector::builder()
            .conf_threshold(0.4)
            .iou_threshold(0.5)
            .max_det(10)
            .imgsz(320)
            .agnostic_nms(true)
            .classes(["soup", "pasta"])
            .class_names_file("names.txt")
            .text_encoder("clip_text.onnx", "clip_tokenizer.json");

        assert_eq!(
            builder.text_encoder,
            Some((
                PathBuf::from("clip_text.onnx"),
                PathBuf::from("clip_tokenizer.json")
            ))
        );
        let (config, ort) = builder.state.into_parts();
        assert_eq!(config.conf_threshold, 0.4);
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.max_det, 10);
        assert_eq!(config.imgsz, Some(320));
        assert!(config.agnostic_nms);
        assert_eq!(
            config.classes,
            Some(vec!["soup".to_string(), "pasta".to_string()])
        );
        assert!(ort.is_none());
    }

    #[test]
    fn test_build_rejects_invalid_config_before_loading() {
        let err = WorldDetector::builder()
            .conf_threshold(2.0)
            .build("missing.onnx")
            .unwrap_err();
        assert!(matches!(err, DetectError::ConfigError { .. }));

        let err = WorldDetector::builder()
            .text_embeddings_file("bank.json")
            .text_encoder("clip_text.onnx", "clip_tokenizer.json")
            .build("missing.onnx")
            .unwrap_err();
        assert!(matches!(err, DetectError::ConfigError { .. }));
    }

    #[test]
    fn test_load_missing_model_fails() {
        let err = WorldDetector::load("definitely/not/here.onnx").unwrap_err();
        assert!(matches!(err, DetectError::ModelLoad { .. }));
    }
}
