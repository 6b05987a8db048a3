//! YOLO-World command-line detector.
//!
//! Loads a model, optionally restricts it to a list of classes, runs it on one
//! or more images and shows, saves or prints the results.
//!
//! # Usage
//!
//! ```bash
//! yolo-world --model yolov8s-world.onnx \
//!     --text-encoder clip_text.onnx --tokenizer clip_tokenizer.json \
//!     --classes soup,pasta yemek.jpg
//! yolo-world --model yolov8s-world.onnx --save-dir runs/ --no-show --json *.jpg
//! ```

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use yolo_world::core::config::parse_device_config;
use yolo_world::core::init_tracing;
use yolo_world::prelude::*;

/// Command-line arguments for the detector
#[derive(Parser)]
#[command(name = "yolo-world")]
#[command(about = "Open-vocabulary object detection with YOLO-World ONNX models")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model: PathBuf,

    /// Paths to input images
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Comma-separated class names to restrict detection to (e.g. "soup,pasta")
    #[arg(short, long, value_delimiter = ',')]
    classes: Vec<String>,

    /// Confidence threshold
    #[arg(long)]
    conf: Option<f32>,

    /// IoU threshold for NMS
    #[arg(long)]
    iou: Option<f32>,

    /// Maximum detections per image
    #[arg(long)]
    max_det: Option<usize>,

    /// Square inference size, a multiple of 32
    #[arg(long)]
    imgsz: Option<u32>,

    /// Class-agnostic NMS
    #[arg(long)]
    agnostic_nms: bool,

    /// Device to use for inference (e.g., 'cpu', 'cuda', 'cuda:0')
    #[arg(long, default_value = "cpu")]
    device: String,

    /// JSON detector configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Class names file (one per line), replacing the names stored in the model
    #[arg(long)]
    class_names: Option<PathBuf>,

    /// JSON bank of class text embeddings, for models with a text-feature input
    #[arg(long)]
    text_embeddings: Option<PathBuf>,

    /// CLIP text encoder (ONNX) for models with a text-feature input
    #[arg(long, requires = "tokenizer")]
    text_encoder: Option<PathBuf>,

    /// tokenizer.json of the CLIP text encoder
    #[arg(long, requires = "text_encoder")]
    tokenizer: Option<PathBuf>,

    /// Directory to save annotated images to
    #[arg(short, long)]
    save_dir: Option<PathBuf>,

    /// Do not open annotated images in the image viewer
    #[arg(long)]
    no_show: bool,

    /// Print results as JSON to stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn detector_config(&self) -> DetectResult<WorldDetectorConfig> {
        let mut config = match &self.config {
            Some(path) => WorldDetectorConfig::from_json_file(path)?,
            None => WorldDetectorConfig::default(),
        };
        if let Some(conf) = self.conf {
            config.conf_threshold = conf;
        }
        if let Some(iou) = self.iou {
            config.iou_threshold = iou;
        }
        if let Some(max_det) = self.max_det {
            config.max_det = max_det;
        }
        if self.imgsz.is_some() {
            config.imgsz = self.imgsz;
        }
        if self.agnostic_nms {
            config.agnostic_nms = true;
        }
        if !self.classes.is_empty() {
            config.classes = Some(
                self.classes
                    .iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            );
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args = Args::parse();

    info!("Loading model: {:?}", args.model);
    info!("Using device: {}", args.device);
    let ort_config = parse_device_config(&args.device)?;

    let mut builder = WorldDetector::builder()
        .with_config(args.detector_config()?)
        .with_optional_ort_config(ort_config);
    if let Some(path) = &args.class_names {
        builder = builder.class_names_file(path);
    }
    if let Some(path) = &args.text_embeddings {
        builder = builder.text_embeddings_file(path);
    }
    if let (Some(encoder), Some(tokenizer)) = (&args.text_encoder, &args.tokenizer) {
        builder = builder.text_encoder(encoder, tokenizer);
    }
    let detector = builder.build(&args.model)?;
    info!("Active classes: {}", detector.names().len());

    if let Some(ref save_dir) = args.save_dir {
        fs::create_dir_all(save_dir)?;
    }

    let mut all_results = Vec::with_capacity(args.images.len());
    for (idx, image_path) in args.images.iter().enumerate() {
        info!(
            "Processing image {}/{}: {:?}",
            idx + 1,
            args.images.len(),
            image_path
        );

        let results = match detector.predict_path(image_path) {
            Ok(results) => results,
            Err(e) => {
                error!("Detection failed for {:?}: {}", image_path, e);
                continue;
            }
        };
        let Some(result) = results.into_iter().next() else {
            continue;
        };

        for det in &result.detections {
            info!(
                "  {} {:.2} [{:.1}, {:.1}, {:.1}, {:.1}]",
                det.class_name,
                det.confidence,
                det.bbox.x1,
                det.bbox.y1,
                det.bbox.x2,
                det.bbox.y2
            );
        }

        if let Some(ref save_dir) = args.save_dir {
            let file_name = image_path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("image_{}.png", idx)));
            let output_path = save_dir.join(file_name);
            result.save(&output_path)?;
            info!("Saved annotated image to {:?}", output_path);
        }

        if !args.no_show {
            let shown = result.show()?;
            info!("Opened {:?} in the image viewer", shown);
        }

        all_results.push(result);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&all_results)?);
    }

    Ok(())
}
