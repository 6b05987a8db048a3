//! Full-vocabulary detection.
//!
//! Loads `yolov8s-world.onnx`, runs it on `yemek.jpg` with every class named in
//! the model metadata, and shows the first result. The model is a text-feature
//! export, so the CLIP text encoder embeds those names at load time.
//!
//! ```bash
//! cargo run --example world_full_vocab
//! ```

use yolo_world::core::init_tracing;
use yolo_world::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let model = WorldDetector::builder()
        .text_encoder("clip_text.onnx", "clip_tokenizer.json")
        .build("yolov8s-world.onnx")?;
    let results = model.predict_path("yemek.jpg")?;
    results[0].show()?;

    Ok(())
}
