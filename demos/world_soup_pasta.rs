//! Detects only soup and pasta in `yemek.jpg`.
//!
//! Neither name is in the COCO vocabulary, so the classes are embedded with the
//! CLIP text encoder and fed to the text-feature input of the model.
//!
//! ```bash
//! cargo run --example world_soup_pasta
//! ```

use yolo_world::core::init_tracing;
use yolo_world::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut model = WorldDetector::builder()
        .text_encoder("clip_text.onnx", "clip_tokenizer.json")
        .build("yolov8s-world.onnx")?;
    model.set_classes(&["soup", "pasta"])?;

    let results = model.predict_path("yemek.jpg")?;
    results[0].show()?;

    Ok(())
}
