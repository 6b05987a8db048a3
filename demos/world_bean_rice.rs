//! Detects only beans and rice in `yemek2.jpg`.
//!
//! ```bash
//! cargo run --example world_bean_rice
//! ```

use yolo_world::core::init_tracing;
use yolo_world::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut model = WorldDetector::builder()
        .text_encoder("clip_text.onnx", "clip_tokenizer.json")
        .build("yolov8s-world.onnx")?;
    model.set_classes(&["bean", "rice"])?;

    let results = model.predict_path("yemek2.jpg")?;
    results[0].show()?;

    Ok(())
}
