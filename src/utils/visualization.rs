//! Drawing, saving and displaying detection results.
//!
//! Boxes are colored per class from a fixed 20-color palette and labelled with
//! `"<name> <confidence>"`. Labels need a TrueType font; when no system font is
//! found only the boxes are drawn.
//!
//! ```rust,no_run
//! use yolo_world::predictors::WorldDetector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = WorldDetector::load("yolov8s-world.onnx")?;
//! let results = detector.predict_path("yemek.jpg")?;
//! results[0].show()?;
//! # Ok(())
//! # }
//! ```

use crate::core::errors::{DetectError, DetectResult};
use crate::domain::DetectionResult;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PALETTE_HEX: [u32; 20] = [
    0xFF3838, 0xFF9D97, 0xFF701F, 0xFFB21D, 0xCFD231, 0x48F90A, 0x92CC17, 0x3DDB86, 0x1A9334,
    0x00D4BB, 0x2C99A8, 0x00C2FF, 0x344593, 0x6473FF, 0x0018EC, 0x8438FF, 0x520085, 0xCB38FF,
    0xFF95C8, 0xFF37C7,
];

/// Per-class box colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette;

impl Palette {
    /// Color for a class id; ids wrap around the palette.
    pub fn color(&self, class_id: usize) -> Rgb<u8> {
        let hex = PALETTE_HEX[class_id % PALETTE_HEX.len()];
        Rgb([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
    }

    /// Black or white, whichever reads better on `background`.
    pub fn text_color(background: Rgb<u8>) -> Rgb<u8> {
        let [r, g, b] = background.0;
        let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luminance > 160.0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    }
}

/// Load a system font for label rendering.
pub fn load_system_font() -> Option<FontVec> {
    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in &font_paths {
        if let Ok(font_data) = std::fs::read(path)
            && let Ok(font) = FontVec::try_from_vec(font_data)
        {
            debug!("Loaded font from {}", path);
            return Some(font);
        }
    }

    debug!("No system font found, labels will be skipped");
    None
}

/// Styling of annotated images.
pub struct AnnotateConfig {
    pub palette: Palette,
    /// Line thickness; scaled from the image size when `None`.
    pub line_width: Option<u32>,
    pub font: Option<FontVec>,
    pub font_size: f32,
    pub show_labels: bool,
    pub show_conf: bool,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            palette: Palette,
            line_width: None,
            font: None,
            font_size: 18.0,
            show_labels: true,
            show_conf: true,
        }
    }
}

impl AnnotateConfig {
    /// Default styling with a system font, if one can be found.
    pub fn with_system_font() -> Self {
        Self {
            font: load_system_font(),
            ..Self::default()
        }
    }

    pub fn with_font_path(mut self, font_path: &Path) -> DetectResult<Self> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|e| {
            DetectError::visualization(
                &format!("Failed to parse font file: {}", font_path.display()),
                e,
            )
        })?;
        self.font = Some(font);
        Ok(self)
    }

    fn effective_line_width(&self, img: &RgbImage) -> u32 {
        self.line_width.unwrap_or_else(|| {
            let (w, h) = img.dimensions();
            (((w + h) as f32 / 2.0 * 0.003).round() as u32).max(2)
        })
    }
}

/// Draws `result`'s detections onto a copy of `img`.
pub fn annotate(img: &RgbImage, result: &DetectionResult, config: &AnnotateConfig) -> RgbImage {
    let mut output = img.clone();
    let (img_w, img_h) = output.dimensions();
    if img_w == 0 || img_h == 0 {
        return output;
    }
    let thickness = config.effective_line_width(&output);
    let scale = PxScale::from(config.font_size);

    for det in &result.detections {
        let color = config.palette.color(det.class_id);
        let x1 = det.bbox.x1.floor().max(0.0) as i32;
        let y1 = det.bbox.y1.floor().max(0.0) as i32;
        let x2 = (det.bbox.x2.ceil() as i32).min(img_w as i32 - 1);
        let y2 = (det.bbox.y2.ceil() as i32).min(img_h as i32 - 1);
        if x2 <= x1 || y2 <= y1 {
            continue;
        }

        for t in 0..thickness as i32 {
            let w = x2 - x1 - 2 * t;
            let h = y2 - y1 - 2 * t;
            if w <= 0 || h <= 0 {
                break;
            }
            draw_hollow_rect_mut(
                &mut output,
                Rect::at(x1 + t, y1 + t).of_size(w as u32, h as u32),
                color,
            );
        }

        if !config.show_labels {
            continue;
        }
        let Some(font) = &config.font else {
            continue;
        };

        let label = if config.show_conf {
            format!("{} {:.2}", det.class_name, det.confidence)
        } else {
            det.class_name.clone()
        };
        let (text_w, text_h) = text_size(scale, font, &label);
        let tag_w = text_w + 4;
        let tag_h = text_h + 4;
        // Above the box when there is room, otherwise just inside it.
        let tag_y = if y1 >= tag_h as i32 { y1 - tag_h as i32 } else { y1 };
        let tag_x = x1.min((img_w as i32 - tag_w as i32).max(0));

        draw_filled_rect_mut(
            &mut output,
            Rect::at(tag_x, tag_y).of_size(tag_w, tag_h),
            color,
        );
        draw_text_mut(
            &mut output,
            Palette::text_color(color),
            tag_x + 2,
            tag_y + 2,
            scale,
            font,
            &label,
        );
    }

    output
}

/// Save an RGB image, creating parent directories as needed.
pub fn save_rgb_image(img: &RgbImage, output_path: &Path) -> DetectResult<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    img.save(output_path).map_err(|e| {
        DetectError::visualization(
            &format!("Failed to save image to {}", output_path.display()),
            e,
        )
    })
}

/// Opens `img` in the platform's default image viewer.
///
/// The image is written to a temporary PNG that is left in place so the viewer
/// can still read it after this process exits. Returns the file's path.
pub fn show_image(img: &RgbImage) -> DetectResult<PathBuf> {
    let tmp = tempfile::Builder::new()
        .prefix("yolo-world-")
        .suffix(".png")
        .tempfile()?;
    let path = tmp
        .into_temp_path()
        .keep()
        .map_err(|e| DetectError::visualization("Failed to keep temporary image", e))?;
    save_rgb_image(img, &path)?;

    info!("Opening {} in the default image viewer", path.display());
    open::that(&path)
        .map_err(|e| DetectError::visualization("Failed to launch an image viewer", e))?;
    Ok(path)
}

impl DetectionResult {
    fn source_image(&self) -> DetectResult<&RgbImage> {
        self.orig_img.as_ref().ok_or_else(|| {
            DetectError::invalid_input("result does not carry its source image; nothing to draw")
        })
    }

    /// Returns the source image with detections drawn on it.
    pub fn plot(&self, config: &AnnotateConfig) -> DetectResult<RgbImage> {
        Ok(annotate(self.source_image()?, self, config))
    }

    /// Writes the annotated image to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> DetectResult<()> {
        let annotated = self.plot(&AnnotateConfig::with_system_font())?;
        save_rgb_image(&annotated, path.as_ref())
    }

    /// Displays the annotated image in the platform image viewer.
    pub fn show(&self) -> DetectResult<PathBuf> {
        let annotated = self.plot(&AnnotateConfig::with_system_font())?;
        show_image(&annotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::{BoundingBox, Candidate};

    fn result_with_box(bbox: BoundingBox) -> DetectionResult {
        DetectionResult::from_candidates(
            vec![Candidate {
                bbox,
                score: 0.87,
                class_id: 1,
            }],
            &["soup".to_string(), "pasta".to_string()],
            (100, 80),
        )
    }

    #[test]
    fn test_palette_wraps_and_parses_hex() {
        let palette = Palette;
        assert_eq!(palette.color(0), Rgb([0xFF, 0x38, 0x38]));
        assert_eq!(palette.color(20), palette.color(0));
        assert_eq!(Palette::text_color(Rgb([255, 255, 255])), Rgb([0, 0, 0]));
        assert_eq!(Palette::text_color(Rgb([0, 0, 0])), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_annotate_draws_box_outline() {
        let img = RgbImage::from_pixel(100, 80, Rgb([0, 0, 0]));
        let result = result_with_box(BoundingBox::new(10.0, 10.0, 50.0, 40.0));
        let config = AnnotateConfig {
            line_width: Some(1),
            ..AnnotateConfig::default()
        };
        let out = annotate(&img, &result, &config);

        let color = Palette.color(1);
        assert_eq!(out.get_pixel(10, 20), &color);
        assert_eq!(out.get_pixel(30, 10), &color);
        assert_eq!(out.get_pixel(30, 25), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(10, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_skips_degenerate_boxes() {
        let img = RgbImage::new(100, 80);
        let result = result_with_box(BoundingBox::new(50.0, 50.0, 50.0, 50.0));
        let out = annotate(&img, &result, &AnnotateConfig::default());
        assert_eq!(out, img);
    }

    #[test]
    fn test_plot_requires_source_image() {
        let result = result_with_box(BoundingBox::new(10.0, 10.0, 50.0, 40.0));
        assert!(result.plot(&AnnotateConfig::default()).is_err());

        let with_image = result.with_image(RgbImage::new(100, 80));
        assert!(with_image.plot(&AnnotateConfig::default()).is_ok());
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let result = result_with_box(BoundingBox::new(10.0, 10.0, 50.0, 40.0))
            .with_image(RgbImage::new(100, 80));
        result.save(&path).unwrap();
        assert!(path.is_file());
    }
}
