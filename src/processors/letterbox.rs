//! Letterbox resizing and tensor conversion.
//!
//! The detector expects a fixed square input. Images are scaled to fit while
//! keeping their aspect ratio and the remainder is padded with a constant grey,
//! the same transform used when the model was trained.

use crate::core::errors::{DetectError, DetectResult};
use crate::core::tensor::Tensor4D;
use image::{Rgb, RgbImage, imageops};

/// Grey used for padding.
pub const PAD_VALUE: u8 = 114;

/// Geometry of one letterbox transform, needed to map boxes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale applied to the original image.
    pub ratio: f32,
    /// Padding added on the left and top, in letterboxed pixels.
    pub pad: (f32, f32),
    /// Original (width, height).
    pub orig_size: (u32, u32),
}

impl LetterboxInfo {
    /// Maps a point in letterboxed coordinates back into the original image.
    pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad.0) / self.ratio, (y - self.pad.1) / self.ratio)
    }
}

/// Resize-and-pad transform to a fixed `(height, width)`.
#[derive(Debug, Clone)]
pub struct LetterBox {
    new_shape: (u32, u32),
    pad_value: u8,
    center: bool,
    scale_up: bool,
}

impl LetterBox {
    /// Creates a letterbox producing `height x width` images.
    pub fn new(height: u32, width: u32) -> Self {
        Self {
            new_shape: (height, width),
            pad_value: PAD_VALUE,
            center: true,
            scale_up: true,
        }
    }

    /// Creates a square letterbox.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Places the image in the top-left corner instead of centering it.
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Allows or forbids enlarging images smaller than the target.
    pub fn with_scale_up(mut self, scale_up: bool) -> Self {
        self.scale_up = scale_up;
        self
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.new_shape
    }

    /// Resizes and pads `img`, returning the new image and the transform applied.
    pub fn apply(&self, img: &RgbImage) -> DetectResult<(RgbImage, LetterboxInfo)> {
        let (orig_w, orig_h) = img.dimensions();
        let (target_h, target_w) = self.new_shape;
        if orig_w == 0 || orig_h == 0 {
            return Err(DetectError::invalid_input(format!(
                "cannot letterbox an empty image ({}x{})",
                orig_w, orig_h
            )));
        }
        if target_w == 0 || target_h == 0 {
            return Err(DetectError::config_error(format!(
                "letterbox target must be non-empty, got {}x{}",
                target_w, target_h
            )));
        }

        let mut ratio = (target_h as f32 / orig_h as f32).min(target_w as f32 / orig_w as f32);
        if !self.scale_up {
            ratio = ratio.min(1.0);
        }

        let new_w = ((orig_w as f32 * ratio).round() as u32).clamp(1, target_w);
        let new_h = ((orig_h as f32 * ratio).round() as u32).clamp(1, target_h);

        let (pad_left, pad_top) = if self.center {
            let dw = (target_w - new_w) as f32 / 2.0;
            let dh = (target_h - new_h) as f32 / 2.0;
            ((dw - 0.1).round().max(0.0), (dh - 0.1).round().max(0.0))
        } else {
            (0.0, 0.0)
        };

        let resized = if (new_w, new_h) == (orig_w, orig_h) {
            img.clone()
        } else {
            imageops::resize(img, new_w, new_h, imageops::FilterType::Triangle)
        };

        let fill = Rgb([self.pad_value; 3]);
        let mut canvas = RgbImage::from_pixel(target_w, target_h, fill);
        imageops::replace(&mut canvas, &resized, pad_left as i64, pad_top as i64);

        Ok((
            canvas,
            LetterboxInfo {
                ratio,
                pad: (pad_left, pad_top),
                orig_size: (orig_w, orig_h),
            },
        ))
    }
}

/// Converts an RGB image into a `[1, 3, H, W]` tensor scaled to `[0, 1]`.
pub fn to_tensor(img: &RgbImage) -> Tensor4D {
    let (w, h) = img.dimensions();
    let mut tensor = Tensor4D::zeros((1, 3, h as usize, w as usize));
    for (x, y, pixel) in img.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_landscape_image() {
        let img = RgbImage::from_pixel(640, 320, Rgb([255, 0, 0]));
        let (out, info) = LetterBox::square(640).apply(&img).unwrap();

        assert_eq!(out.dimensions(), (640, 640));
        assert_eq!(info.ratio, 1.0);
        assert_eq!(info.pad, (0.0, 160.0));
        assert_eq!(out.get_pixel(0, 0), &Rgb([PAD_VALUE; 3]));
        assert_eq!(out.get_pixel(320, 320), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_letterbox_downscales_and_inverts() {
        let img = RgbImage::new(1280, 960);
        let (out, info) = LetterBox::square(640).apply(&img).unwrap();

        assert_eq!(out.dimensions(), (640, 640));
        assert_eq!(info.ratio, 0.5);
        assert_eq!(info.pad, (0.0, 80.0));
        assert_eq!(info.orig_size, (1280, 960));

        let (x, y) = info.to_original(320.0, 320.0);
        assert_eq!((x, y), (640.0, 480.0));
    }

    #[test]
    fn test_letterbox_without_scale_up() {
        let img = RgbImage::new(100, 50);
        let (_, info) = LetterBox::square(640)
            .with_scale_up(false)
            .apply(&img)
            .unwrap();
        assert_eq!(info.ratio, 1.0);

        let (_, info) = LetterBox::square(640)
            .with_center(false)
            .apply(&img)
            .unwrap();
        assert_eq!(info.pad, (0.0, 0.0));
    }

    #[test]
    fn test_letterbox_rejects_empty_image() {
        let img = RgbImage::new(0, 10);
        assert!(LetterBox::square(640).apply(&img).is_err());
    }

    #[test]
    fn test_to_tensor_layout() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([255, 0, 51]));
        let tensor = to_tensor(&img);

        assert_eq!(tensor.shape(), &[1, 3, 1, 2]);
        assert_eq!(tensor[[0, 0, 0, 1]], 1.0);
        assert_eq!(tensor[[0, 1, 0, 1]], 0.0);
        assert!((tensor[[0, 2, 0, 1]] - 0.2).abs() < 1e-6);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
    }
}
