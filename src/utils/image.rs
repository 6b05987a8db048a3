//! Image loading helpers.

use crate::core::errors::{DetectError, DetectResult};
use image::{DynamicImage, ImageError, ImageReader, RgbImage};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads an image as RGB.
///
/// The `image` crate picks its decoder from the file extension, which fails
/// when JPEG bytes are stored under a `.png` name (or vice versa). On decode
/// errors the file is read again with format sniffing.
pub fn load_image(path: &Path) -> DetectResult<RgbImage> {
    if !path.is_file() {
        return Err(DetectError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("image file not found: {}", path.display()),
        )));
    }
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) if should_retry(&err) => {
            tracing::warn!(
                "Standard decode failed for {} ({err}). Retrying with format sniffing.",
                path.display()
            );
            decode_with_guessed_format(path)?
        }
        Err(err) => return Err(DetectError::ImageLoad(err)),
    };
    Ok(img.to_rgb8())
}

/// Loads several images in parallel, preserving input order.
pub fn load_images<P: AsRef<Path> + Sync>(paths: &[P]) -> DetectResult<Vec<RgbImage>> {
    paths
        .par_iter()
        .map(|p| load_image(p.as_ref()))
        .collect()
}

fn should_retry(err: &ImageError) -> bool {
    matches!(err, ImageError::Decoding(_) | ImageError::Unsupported(_))
}

fn decode_with_guessed_format(path: &Path) -> DetectResult<DynamicImage> {
    let file = File::open(path)?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    Ok(reader.decode()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    #[test]
    fn test_load_image_with_mismatched_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image(Path::new("does/not/exist.jpg")).unwrap_err();
        assert!(matches!(err, DetectError::Io(_)));
    }

    #[test]
    fn test_load_images_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (1..=3u32)
            .map(|i| {
                let path = dir.path().join(format!("{i}.png"));
                RgbImage::new(i, i).save(&path).unwrap();
                path
            })
            .collect();

        let images = load_images(&paths).unwrap();
        let sizes: Vec<_> = images.iter().map(|img| img.width()).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
    }
}
