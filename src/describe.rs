// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! The description capability and image preparation

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::Result;

/// Something that can describe an image in words
///
/// Implementations are built once by the caller and handed to the batch
/// runner. Output is free-form text and need not be deterministic.
#[async_trait]
pub trait Describer: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// Describe `image` following the instruction in `prompt`
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String>;
}

/// Read an image and shrink it for upload when it is larger than `max_dimension`
///
/// Oversized images are resized (longest side = `max_dimension`) and sent
/// as JPEG. Data that cannot be decoded, and everything when `max_dimension`
/// is 0, is sent unchanged.
pub fn prepare_image(path: &Path, max_dimension: u32) -> Result<Vec<u8>> {
    let data = std::fs::read(path)?;

    if max_dimension == 0 {
        return Ok(data);
    }

    let img = match image::load_from_memory(&data) {
        Ok(img) => img,
        Err(e) => {
            debug!("Sending raw bytes for {:?}, decode failed: {}", path, e);
            return Ok(data);
        }
    };

    if img.width() <= max_dimension && img.height() <= max_dimension {
        return Ok(data);
    }

    let resized = img.resize(max_dimension, max_dimension, image::imageops::FilterType::Triangle);
    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    rgb.write_to(&mut cursor, image::ImageFormat::Jpeg)?;

    debug!(
        "Resized {:?} from {}x{} to {}x{}",
        path,
        img.width(),
        img.height(),
        rgb.width(),
        rgb.height()
    );

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 128]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_undecodable_bytes_pass_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not really an image").unwrap();

        assert_eq!(prepare_image(&path, 1024).unwrap(), b"not really an image");
    }

    #[test]
    fn test_small_image_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.png");
        write_png(&path, 16, 8);

        let original = std::fs::read(&path).unwrap();
        assert_eq!(prepare_image(&path, 64).unwrap(), original);
    }

    #[test]
    fn test_large_image_downscaled_to_jpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.png");
        write_png(&path, 200, 100);

        let bytes = prepare_image(&path, 50).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (50, 25));
    }

    #[test]
    fn test_zero_dimension_sends_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.png");
        write_png(&path, 200, 100);

        let original = std::fs::read(&path).unwrap();
        assert_eq!(prepare_image(&path, 0).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(prepare_image(&dir.path().join("nope.png"), 64).is_err());
    }
}
