//! PNG encoding and file output
//!
//! Converts captured pixels into PNG bytes and writes them to the resolved
//! [`OutputTarget`]. Encoding always finishes in memory before the file is
//! created, so a failed encode never leaves a partial file behind.
//!
//! # Examples
//!
//! ```
//! use image::RgbaImage;
//! use window_shot_core::util::encode::encode_png;
//!
//! let img = RgbaImage::from_pixel(64, 32, image::Rgba([0, 128, 255, 255]));
//! let png_bytes = encode_png(&img).unwrap();
//! assert!(png_bytes.starts_with(&[0x89, b'P', b'N', b'G']));
//! ```

use std::{fs, io::Cursor};

use image::{
    ExtendedColorType, ImageEncoder, ImageResult, RgbaImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    error::{CaptureError, CaptureResult},
    model::OutputTarget,
};

/// Encodes an image as PNG with default compression
///
/// Uses adaptive filtering and keeps the alpha channel.
pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    encode_png_with_compression(image, CompressionType::Default)
}

/// Encodes an image as PNG with the given compression level
///
/// Higher compression levels produce smaller files but take longer to
/// encode.
pub fn encode_png_with_compression(
    image: &RgbaImage,
    compression: CompressionType,
) -> ImageResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let (width, height) = image.dimensions();
    encoder.write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)?;

    Ok(output)
}

/// Encodes `image` and writes it to `target`, creating parent directories
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - [`CaptureError::EncodeFailed`] if encoding fails, a parent directory
///   cannot be created, or the file cannot be written
pub fn write_png(image: &RgbaImage, target: &OutputTarget) -> CaptureResult<u64> {
    let path = target.path();
    let fail = |reason: String| CaptureError::EncodeFailed {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = encode_png(image).map_err(|e| fail(e.to_string()))?;

    if let Some(dir) = target.directory() {
        fs::create_dir_all(dir)
            .map_err(|e| fail(format!("cannot create {}: {e}", dir.display())))?;
    }

    fs::write(path, &bytes).map_err(|e| fail(e.to_string()))?;

    tracing::debug!("Wrote {} bytes of PNG to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use tempfile::TempDir;

    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0x80, if x % 2 == 0 { 0xFF } else { 0x40 }])
        })
    }

    #[test]
    fn test_encode_png_default() {
        let img = gradient(100, 100);
        let png = encode_png(&img).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]));
    }

    #[test]
    fn test_encode_png_lossless_with_alpha() {
        let img = gradient(37, 19);
        let png = encode_png(&img).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (37, 19));
        assert_eq!(decoded.as_raw(), img.as_raw());
    }

    #[test]
    fn test_encode_png_compression_levels() {
        let img = gradient(256, 256);
        let fast = encode_png_with_compression(&img, CompressionType::Fast).unwrap();
        let best = encode_png_with_compression(&img, CompressionType::Best).unwrap();
        assert!(best.len() <= fast.len());
    }

    #[test]
    fn test_write_png_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let target = OutputTarget::explicit(temp.path().join("a/b/c/shot.png"));

        let written = write_png(&gradient(8, 8), &target).unwrap();

        let metadata = fs::metadata(target.path()).unwrap();
        assert_eq!(metadata.len(), written);
    }

    #[test]
    fn test_write_png_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let target = OutputTarget::explicit(temp.path().join("shot.png"));
        fs::write(target.path(), b"stale").unwrap();

        write_png(&gradient(4, 4), &target).unwrap();

        let decoded = image::open(target.path()).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_write_png_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let target = OutputTarget::explicit(blocker.join("shot.png"));

        let err = write_png(&gradient(4, 4), &target).unwrap_err();
        assert!(matches!(err, CaptureError::EncodeFailed { .. }));
        assert!(!target.path().exists());
    }
}
