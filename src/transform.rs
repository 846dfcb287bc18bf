use crate::constants::{MAX_FILE_SIZE, MAX_IMAGE_DIMENSION, OUTPUT_EXTENSION};
use crate::error::{ResizeError, Result};
use crate::settings::Settings;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Resizes one encoded image to the configured dimensions and re-encodes it as WebP.
///
/// The input format is sniffed from the content, never from a file name. The
/// result always has exactly `settings.width` x `settings.height` pixels;
/// aspect ratio is not preserved.
///
/// # Arguments
/// * `bytes` - Encoded PNG, JPEG or WebP data
/// * `settings` - Target dimensions and WebP quality
///
/// # Returns
/// * `Ok(webp_bytes)` - The encoded WebP payload
/// * `Err(ResizeError)` - If the data cannot be decoded or encoded
///
/// # Example
/// ```
/// use webp_resizer::{transform_image, Settings};
///
/// let result = transform_image(b"not an image", &Settings::default());
/// assert!(result.is_err());
/// ```
pub fn transform_image(bytes: &[u8], settings: &Settings) -> Result<Vec<u8>> {
    let (img, _) = decode_image(bytes)?;
    let resized = resize_image(&img, settings);
    encode_webp(&resized, settings.quality)
}

/// Decodes image bytes, returning the image and the format it was detected as.
///
/// # Security
/// - Refuses payloads over `MAX_FILE_SIZE` before touching the decoder
/// - Refuses decoded images beyond `MAX_IMAGE_DIMENSION` on either side
pub fn decode_image(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let size = bytes.len() as u64;
    if size > MAX_FILE_SIZE {
        return Err(ResizeError::FileTooLarge(size, MAX_FILE_SIZE));
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode()?;

    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(ResizeError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    Ok((img, format))
}

pub fn resize_image(img: &DynamicImage, settings: &Settings) -> DynamicImage {
    img.resize_exact(settings.width, settings.height, FilterType::Lanczos3)
}

/// Lossy WebP at `quality`. Alpha is kept when the source has it.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();

    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, f32::from(quality))
            .map_err(|e| ResizeError::WebPEncoding(format!("{:?}", e)))?
            .to_vec()
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, f32::from(quality))
            .map_err(|e| ResizeError::WebPEncoding(format!("{:?}", e)))?
            .to_vec()
    };

    Ok(encoded)
}

/// Builds `<stem>_<width>x<height>.webp` from an uploaded file name.
///
/// Only the final path component counts. The stem is everything before the
/// last dot; a name whose only dot is its first character is kept whole.
pub fn output_name(original: &str, width: u32, height: u32) -> String {
    let file_name = Path::new(original)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| original.to_string());

    let stem = match file_name.rfind('.') {
        Some(idx) if file_name[..idx].chars().any(|c| c != '.') => &file_name[..idx],
        _ => file_name.as_str(),
    };

    format!("{}_{}x{}.{}", stem, width, height, OUTPUT_EXTENSION)
}
