//! Accepted input formats
//!
//! Uploads are filtered by extension against this allow-list. Decoding itself
//! sniffs the content, so a mislabelled file is still decoded by what it is.

use image::ImageFormat;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Png,
    Jpeg,
    WebP,
}

impl InputFormat {
    /// Matches a bare extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" => Some(InputFormat::Png),
            "jpg" | "jpeg" => Some(InputFormat::Jpeg),
            "webp" => Some(InputFormat::WebP),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            InputFormat::Png => ImageFormat::Png,
            InputFormat::Jpeg => ImageFormat::Jpeg,
            InputFormat::WebP => ImageFormat::WebP,
        }
    }

    pub fn all() -> [InputFormat; 3] {
        [InputFormat::Png, InputFormat::Jpeg, InputFormat::WebP]
    }

    pub fn extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "webp"]
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Png => "PNG",
            InputFormat::Jpeg => "JPEG",
            InputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// Check if a path carries one of the accepted image extensions
pub fn is_accepted_image(path: &Path) -> bool {
    InputFormat::from_path(path).is_some()
}
