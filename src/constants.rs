pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 500;

pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Largest side libwebp can encode.
pub const MAX_OUTPUT_DIMENSION: u32 = 16383;

/// Decoded inputs beyond this size on either side are refused.
pub const MAX_IMAGE_DIMENSION: u32 = 20_000;

/// 100 MiB
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

pub const ARCHIVE_NAME: &str = "processed_images.zip";
pub const OUTPUT_EXTENSION: &str = "webp";
pub const WEBP_MIME: &str = "image/webp";
pub const ZIP_MIME: &str = "application/zip";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const ERROR_PREFIX: &str = "❌";
pub const ARCHIVE_PREFIX: &str = "📦";
pub const DOWNLOAD_PREFIX: &str = "📥";
