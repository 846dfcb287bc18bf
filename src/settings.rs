use crate::constants::{
    DEFAULT_HEIGHT, DEFAULT_QUALITY, DEFAULT_WIDTH, MAX_OUTPUT_DIMENSION, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{ResizeError, Result};

/// How results are handed back once a run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Any number of uploads; one archive plus the individual files.
    Bulk,
    /// Exactly one upload; the result is offered directly.
    Single,
}

impl OutputMode {
    pub fn is_bulk(self) -> bool {
        self == OutputMode::Bulk
    }
}

/// Per-run settings. Built once, validated, then passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub mode: OutputMode,
}

impl Settings {
    pub fn new(
        width: Option<u32>,
        height: Option<u32>,
        quality: Option<u8>,
        mode: OutputMode,
    ) -> Result<Self> {
        let width = width.unwrap_or(DEFAULT_WIDTH);
        let height = height.unwrap_or(DEFAULT_HEIGHT);
        let quality = quality.unwrap_or(DEFAULT_QUALITY);

        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(ResizeError::InvalidQuality(quality));
        }

        let valid = 1..=MAX_OUTPUT_DIMENSION;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(ResizeError::InvalidDimensions(
                width,
                height,
                MAX_OUTPUT_DIMENSION,
            ));
        }

        Ok(Self {
            width,
            height,
            quality,
            mode,
        })
    }

    /// `<width>x<height>`, as used in output names.
    pub fn dimensions_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quality: DEFAULT_QUALITY,
            mode: OutputMode::Bulk,
        }
    }
}
