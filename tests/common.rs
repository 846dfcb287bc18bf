#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn rgb_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x ^ y) % 256) as u8])
    }))
}

pub fn rgba_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, ((x + y) % 256) as u8])
    }))
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&rgb_image(width, height), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&rgba_image(width, height), ImageFormat::Png)
}

/// Writes three real JPEGs and one corrupt `.jpg` into `dir`.
pub fn create_mixed_batch(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for (name, (w, h)) in [("alpha.jpg", (64, 48)), ("beta.jpg", (40, 80)), ("gamma.jpg", (32, 32))] {
        let path = dir.join(name);
        fs::write(&path, jpeg_bytes(w, h)).unwrap();
        files.push(path);
    }

    let corrupt = dir.join("corrupt.jpg");
    fs::write(&corrupt, b"\xFF\xD8\xFF this is not a jpeg").unwrap();
    files.push(corrupt);

    files
}

pub fn create_test_output_directory(temp_dir: &Path) -> PathBuf {
    let output_dir = temp_dir.join("output");
    fs::create_dir(&output_dir).unwrap();
    output_dir
}
