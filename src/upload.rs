use crate::constants::MAX_FILE_SIZE;
use crate::error::{ResizeError, Result};
use crate::formats::{is_accepted_image, InputFormat};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An input that could not be read. It still takes part in the run as a failed item.
#[derive(Debug)]
pub struct UploadFailure {
    pub name: String,
    pub error: ResizeError,
}

/// A read attempt for one input, kept in input order.
pub type LoadedUpload = std::result::Result<UploadedImage, UploadFailure>;

/// One image handed to a run: its original file name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, keeping only its final path component as the name.
    ///
    /// # Returns
    /// * `Err(ResizeError::FileNotFound)` if the path does not exist or is not a file
    /// * `Err(ResizeError::FileTooLarge)` if the file exceeds `MAX_FILE_SIZE`
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ResizeError::FileNotFound(path.to_path_buf()));
        }

        // Check size before reading so huge files never hit memory
        let size = fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE {
            return Err(ResizeError::FileTooLarge(size, MAX_FILE_SIZE));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ResizeError::FileNotFound(path.to_path_buf()))?;

        Ok(Self::new(name, fs::read(path)?))
    }

    /// Format implied by the name's extension, if it is on the allow-list.
    pub fn declared_format(&self) -> Option<InputFormat> {
        InputFormat::from_path(Path::new(&self.name))
    }
}

/// Expands CLI inputs into an ordered, de-duplicated list of image paths.
///
/// Each input is a file, a directory, or a glob pattern. Files named
/// explicitly must carry an accepted extension; directory and glob matches
/// that don't are skipped. Hidden entries are skipped while walking.
pub fn collect_image_files(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files: Vec<PathBuf> = Vec::new();

    for input in inputs {
        for path in expand_input(input, recursive)? {
            if !image_files.contains(&path) {
                image_files.push(path);
            }
        }
    }

    Ok(image_files)
}

fn expand_input(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let input_path = Path::new(input);

    if input_path.is_file() {
        if !is_accepted_image(input_path) {
            let accepted: Vec<String> = InputFormat::all().iter().map(|f| f.to_string()).collect();
            return Err(ResizeError::UnsupportedFormat(format!(
                "{} (accepted: {} as .{})",
                input,
                accepted.join(", "),
                InputFormat::extensions().join(", .")
            )));
        }
        return Ok(vec![input_path.to_path_buf()]);
    }

    let mut found = Vec::new();

    if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        let entries = walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_accepted_image(path) {
                found.push(path.to_path_buf());
            }
        }
        return Ok(found);
    }

    let pattern = glob(input).map_err(|_| ResizeError::NoImageFilesFound(input.to_string()))?;
    for entry in pattern.flatten() {
        if entry.is_file() && is_accepted_image(&entry) {
            found.push(entry);
        }
    }

    Ok(found)
}

/// Reads every path into memory, in order.
///
/// A file that cannot be read or is too large becomes an `UploadFailure`
/// instead of stopping the others.
pub fn load_uploads(paths: &[PathBuf]) -> Vec<LoadedUpload> {
    paths
        .iter()
        .map(|path| {
            UploadedImage::from_path(path).map_err(|error| UploadFailure {
                name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                error,
            })
        })
        .collect()
}
