use crate::batch::{ProcessedFile, Session};
use crate::constants::{ARCHIVE_NAME, WEBP_MIME, ZIP_MIME};
use crate::error::Result;
use crate::settings::{OutputMode, Settings};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// What a finished run offers for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Package {
    /// Bulk mode: every result zipped together, plus the results themselves.
    Archive {
        name: String,
        bytes: Vec<u8>,
        files: Vec<ProcessedFile>,
    },
    /// Single mode: the one result, as is.
    Single(ProcessedFile),
}

impl Package {
    /// Packages `results` for `mode`.
    ///
    /// Returns `Ok(None)` when there is nothing to offer, in either mode.
    pub fn from_results(results: &[ProcessedFile], mode: OutputMode) -> Result<Option<Self>> {
        let Some(first) = results.first() else {
            return Ok(None);
        };

        let package = match mode {
            OutputMode::Bulk => Package::Archive {
                name: ARCHIVE_NAME.to_string(),
                bytes: build_archive(results)?,
                files: results.to_vec(),
            },
            OutputMode::Single => Package::Single(first.clone()),
        };

        Ok(Some(package))
    }

    pub fn file_name(&self) -> &str {
        match self {
            Package::Archive { name, .. } => name,
            Package::Single(file) => &file.name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Package::Archive { bytes, .. } => bytes,
            Package::Single(file) => &file.bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Package::Archive { .. } => ZIP_MIME,
            Package::Single(_) => WEBP_MIME,
        }
    }

    /// The files offered for individual download.
    pub fn files(&self) -> &[ProcessedFile] {
        match self {
            Package::Archive { files, .. } => files,
            Package::Single(file) => std::slice::from_ref(file),
        }
    }

    /// Writes the download into `dir`, creating it if needed.
    ///
    /// For an archive, `include_individual` also writes each result next to
    /// it. Returns the written paths in write order.
    pub fn write_to(&self, dir: &Path, include_individual: bool) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        let main_path = dir.join(self.file_name());
        fs::write(&main_path, self.bytes())?;
        written.push(main_path);

        if let Package::Archive { files, .. } = self {
            if include_individual {
                for file in files {
                    let path = dir.join(&file.name);
                    fs::write(&path, &file.bytes)?;
                    written.push(path);
                }
            }
        }

        Ok(written)
    }
}

impl Session {
    /// Packages the latest results according to the run's mode.
    pub fn package(&self, settings: &Settings) -> Result<Option<Package>> {
        Package::from_results(self.results(), settings.mode)
    }
}

/// Zips `files` in memory, stored without recompression.
///
/// Entries share one flat namespace. When two files carry the same name the
/// later bytes win and the entry keeps the position of the first one.
pub fn build_archive(files: &[ProcessedFile]) -> Result<Vec<u8>> {
    let mut entries: Vec<(&str, &[u8])> = Vec::with_capacity(files.len());
    for file in files {
        match entries.iter_mut().find(|(name, _)| *name == file.name) {
            Some(entry) => entry.1 = file.bytes.as_slice(),
            None => entries.push((file.name.as_str(), file.bytes.as_slice())),
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
