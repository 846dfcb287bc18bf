use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::{ResizeError, Result};
use crate::formats::InputFormat;
use crate::settings::Settings;
use crate::transform::{decode_image, encode_webp, output_name, resize_image};
use crate::upload::{LoadedUpload, UploadedImage};
use crate::utils::format_file_size;
use crate::{error, success, verbose};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// A converted image, ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What happened to one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Processed(ProcessedFile),
    Failed { name: String, error: String },
}

impl ItemOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ItemOutcome::Processed(_))
    }
}

/// Names of what succeeded and what failed in one run, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Runs the transform over one upload. Any error stays local to this item.
pub fn process_upload(upload: &UploadedImage, settings: &Settings) -> Result<ProcessedFile> {
    let (img, detected) = decode_image(&upload.bytes)?;
    verbose!(
        "{}: {} decoded as {:?}, {}x{}",
        upload.name,
        format_file_size(upload.bytes.len() as u64),
        detected,
        img.width(),
        img.height()
    );

    let declared = upload.declared_format().map(InputFormat::to_image_format);
    if detected.is_some() && declared.is_some() && detected != declared {
        verbose!(
            "{}: extension says {:?} but content is {:?}",
            upload.name,
            declared,
            detected
        );
    }

    let resized = resize_image(&img, settings);
    let bytes = encode_webp(&resized, settings.quality)?;
    let name = output_name(&upload.name, settings.width, settings.height);
    verbose!("{} -> {} ({})", upload.name, name, format_file_size(bytes.len() as u64));

    Ok(ProcessedFile { name, bytes })
}

/// Converts every upload in order. A failing item is reported and skipped;
/// the rest of the batch still runs.
pub fn run_batch(uploads: &[UploadedImage], settings: &Settings) -> Vec<ItemOutcome> {
    run_items(uploads, |upload| {
        let result = process_upload(upload, settings).map_err(|e| e.to_string());
        (upload.name.clone(), result)
    })
}

/// Like `run_batch`, but inputs that could not be read count as failed items
/// in their original position.
pub fn run_loaded(loaded: &[LoadedUpload], settings: &Settings) -> Vec<ItemOutcome> {
    run_items(loaded, |item| match item {
        Ok(upload) => {
            let result = process_upload(upload, settings).map_err(|e| e.to_string());
            (upload.name.clone(), result)
        }
        Err(failure) => (failure.name.clone(), Err(failure.error.to_string())),
    })
}

fn run_items<T>(
    items: &[T],
    attempt: impl Fn(&T) -> (String, std::result::Result<ProcessedFile, String>),
) -> Vec<ItemOutcome> {
    let progress = if crate::logger::is_quiet() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(items.len() as u64)
    };
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE) {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress.set_message("Processing images...");

    let outcomes = items
        .iter()
        .map(|item| {
            let (name, result) = attempt(item);
            let outcome = match result {
                Ok(file) => {
                    progress.suspend(|| {
                        success!("{} processed", name);
                    });
                    ItemOutcome::Processed(file)
                }
                Err(error) => {
                    progress.suspend(|| {
                        error!("Failed to process {}: {}", name, error);
                    });
                    ItemOutcome::Failed { name, error }
                }
            };
            progress.inc(1);
            outcome
        })
        .collect();

    progress.finish_with_message("Processing complete!");
    outcomes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Processing,
    Ready,
}

/// Results of the latest run, owned by whoever drives the runs.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    results: Vec<ProcessedFile>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            results: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn results(&self) -> &[ProcessedFile] {
        &self.results
    }

    /// Starts a new run over `uploads`.
    ///
    /// With no uploads nothing happens: the state and previous results stay.
    /// Otherwise the previous results are dropped before processing starts.
    ///
    /// # Returns
    /// * `Err(ResizeError::TooManyUploads)` in single mode with more than one upload
    pub fn submit(&mut self, uploads: &[UploadedImage], settings: &Settings) -> Result<BatchReport> {
        self.start_run(uploads.len(), settings, || run_batch(uploads, settings))
    }

    /// Same as `submit`, for inputs read from disk where some reads may have failed.
    pub fn submit_loaded(
        &mut self,
        loaded: &[LoadedUpload],
        settings: &Settings,
    ) -> Result<BatchReport> {
        self.start_run(loaded.len(), settings, || run_loaded(loaded, settings))
    }

    fn start_run(
        &mut self,
        count: usize,
        settings: &Settings,
        run: impl FnOnce() -> Vec<ItemOutcome>,
    ) -> Result<BatchReport> {
        if count == 0 {
            return Ok(BatchReport::default());
        }
        if !settings.mode.is_bulk() && count > 1 {
            return Err(ResizeError::TooManyUploads(count));
        }

        let start_time = Instant::now();
        self.results.clear();
        self.state = SessionState::Processing;

        let mut report = BatchReport::default();
        for outcome in run() {
            match outcome {
                ItemOutcome::Processed(file) => {
                    report.processed.push(file.name.clone());
                    self.results.push(file);
                }
                ItemOutcome::Failed { name, error } => report.failed.push((name, error)),
            }
        }

        self.state = SessionState::Ready;
        verbose!(
            "Run finished in {:.2?}: {} processed, {} failed",
            start_time.elapsed(),
            report.processed.len(),
            report.failed.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_FILE_SIZE;
    use crate::settings::OutputMode;
    use crate::upload::UploadFailure;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([x as u8, y as u8, 128])
        }));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    fn bulk(width: u32, height: u32) -> Settings {
        Settings::new(Some(width), Some(height), Some(80), OutputMode::Bulk).unwrap()
    }

    #[test]
    fn test_run_batch_keeps_order_and_isolates_failures() {
        let uploads = vec![
            UploadedImage::new("first.jpg", jpeg(20, 20)),
            UploadedImage::new("broken.jpg", b"garbage".to_vec()),
            UploadedImage::new("second.png", jpeg(30, 10)),
        ];

        let outcomes = run_batch(&uploads, &bulk(8, 8));

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0], ItemOutcome::Processed(f) if f.name == "first_8x8.webp"));
        assert!(matches!(&outcomes[1], ItemOutcome::Failed { name, .. } if name == "broken.jpg"));
        assert!(matches!(&outcomes[2], ItemOutcome::Processed(f) if f.name == "second_8x8.webp"));
    }

    #[test]
    fn test_failure_carries_error_message() {
        let uploads = vec![UploadedImage::new("empty.png", Vec::new())];

        let outcomes = run_batch(&uploads, &bulk(8, 8));

        match &outcomes[0] {
            ItemOutcome::Failed { error, .. } => assert!(!error.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_session_starts_idle() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_session_submit_without_uploads_is_a_no_op() {
        let mut session = Session::new();
        let report = session.submit(&[], &bulk(8, 8)).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_session_scenario_three_valid_one_corrupt() {
        let mut session = Session::new();
        let uploads = vec![
            UploadedImage::new("a.jpg", jpeg(64, 48)),
            UploadedImage::new("b.jpg", jpeg(48, 64)),
            UploadedImage::new("corrupt.jpg", b"\xFF\xD8 truncated".to_vec()),
            UploadedImage::new("c.jpg", jpeg(32, 32)),
        ];

        let report = session.submit(&uploads, &bulk(500, 500)).unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            report.processed,
            vec!["a_500x500.webp", "b_500x500.webp", "c_500x500.webp"]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "corrupt.jpg");
        assert!(report.has_failures());

        let names: Vec<_> = session.results().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a_500x500.webp", "b_500x500.webp", "c_500x500.webp"]);
    }

    #[test]
    fn test_session_new_run_clears_previous_results() {
        let mut session = Session::new();
        session
            .submit(&[UploadedImage::new("old.jpg", jpeg(10, 10))], &bulk(4, 4))
            .unwrap();
        assert_eq!(session.results().len(), 1);

        let report = session
            .submit(&[UploadedImage::new("bad.jpg", b"nope".to_vec())], &bulk(4, 4))
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(session.results().is_empty());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_session_single_mode_rejects_multiple_uploads() {
        let mut session = Session::new();
        let settings = Settings::new(Some(4), Some(4), None, OutputMode::Single).unwrap();
        let uploads = vec![
            UploadedImage::new("a.jpg", jpeg(10, 10)),
            UploadedImage::new("b.jpg", jpeg(10, 10)),
        ];

        let result = session.submit(&uploads, &settings);

        assert!(matches!(result, Err(ResizeError::TooManyUploads(2))));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_run_loaded_records_read_failures_in_place() {
        let loaded = vec![
            Ok(UploadedImage::new("first.jpg", jpeg(20, 20))),
            Err(UploadFailure {
                name: "huge.png".to_string(),
                error: ResizeError::FileTooLarge(MAX_FILE_SIZE + 1, MAX_FILE_SIZE),
            }),
            Ok(UploadedImage::new("second.jpg", jpeg(10, 30))),
        ];

        let outcomes = run_loaded(&loaded, &bulk(8, 8));

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_processed());
        match &outcomes[1] {
            ItemOutcome::Failed { name, error } => {
                assert_eq!(name, "huge.png");
                assert!(error.contains("too large"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(matches!(&outcomes[2], ItemOutcome::Processed(f) if f.name == "second_8x8.webp"));
    }

    #[test]
    fn test_session_submit_loaded_keeps_valid_items() {
        let mut session = Session::new();
        let loaded = vec![
            Err(UploadFailure {
                name: "huge.png".to_string(),
                error: ResizeError::FileTooLarge(MAX_FILE_SIZE + 1, MAX_FILE_SIZE),
            }),
            Ok(UploadedImage::new("a.jpg", jpeg(16, 16))),
            Ok(UploadedImage::new("b.jpg", jpeg(16, 16))),
        ];

        let report = session.submit_loaded(&loaded, &bulk(500, 500)).unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(report.processed, vec!["a_500x500.webp", "b_500x500.webp"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "huge.png");
        assert_eq!(session.results().len(), 2);
    }
}
