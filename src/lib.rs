pub mod logger;

pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod package;
pub mod settings;
pub mod transform;
pub mod upload;
pub mod utils;

pub use batch::{
    process_upload, run_batch, run_loaded, BatchReport, ItemOutcome, ProcessedFile, Session,
    SessionState,
};
pub use error::{ResizeError, Result};
pub use formats::{is_accepted_image, InputFormat};
pub use package::{build_archive, Package};
pub use settings::{OutputMode, Settings};
pub use transform::{decode_image, encode_webp, output_name, resize_image, transform_image};
pub use upload::{collect_image_files, load_uploads, LoadedUpload, UploadFailure, UploadedImage};
