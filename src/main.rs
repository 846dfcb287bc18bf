use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use webp_resizer::cli::{Args, Commands, TransformArgs};
use webp_resizer::constants::{ARCHIVE_PREFIX, DOWNLOAD_PREFIX};
use webp_resizer::utils::{create_progress_spinner, format_file_size, total_size};
use webp_resizer::{
    collect_image_files, info, load_uploads, logger, success, warn, LoadedUpload, OutputMode,
    Package, ResizeError, Session, Settings,
};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Convert { input, transform } => {
            let settings = build_settings(&transform, OutputMode::Single)?;
            if !input.is_file() {
                return Err(ResizeError::FileNotFound(input).into());
            }
            let inputs = [input.to_string_lossy().into_owned()];
            let paths = collect_image_files(&inputs, false)?;
            run(&load_uploads(&paths), &settings, &transform.output, false)?;
        }
        Commands::Batch {
            inputs,
            transform,
            recursive,
            individual,
        } => {
            let settings = build_settings(&transform, OutputMode::Bulk)?;

            let spinner = create_progress_spinner("Collecting images...");
            let collected = collect_image_files(&inputs, recursive);
            spinner.finish_and_clear();
            let uploads = load_uploads(&collected?);

            if uploads.is_empty() {
                warn!("No image files found in the input paths");
                return Ok(());
            }

            run(&uploads, &settings, &transform.output, individual)?;
        }
    }

    Ok(())
}

fn build_settings(args: &TransformArgs, mode: OutputMode) -> Result<Settings> {
    Settings::new(args.width, args.height, args.quality, mode).context("Invalid settings")
}

fn run(
    uploads: &[LoadedUpload],
    settings: &Settings,
    output: &Path,
    individual: bool,
) -> Result<()> {
    info!(
        "🚀 Processing {} image(s) -> {} WebP, quality {}",
        uploads.len(),
        settings.dimensions_label(),
        settings.quality
    );
    info!(
        "📁 Input size: {}",
        format_file_size(total_size(uploads.iter().flatten().map(|u| u.bytes.as_slice())))
    );

    let mut session = Session::new();
    let report = session.submit_loaded(uploads, settings)?;

    info!(
        "\n📊 Summary: {} processed, {} failed",
        report.processed.len(),
        report.failed.len()
    );

    let Some(package) = session.package(settings)? else {
        bail!("No images were processed successfully");
    };

    let written = package
        .write_to(output, individual)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;

    match &package {
        Package::Archive { files, .. } => {
            info!(
                "{} {} ({} files, {})",
                ARCHIVE_PREFIX,
                written[0].display(),
                files.len(),
                format_file_size(package.bytes().len() as u64)
            );
            for path in written.iter().skip(1) {
                info!("  {} {}", DOWNLOAD_PREFIX, path.display());
            }
        }
        Package::Single(file) => {
            info!(
                "{} {} ({})",
                DOWNLOAD_PREFIX,
                written[0].display(),
                format_file_size(file.bytes.len() as u64)
            );
        }
    }

    success!("Processing complete!");
    Ok(())
}
