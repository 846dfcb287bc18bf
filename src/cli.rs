use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "webp-resizer",
    about = "Resize images to an exact size and convert them to WebP",
    long_about = "webp-resizer resizes PNG, JPEG and WebP images to an exact width and height \
                  using Lanczos resampling, then re-encodes them as lossy WebP. \
                  Convert a single image, or process many at once and collect the results \
                  in one processed_images.zip archive.",
    version,
    after_help = "EXAMPLES:\n  \
    webp-resizer convert photo.jpg -w 800 -H 600 -q 85\n  \
    webp-resizer batch ./images \"./more/*.png\" -o ./out -r --individual\n  \
    webp-resizer --quiet batch a.jpg b.png -w 500 -H 500"
)]
pub struct Args {
    #[arg(
        short = 'Q',
        long,
        global = true,
        help = "Only print errors",
        long_help = "Suppress progress and per-file notices. Failures are still reported on stderr."
    )]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print per-file details",
        long_help = "Print input sizes, detected formats, decoded dimensions and output sizes \
                     for every processed file."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target size and quality, shared by every subcommand.
#[derive(ClapArgs, Debug, Clone)]
pub struct TransformArgs {
    #[arg(
        short = 'w',
        long,
        help = "Output width in pixels (default: 500)",
        long_help = "Exact output width in pixels. The image is stretched if the aspect ratio \
                     differs from the source."
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        help = "Output height in pixels (default: 500)",
        long_help = "Exact output height in pixels. The image is stretched if the aspect ratio \
                     differs from the source."
    )]
    pub height: Option<u32>,

    #[arg(
        short = 'q',
        long,
        help = "WebP quality (1-100, default: 80)",
        long_help = "Lossy WebP quality from 1 (smallest) to 100 (best), passed to the encoder as is."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'o',
        long,
        default_value = ".",
        help = "Output directory",
        long_help = "Directory the results are written to. Created if it does not exist."
    )]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert a single image",
        long_about = "Resize one image and write it as <name>_<width>x<height>.webp \
                      into the output directory."
    )]
    Convert {
        #[arg(help = "Input image (png, jpg, jpeg, webp)")]
        input: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,
    },

    #[command(
        about = "Convert many images into one archive",
        long_about = "Resize every image found in the inputs and bundle the results into \
                      processed_images.zip. A file that fails to convert is reported and \
                      skipped; the rest of the batch still runs."
    )]
    Batch {
        #[arg(
            required = true,
            help = "Input files, directories or glob patterns",
            long_help = "Any mix of image files, directories and glob expressions. \
                         Examples: 'photo.jpg', './images', './shots/*.png'"
        )]
        inputs: Vec<String>,

        #[command(flatten)]
        transform: TransformArgs,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively walk subdirectories of directory inputs."
        )]
        recursive: bool,

        #[arg(
            short = 'i',
            long,
            help = "Also write each converted file next to the archive",
            long_help = "Write every converted .webp file into the output directory in addition \
                         to processed_images.zip."
        )]
        individual: bool,
    },
}
