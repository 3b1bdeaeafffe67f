//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

const AFTER_HELP: &str = "\
Examples:
  noir https://example.com/image.jpg
  noir https://example.com/image.jpg -o my_image.png
  noir https://example.com/image.jpg --output-dir ./images

Supported image formats: JPEG, PNG, GIF, BMP, WebP
Output format is always PNG.

Exit codes:
  0  Success
  1  General error
  2  Invalid input (bad URL or arguments)
  3  Network error (failed to fetch image)
  4  Processing error (failed to convert image)
  5  I/O error (failed to save output)
  6  User cancelled";

/// Fetch an image from a URL and convert it to black and white (grayscale).
#[derive(Parser, Debug)]
#[command(name = "noir")]
#[command(author, version, about, after_help = AFTER_HELP)]
pub struct Args {
    /// URL of the image to process (http or https)
    #[arg(value_name = "IMAGE_URL")]
    pub image_url: String,

    /// Output filename (default: processed_image_<timestamp>.png)
    #[arg(short = 'o', long = "output", value_name = "FILENAME")]
    pub output: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short = 'd', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
