use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use gltf_viewer::image_diff::{compare, CompareError, LoadedImage};

/// Compare a reference image with a test image. Exit code is zero if the images are the same.
#[derive(Parser, Debug)]
#[command(name = "compare-images")]
struct Args {
    /// Path to PNG reference image
    reference_image: PathBuf,
    /// Path to PNG test image
    test_image: PathBuf,
    /// Path to PNG difference RGB image, written only if the images differ
    difference_rgb_image: PathBuf,
    /// Path to PNG difference alpha image, written only if the images differ
    difference_alpha_image: PathBuf,
    /// Path to the JSON error report, written only if the images differ
    error_json_file: PathBuf,
}

/// True when the images are identical.
fn run(args: &Args) -> Result<bool, CompareError> {
    let reference = LoadedImage::open(&args.reference_image)?;
    let test = LoadedImage::open(&args.test_image)?;

    let comparison = compare(&reference, &test)?;
    if comparison.is_identical() {
        return Ok(true);
    }

    log::info!(
        "{} differing components between {} and {}",
        comparison.differences().len(),
        args.reference_image.display(),
        args.test_image.display()
    );
    comparison.write_outputs(
        &args.difference_rgb_image,
        &args.difference_alpha_image,
        &args.error_json_file,
    )?;
    Ok(false)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => {
            log::info!("OK.");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
