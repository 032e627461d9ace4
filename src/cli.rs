// cli.rs - Command-line interface configuration
use clap::{ArgAction, Args, Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;

use crate::camera::{Camera, ControllerKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "gltf-viewer")]
#[command(about = "glTF 2.0 scene viewer", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print GPU adapter and backend information
    Info,
    /// Display a glTF file, or render it to an image with --output
    // -h is the image height, so help is long-only.
    #[command(disable_help_flag = true)]
    Viewer(ViewerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ViewerArgs {
    /// Path to the .gltf or .glb file
    pub file: PathBuf,

    /// Initial camera as eye, center and up: ex,ey,ez,cx,cy,cz,ux,uy,uz
    #[arg(long, value_parser = parse_lookat, value_name = "EX,EY,EZ,CX,CY,CZ,UX,UY,UZ", allow_hyphen_values = true)]
    pub lookat: Option<Camera>,

    /// WGSL vertex shader replacing the built-in forward shader
    #[arg(long = "vs", value_name = "PATH")]
    pub vertex_shader: Option<PathBuf>,

    /// WGSL fragment shader replacing the built-in diffuse shader
    #[arg(long = "fs", value_name = "PATH")]
    pub fragment_shader: Option<PathBuf>,

    /// Window or image width in pixels
    #[arg(short, long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window or image height in pixels
    #[arg(short = 'h', long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Render a single frame to this PNG file instead of opening a window
    #[arg(short, long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Initial camera controller
    #[arg(long, value_enum, default_value_t = ControllerKind::FirstPerson)]
    pub controller: ControllerKind,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Parses `--lookat`: nine comma-separated numbers forming a valid camera.
pub fn parse_lookat(value: &str) -> Result<Camera, String> {
    let numbers = value
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, token)| {
            if token.is_empty() {
                return Err(format!("value {} is empty", i + 1));
            }
            token
                .parse::<f32>()
                .map_err(|_| format!("'{token}' is not a number"))
        })
        .collect::<Result<Vec<f32>, String>>()?;

    if numbers.len() != 9 {
        return Err(format!("expected 9 numbers, got {}", numbers.len()));
    }

    let eye = Vec3::new(numbers[0], numbers[1], numbers[2]);
    let center = Vec3::new(numbers[3], numbers[4], numbers[5]);
    let up = Vec3::new(numbers[6], numbers[7], numbers[8]);
    Camera::try_new(eye, center, up)
        .ok_or_else(|| "up vector must not be parallel to the view direction".to_string())
}
