use anyhow::Result;
use clap::Parser;

use gltf_viewer::app;
use gltf_viewer::cli::{Cli, Command};
use gltf_viewer::config::ViewerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Info => app::print_info(),
        Command::Viewer(args) => app::run(ViewerConfig::from(args)),
    }
}
