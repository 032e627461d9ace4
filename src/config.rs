use anyhow::Result;
use std::path::PathBuf;

use crate::camera::{Camera, ControllerKind};
use crate::cli::ViewerArgs;
use crate::renderer::ShaderSources;

/// Everything the viewer needs to know about a run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub scene_path: PathBuf,
    /// Explicit initial camera; derived from the scene bounds when absent.
    pub lookat: Option<Camera>,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Headless output path. `None` opens a window.
    pub output: Option<PathBuf>,
    pub controller: ControllerKind,
}

impl ViewerConfig {
    pub fn is_headless(&self) -> bool {
        self.output.is_some()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Built-in shaders with any `--vs`/`--fs` overrides applied.
    pub fn shader_sources(&self) -> Result<ShaderSources> {
        ShaderSources::load(self.vertex_shader.as_deref(), self.fragment_shader.as_deref())
    }
}

impl From<ViewerArgs> for ViewerConfig {
    fn from(args: ViewerArgs) -> Self {
        Self {
            scene_path: args.file,
            lookat: args.lookat,
            vertex_shader: args.vertex_shader,
            fragment_shader: args.fragment_shader,
            width: args.width,
            height: args.height,
            output: args.output,
            controller: args.controller,
        }
    }
}
