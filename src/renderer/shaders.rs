use anyhow::{bail, Context, Result};
use std::path::Path;

const FORWARD_VS: &str = include_str!("shaders/forward.vs.wgsl");
const DIFFUSE_DIRECTIONAL_LIGHT_FS: &str = include_str!("shaders/diffuse_directional_light.fs.wgsl");

/// WGSL sources of the vertex and fragment stages.
///
/// The vertex stage must export `vs_main` and the fragment stage `fs_main`,
/// both using the draw uniform block at group 0, binding 0.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Built-in forward vertex shader and diffuse directional light fragment shader.
    pub fn builtin() -> Self {
        Self {
            vertex: FORWARD_VS.to_string(),
            fragment: DIFFUSE_DIRECTIONAL_LIGHT_FS.to_string(),
        }
    }

    /// Built-in sources, each replaced by the file's contents when a path is given.
    pub fn load(vertex: Option<&Path>, fragment: Option<&Path>) -> Result<Self> {
        let mut sources = Self::builtin();
        if let Some(path) = vertex {
            sources.vertex = read_stage(path, "vs_main")?;
        }
        if let Some(path) = fragment {
            sources.fragment = read_stage(path, "fs_main")?;
        }
        Ok(sources)
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_stage(path: &Path, entry_point: &str) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader {}", path.display()))?;
    if !source.contains(entry_point) {
        bail!("Shader {} does not define `{entry_point}`", path.display());
    }
    log::info!("Using shader {}", path.display());
    Ok(source)
}
