use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::math::AABB;
use crate::scene::compute_scene_bounds;

/// A parsed glTF document with its binary buffers resolved.
pub struct GltfScene {
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
    pub path: PathBuf,
}

impl GltfScene {
    /// World-space bounds of the default scene.
    pub fn bounds(&self) -> AABB {
        compute_scene_bounds(&self.document, &self.buffers)
    }
}

/// Loads a `.gltf` or `.glb` file together with its external buffers.
///
/// Images are decoded by the importer but not kept.
pub fn load_gltf_file(path: impl AsRef<Path>) -> Result<GltfScene> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {}", path.display());

    let (document, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to load glTF file: {}", path.display()))?;

    log::info!(
        "glTF loaded: {} scenes, {} nodes, {} meshes, {} buffers",
        document.scenes().len(),
        document.nodes().len(),
        document.meshes().len(),
        buffers.len()
    );
    if document.default_scene().is_none() {
        log::warn!("{} declares no default scene, nothing will be drawn", path.display());
    }

    Ok(GltfScene {
        document,
        buffers,
        path: path.to_path_buf(),
    })
}
