use glam::Mat4;

use super::transform::local_to_world;

/// Depth-first, pre-order walk of the document's default scene.
///
/// `visit` receives every reachable node with its world matrix, parents
/// before children. Root entries are node indices. Returns `false` without
/// visiting anything when the document declares no default scene.
pub fn visit_scene<F>(document: &gltf::Document, mut visit: F) -> bool
where
    F: FnMut(&gltf::Node, &Mat4),
{
    let Some(scene) = document.default_scene() else {
        return false;
    };

    // A tree cannot be deeper than its node count; anything deeper is a cycle.
    let max_depth = document.nodes().len();
    for root in scene.nodes() {
        visit_node(&root, &Mat4::IDENTITY, 0, max_depth, &mut visit);
    }
    true
}

fn visit_node<F>(node: &gltf::Node, parent: &Mat4, depth: usize, max_depth: usize, visit: &mut F)
where
    F: FnMut(&gltf::Node, &Mat4),
{
    if depth >= max_depth {
        log::warn!("node {} is part of a cycle, not descending further", node.index());
        return;
    }

    let world = local_to_world(node, parent);
    visit(node, &world);
    for child in node.children() {
        visit_node(&child, &world, depth + 1, max_depth, visit);
    }
}
