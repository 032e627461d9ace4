mod common;

use common::{assert_vec3_near, document};
use glam::Vec3;
use gltf_viewer::scene::visit_scene;

/// Document whose default scene lists `roots` over `nodes`.
fn scene_document(nodes: &str, roots: &str) -> gltf::Document {
    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": ROOTS}],
        "nodes": NODES
    }"#
    .replace("ROOTS", roots)
    .replace("NODES", nodes);
    document(&json)
}

fn visit_order(document: &gltf::Document) -> Vec<usize> {
    let mut order = Vec::new();
    assert!(visit_scene(document, |node, _| order.push(node.index())));
    order
}

#[cfg(test)]
mod traversal_tests {
    use super::*;

    #[test]
    fn test_parents_are_visited_before_children() {
        let document = scene_document(
            r#"[{"children": [1, 2]}, {"children": [3]}, {}, {}]"#,
            "[0]",
        );
        assert_eq!(visit_order(&document), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_world_matrix_accumulates_down_the_path() {
        let document = scene_document(
            r#"[{"translation": [1, 0, 0], "children": [1]},
                {"translation": [0, 2, 0], "children": [2]},
                {"translation": [0, 0, 3]}]"#,
            "[0]",
        );
        let mut origins = Vec::new();
        visit_scene(&document, |_, world| origins.push(world.transform_point3(Vec3::ZERO)));

        assert_eq!(origins.len(), 3);
        assert_vec3_near(origins[0], Vec3::new(1.0, 0.0, 0.0));
        assert_vec3_near(origins[1], Vec3::new(1.0, 2.0, 0.0));
        assert_vec3_near(origins[2], Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_root_entries_are_node_indices() {
        let document = scene_document(r#"[{}, {}, {"children": [0]}]"#, "[2, 1]");
        assert_eq!(visit_order(&document), vec![2, 0, 1]);
    }

    #[test]
    fn test_missing_default_scene_visits_nothing() {
        let document = document(
            r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": [0]}], "nodes": [{}]}"#,
        );
        let mut visits = 0;
        assert!(!visit_scene(&document, |_, _| visits += 1));
        assert_eq!(visits, 0);
    }

    #[test]
    fn test_self_cycle_terminates() {
        let document = scene_document(r#"[{"children": [0]}]"#, "[0]");
        assert_eq!(visit_order(&document), vec![0]);
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let document = scene_document(r#"[{"children": [1]}, {"children": [0]}]"#, "[0]");
        assert_eq!(visit_order(&document), vec![0, 1]);
    }
}
