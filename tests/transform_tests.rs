mod common;

use common::{assert_vec3_near, document};
use glam::{Mat4, Quat, Vec3};
use gltf_viewer::scene::{compose_trs, local_to_world};

/// One node, with the given JSON properties, in a document without meshes.
fn single_node(properties: &str) -> gltf::Document {
    document(&format!(
        r#"{{"asset": {{"version": "2.0"}}, "nodes": [{{{properties}}}]}}"#
    ))
}

fn world_of(properties: &str, parent: &Mat4) -> Mat4 {
    let document = single_node(properties);
    let node = document.nodes().next().unwrap();
    local_to_world(&node, parent)
}

#[cfg(test)]
mod transform_tests {
    use super::*;

    #[test]
    fn test_node_without_transform_inherits_parent() {
        let parent = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world_of("", &parent), parent);
    }

    #[test]
    fn test_matrix_wins_over_trs() {
        let parent = Mat4::from_scale(Vec3::splat(2.0));
        let world = world_of(
            r#""matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 5,0,0,1],
               "translation": [100, 0, 0],
               "scale": [3, 3, 3]"#,
            &parent,
        );

        let expected = parent * Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!(world.abs_diff_eq(expected, 1e-6));
        assert_vec3_near(world.transform_point3(Vec3::ZERO), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_identity_rotation_is_translation_times_scale() {
        let parent = Mat4::from_rotation_z(0.3);
        let world = world_of(
            r#""translation": [1, 2, 3], "rotation": [0, 0, 0, 1], "scale": [2, 4, 8]"#,
            &parent,
        );

        let expected = parent
            * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_scale(Vec3::new(2.0, 4.0, 8.0));
        assert!(world.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_rotation_is_read_as_xyzw() {
        // 90 degrees about +Y.
        let world = world_of(r#""rotation": [0, 0.70710677, 0, 0.70710677]"#, &Mat4::IDENTITY);
        assert_vec3_near(world.transform_vector3(Vec3::X), Vec3::new(0.0, 0.0, -1.0));
        assert_vec3_near(world.transform_vector3(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_trs_applies_scale_then_rotation_then_translation() {
        // 90 degrees about +Z.
        let world = world_of(
            r#""translation": [1, 0, 0],
               "rotation": [0, 0, 0.70710677, 0.70710677],
               "scale": [2, 1, 1]"#,
            &Mat4::IDENTITY,
        );
        assert_vec3_near(world.transform_point3(Vec3::X), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_compose_trs_matches_glam() {
        let parent = Mat4::from_translation(Vec3::new(-1.0, 0.0, 4.0));
        let rotation = Quat::from_rotation_x(1.1);
        let composed = compose_trs(
            &parent,
            [0.5, -0.5, 2.0],
            rotation.to_array(),
            [1.0, 3.0, 0.5],
        );

        let expected = parent
            * Mat4::from_scale_rotation_translation(
                Vec3::new(1.0, 3.0, 0.5),
                rotation,
                Vec3::new(0.5, -0.5, 2.0),
            );
        assert!(composed.abs_diff_eq(expected, 1e-5));
    }
}
