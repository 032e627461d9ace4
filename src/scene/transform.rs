use glam::{Mat4, Quat, Vec3};
use gltf::scene::Transform;

/// World matrix of `node` given its parent's world matrix.
///
/// An explicit node matrix wins over translation/rotation/scale; otherwise the
/// three components are composed as `parent * T * R * S`, each defaulting to
/// identity when absent.
pub fn local_to_world(node: &gltf::Node, parent: &Mat4) -> Mat4 {
    match node.transform() {
        Transform::Matrix { matrix } => *parent * Mat4::from_cols_array_2d(&matrix),
        Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => compose_trs(parent, translation, rotation, scale),
    }
}

/// `parent * T * R * S` from raw glTF arrays.
///
/// `rotation` uses the glTF component layout `[x, y, z, w]`.
pub fn compose_trs(
    parent: &Mat4,
    translation: [f32; 3],
    rotation: [f32; 4],
    scale: [f32; 3],
) -> Mat4 {
    let [x, y, z, w] = rotation;
    let t = Mat4::from_translation(Vec3::from_array(translation));
    let r = Mat4::from_quat(Quat::from_xyzw(x, y, z, w));
    let s = Mat4::from_scale(Vec3::from_array(scale));
    *parent * t * r * s
}
