#![allow(dead_code)]

use glam::Vec3;

/// Tolerance for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, EPSILON),
        "expected {expected}, got {actual}"
    );
}

/// Parses glTF JSON into a document without validating indices.
pub fn document(json: &str) -> gltf::Document {
    let root: gltf::json::Root = serde_json::from_str(json).expect("test glTF JSON must parse");
    gltf::Document::from_json_without_validation(root)
}

pub fn buffers(data: Vec<u8>) -> Vec<gltf::buffer::Data> {
    vec![gltf::buffer::Data(data)]
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Triangle (0,0,0), (1,0,0), (0,1,0).
pub const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// Document with a single non-indexed triangle mesh (mesh 0) in buffer 0.
///
/// `nodes` is the JSON node array and `roots` the JSON root index array of
/// scene 0, which is the default scene.
pub fn triangle_scene(nodes: &str, roots: &str) -> (gltf::Document, Vec<gltf::buffer::Data>) {
    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": ROOTS}],
        "nodes": NODES,
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "buffers": [{"byteLength": 36}],
        "bufferViews": [{"buffer": 0, "byteLength": 36}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}]
    }"#
    .replace("ROOTS", roots)
    .replace("NODES", nodes);

    (document(&json), buffers(f32_bytes(&TRIANGLE)))
}
