//! Scene graph traversal over a loaded glTF document.

pub mod bounds;
pub mod framing;
pub mod transform;
pub mod traversal;

pub use bounds::compute_scene_bounds;
pub use framing::SceneFraming;
pub use transform::{compose_trs, local_to_world};
pub use traversal::visit_scene;
