use glam::{Mat4, Vec3};
use gltf::accessor::{DataType, Dimensions};
use gltf::mesh::Semantic;
use gltf::Accessor;

use super::traversal::visit_scene;
use crate::math::AABB;

/// Size in bytes of one VEC3 f32 position.
const POSITION_SIZE: usize = 12;

/// Why a primitive contributed nothing (or only part of its vertices) to the bounds.
#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("no POSITION attribute")]
    NoPositions,
    #[error("POSITION accessor is {0:?}, expected Vec3")]
    NotVec3(Dimensions),
    #[error("POSITION component type is {0:?}, expected F32")]
    NotFloat(DataType),
    #[error("{0} accessor has no buffer view")]
    NoBufferView(&'static str),
    #[error("{0} accessor is sparse")]
    Sparse(&'static str),
    #[error("buffer {0} is not loaded")]
    MissingBuffer(usize),
    #[error("index accessor is {0:?}, expected Scalar")]
    IndexNotScalar(Dimensions),
    #[error("unsupported index component type {0:?}")]
    IndexType(DataType),
    #[error("index {index} out of range for {count} positions")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("{what} accessor reads past the end of buffer view {view}")]
    OutOfBounds { what: &'static str, view: usize },
    #[error("byte stride {stride} of {what} accessor is smaller than its {element_size}-byte elements")]
    StrideTooSmall {
        what: &'static str,
        stride: usize,
        element_size: usize,
    },
}

/// Axis-aligned bounds of every mesh vertex reachable from the default scene,
/// in world space.
///
/// Returns [`AABB::EMPTY`] when the document has no default scene or no
/// readable geometry. Primitives with unsupported layouts are skipped with a
/// log message; this never fails.
pub fn compute_scene_bounds(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> AABB {
    let mut bounds = AABB::EMPTY;

    let has_scene = visit_scene(document, |node, world| {
        let Some(mesh) = node.mesh() else {
            return;
        };
        for primitive in mesh.primitives() {
            if let Err(reason) = fold_primitive(&primitive, buffers, world, &mut bounds) {
                match reason {
                    SkipReason::NoPositions => log::debug!(
                        "mesh {} primitive {}: {reason}",
                        mesh.index(),
                        primitive.index()
                    ),
                    _ => log::warn!(
                        "mesh {} primitive {} skipped for bounds: {reason}",
                        mesh.index(),
                        primitive.index()
                    ),
                }
            }
        }
    });

    if !has_scene {
        log::warn!("document has no default scene, scene bounds are empty");
    }
    bounds
}

/// Folds the world-space positions of one primitive into `bounds`.
///
/// Accessor ranges are validated before anything is read, so a primitive whose
/// data does not fit its buffer contributes nothing. An out-of-range index
/// stops the primitive; points folded before it stay in.
fn fold_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    world: &Mat4,
    bounds: &mut AABB,
) -> Result<(), SkipReason> {
    let positions = primitive
        .get(&Semantic::Positions)
        .ok_or(SkipReason::NoPositions)?;
    if positions.dimensions() != Dimensions::Vec3 {
        return Err(SkipReason::NotVec3(positions.dimensions()));
    }
    if positions.data_type() != DataType::F32 {
        return Err(SkipReason::NotFloat(positions.data_type()));
    }
    check_accessor(&positions, POSITION_SIZE, buffers, "POSITION")?;

    let indices = primitive.indices();
    if let Some(indices) = &indices {
        if indices.dimensions() != Dimensions::Scalar {
            return Err(SkipReason::IndexNotScalar(indices.dimensions()));
        }
        check_accessor(indices, index_size(indices.data_type())?, buffers, "index")?;
    }

    // The reader computes `count - 1`, empty accessors must not reach it.
    if positions.count() == 0 || indices.as_ref().is_some_and(|i| i.count() == 0) {
        return Ok(());
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let points: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or(SkipReason::OutOfBounds {
            what: "POSITION",
            view: positions.view().map_or(0, |view| view.index()),
        })?
        .collect();

    match indices {
        Some(accessor) => {
            let indices = reader.read_indices().ok_or(SkipReason::OutOfBounds {
                what: "index",
                view: accessor.view().map_or(0, |view| view.index()),
            })?;
            for index in indices.into_u32() {
                let index = index as usize;
                let point = points.get(index).ok_or(SkipReason::IndexOutOfRange {
                    index,
                    count: points.len(),
                })?;
                bounds.extend_transformed(world, Vec3::from_array(*point));
            }
        }
        None => {
            for point in &points {
                bounds.extend_transformed(world, Vec3::from_array(*point));
            }
        }
    }
    Ok(())
}

/// Byte width of an index component; glTF only allows unsigned integers.
fn index_size(data_type: DataType) -> Result<usize, SkipReason> {
    match data_type {
        DataType::U8 => Ok(1),
        DataType::U16 => Ok(2),
        DataType::U32 => Ok(4),
        other => Err(SkipReason::IndexType(other)),
    }
}

/// Checks that every element of `accessor` lies inside its buffer view and the
/// view inside its loaded buffer. Offsets come straight from the JSON, so all
/// arithmetic is checked.
fn check_accessor(
    accessor: &Accessor,
    element_size: usize,
    buffers: &[gltf::buffer::Data],
    what: &'static str,
) -> Result<(), SkipReason> {
    if accessor.sparse().is_some() {
        return Err(SkipReason::Sparse(what));
    }
    let view = accessor.view().ok_or(SkipReason::NoBufferView(what))?;
    let buffer_index = view.buffer().index();
    let buffer = buffers
        .get(buffer_index)
        .ok_or(SkipReason::MissingBuffer(buffer_index))?;
    let out_of_bounds = || SkipReason::OutOfBounds {
        what,
        view: view.index(),
    };

    let view_end = view
        .offset()
        .checked_add(view.length())
        .ok_or_else(out_of_bounds)?;
    if view_end > buffer.0.len() {
        return Err(out_of_bounds());
    }

    let stride = view.stride().unwrap_or(element_size);
    if stride < element_size {
        return Err(SkipReason::StrideTooSmall {
            what,
            stride,
            element_size,
        });
    }
    let Some(last) = accessor.count().checked_sub(1) else {
        return Ok(());
    };
    let end = stride
        .checked_mul(last)
        .and_then(|span| span.checked_add(accessor.offset()))
        .and_then(|start| start.checked_add(element_size))
        .ok_or_else(out_of_bounds)?;
    if end > view.length() {
        return Err(out_of_bounds());
    }
    Ok(())
}
