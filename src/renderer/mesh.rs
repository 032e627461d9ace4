use anyhow::{bail, Result};
use gltf::mesh::Mode;
use wgpu::util::DeviceExt;

/// Interleaved vertex layout shared by every pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry of one glTF primitive, ready for upload.
#[derive(Debug, Clone)]
pub struct PrimitiveData {
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u32>>,
    pub topology: wgpu::PrimitiveTopology,
}

/// wgpu topology for a glTF draw mode. Line loops and triangle fans have none.
pub fn topology_for(mode: Mode) -> Option<wgpu::PrimitiveTopology> {
    match mode {
        Mode::Points => Some(wgpu::PrimitiveTopology::PointList),
        Mode::Lines => Some(wgpu::PrimitiveTopology::LineList),
        Mode::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
        Mode::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
        Mode::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
        Mode::LineLoop | Mode::TriangleFan => None,
    }
}

/// Reads POSITION, NORMAL and TEXCOORD_0 plus indices widened to `u32`.
///
/// Missing normals and texture coordinates are zero-filled.
pub fn extract_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<PrimitiveData> {
    let Some(topology) = topology_for(primitive.mode()) else {
        bail!("draw mode {:?} is not supported", primitive.mode());
    };

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let Some(positions) = reader.read_positions() else {
        bail!("primitive has no POSITION attribute");
    };
    let normals: Vec<[f32; 3]> = reader.read_normals().map(|n| n.collect()).unwrap_or_default();
    let tex_coords: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|t| t.into_f32().collect())
        .unwrap_or_default();

    let vertices: Vec<Vertex> = positions
        .enumerate()
        .map(|(i, position)| Vertex {
            position,
            normal: normals.get(i).copied().unwrap_or_default(),
            tex_coord: tex_coords.get(i).copied().unwrap_or_default(),
        })
        .collect();

    let indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());
    if let Some(indices) = &indices {
        if let Some(&max) = indices.iter().max() {
            if max as usize >= vertices.len() {
                bail!("index {max} out of range for {} vertices", vertices.len());
            }
        }
    }

    Ok(PrimitiveData {
        vertices,
        indices,
        topology,
    })
}

/// Vertex (and optional index) buffers of one uploaded primitive.
pub struct GpuPrimitive {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    /// Index count when indexed, vertex count otherwise.
    pub element_count: u32,
    pub topology: wgpu::PrimitiveTopology,
}

impl GpuPrimitive {
    pub fn upload(device: &wgpu::Device, data: &PrimitiveData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = data.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        let element_count = match &data.indices {
            Some(indices) => indices.len(),
            None => data.vertices.len(),
        } as u32;

        Self {
            vertex_buffer,
            index_buffer,
            element_count,
            topology: data.topology,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(index_buffer) => {
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => pass.draw(0..self.element_count, 0..1),
        }
    }
}

/// Uploaded primitives of every mesh, indexed like the document's meshes.
///
/// Primitives that cannot be drawn are `None` and were reported at upload.
pub struct GpuMeshes {
    meshes: Vec<Vec<Option<GpuPrimitive>>>,
}

impl GpuMeshes {
    pub fn upload(
        device: &wgpu::Device,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
    ) -> Self {
        let mut uploaded = 0usize;
        let meshes = document
            .meshes()
            .map(|mesh| {
                mesh.primitives()
                    .map(|primitive| {
                        let label = format!("Mesh {} Primitive {}", mesh.index(), primitive.index());
                        match extract_primitive(&primitive, buffers) {
                            Ok(data) if data.vertices.is_empty() => None,
                            Ok(data) => {
                                uploaded += 1;
                                Some(GpuPrimitive::upload(device, &data, &label))
                            }
                            Err(e) => {
                                log::warn!("{label} not drawn: {e}");
                                None
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        log::info!("Uploaded {uploaded} primitives");
        Self { meshes }
    }

    /// Drawable primitives of mesh `index`.
    pub fn primitives(&self, index: usize) -> impl Iterator<Item = &GpuPrimitive> {
        self.meshes
            .get(index)
            .into_iter()
            .flat_map(|primitives| primitives.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::layout().array_stride, 32);
    }

    #[test]
    fn unsupported_modes_have_no_topology() {
        assert_eq!(topology_for(Mode::LineLoop), None);
        assert_eq!(topology_for(Mode::TriangleFan), None);
        assert_eq!(
            topology_for(Mode::TriangleStrip),
            Some(wgpu::PrimitiveTopology::TriangleStrip)
        );
    }
}
