//! CPU-side geometry for the unit primitives and the ground mesh.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

use crate::scene::quad_mesh::QuadMesh;

pub const SPHERE_SLICES: u32 = 100;
pub const SPHERE_STACKS: u32 = 100;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed geometry ready for upload.
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_quad_mesh(mesh: &QuadMesh) -> Self {
        let vertices = mesh
            .positions()
            .iter()
            .zip(mesh.vertex_normals())
            .map(|(p, n)| Vertex::new(p.to_array(), n.to_array()))
            .collect();

        Self {
            vertices,
            indices: mesh.triangle_indices(),
        }
    }

    /// Sphere of radius 1 split into `slices` around the Y axis and `stacks` pole to pole.
    pub fn solid_sphere(slices: u32, stacks: u32) -> Self {
        let vertices = sphere_vertices(slices, stacks);
        let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);

        for stack in 0..stacks {
            for slice in 0..slices {
                let current = stack * (slices + 1) + slice;
                let next = current + slices + 1;

                indices.extend_from_slice(&[current, next, current + 1]);
                indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }

        Self { vertices, indices }
    }

    /// Same lattice as [`MeshData::solid_sphere`], as a line list of meridians and parallels.
    pub fn wire_sphere(slices: u32, stacks: u32) -> Self {
        let vertices = sphere_vertices(slices, stacks);
        let mut indices = Vec::with_capacity((slices * stacks * 4) as usize);

        for stack in 0..stacks {
            for slice in 0..slices {
                let current = stack * (slices + 1) + slice;
                let next = current + slices + 1;

                indices.extend_from_slice(&[current, current + 1]);
                indices.extend_from_slice(&[current, next]);
            }
        }

        Self { vertices, indices }
    }

    /// Cube with unit edge centred at the origin. Each face has its own vertices.
    pub fn solid_cube() -> Self {
        #[rustfmt::skip]
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([ 0.0,  0.0,  1.0], [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]]),
            ([ 0.0,  0.0, -1.0], [[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]]),
            ([ 0.0,  1.0,  0.0], [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]]),
            ([ 0.0, -1.0,  0.0], [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]]),
            ([ 1.0,  0.0,  0.0], [[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]]),
            ([-1.0,  0.0,  0.0], [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            vertices.extend(corners.iter().map(|&c| Vertex::new(c, normal)));
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self { vertices, indices }
    }
}

fn sphere_vertices(slices: u32, stacks: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        let y = phi.cos();
        let ring = phi.sin();

        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let p = [ring * theta.cos(), y, ring * theta.sin()];
            vertices.push(Vertex::new(p, p));
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn sphere_vertices_are_on_unit_sphere() {
        let sphere = MeshData::solid_sphere(16, 8);
        assert_eq!(sphere.vertices.len(), 17 * 9);
        assert_eq!(sphere.indices.len(), 16 * 8 * 6);
        for v in &sphere.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
        }
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertices.len()));
    }

    #[test]
    fn wire_sphere_is_a_line_list() {
        let wire = MeshData::wire_sphere(12, 6);
        assert_eq!(wire.indices.len() % 2, 0);
        assert_eq!(wire.indices.len(), 12 * 6 * 4);
        assert!(wire.indices.iter().all(|&i| (i as usize) < wire.vertices.len()));
    }

    #[test]
    fn cube_has_unit_extent_and_outward_normals() {
        let cube = MeshData::solid_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for v in &cube.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert_eq!(p.abs(), Vec3::splat(0.5));
            assert_eq!(p.dot(n), 0.5);
        }
    }

    #[test]
    fn quad_mesh_upload_matches_geometry() {
        let mesh = QuadMesh::new(4, 16.0).unwrap();
        let data = MeshData::from_quad_mesh(&mesh);
        assert_eq!(data.vertices.len(), 25);
        assert_eq!(data.indices.len(), 96);
        assert_eq!(data.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(data.vertices[0].position, [-8.0, 0.0, 8.0]);
    }
}
