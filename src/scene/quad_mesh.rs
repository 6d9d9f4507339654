//! Planar grid of quadrilaterals used for the ground patch.
//!
//! Geometry is built once and only read afterwards; the renderer uploads
//! [`QuadMesh::positions`], [`QuadMesh::vertex_normals`] and
//! [`QuadMesh::triangle_indices`] a single time and redraws them each frame.

use glam::Vec3;

use super::draw::{DrawList, Shape};
use super::lighting::Material;
use super::transform::TransformStack;
use crate::error::Error;

/// One quadrilateral, corners counter-clockwise when seen from the normal side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadFace {
    pub corners: [u32; 4],
    pub normal: Vec3,
}

pub struct QuadMesh {
    resolution: usize,
    positions: Vec<Vec3>,
    vertex_normals: Vec<Vec3>,
    faces: Vec<QuadFace>,
    material: Material,
}

impl QuadMesh {
    /// Allocates a `resolution × resolution` grid and fills it with a default
    /// `size × size` square on the XZ plane, centred at the origin.
    pub fn new(resolution: usize, size: f32) -> Result<Self, Error> {
        if resolution == 0 {
            return Err(Error::InvalidResolution(resolution));
        }

        let vertex_count = (resolution + 1) * (resolution + 1);
        let mut mesh = Self {
            resolution,
            positions: Vec::with_capacity(vertex_count),
            vertex_normals: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(resolution * resolution),
            material: Material::default(),
        };

        let half = size / 2.0;
        mesh.init_mesh(
            resolution,
            Vec3::new(-half, 0.0, half),
            size,
            size,
            Vec3::X,
            Vec3::NEG_Z,
        )?;
        Ok(mesh)
    }

    /// Lays out the lattice by stepping `dir1` across `width` and `dir2` across
    /// `height` from `origin`. Directions are expected to be unit length and
    /// orthogonal.
    pub fn init_mesh(
        &mut self,
        resolution: usize,
        origin: Vec3,
        width: f32,
        height: f32,
        dir1: Vec3,
        dir2: Vec3,
    ) -> Result<(), Error> {
        if resolution == 0 {
            return Err(Error::InvalidResolution(resolution));
        }

        let row_len = resolution + 1;
        let step1 = dir1 * (width / resolution as f32);
        let step2 = dir2 * (height / resolution as f32);

        self.resolution = resolution;
        self.positions.clear();
        for row in 0..=resolution {
            for col in 0..=resolution {
                self.positions
                    .push(origin + step1 * col as f32 + step2 * row as f32);
            }
        }

        self.faces.clear();
        for row in 0..resolution {
            for col in 0..resolution {
                let v0 = row * row_len + col;
                let v1 = v0 + 1;
                let v3 = v0 + row_len;
                let v2 = v3 + 1;

                let p0 = self.positions[v0];
                let normal = (self.positions[v1] - p0)
                    .cross(self.positions[v3] - p0)
                    .normalize_or_zero();

                self.faces.push(QuadFace {
                    corners: [v0 as u32, v1 as u32, v2 as u32, v3 as u32],
                    normal,
                });
            }
        }

        self.vertex_normals.clear();
        self.vertex_normals.resize(self.positions.len(), Vec3::ZERO);
        for face in &self.faces {
            for &corner in &face.corners {
                self.vertex_normals[corner as usize] += face.normal;
            }
        }
        for normal in &mut self.vertex_normals {
            *normal = normal.normalize_or_zero();
        }

        Ok(())
    }

    pub fn set_material(&mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) {
        self.material = Material::new(ambient, diffuse, specular, shininess);
    }

    /// Emits the first `resolution²` faces with the mesh material. A resolution
    /// larger than the built one only draws what exists.
    pub fn draw_mesh(&self, resolution: usize, stack: &TransformStack, list: &mut DrawList) {
        let face_count = (resolution * resolution).min(self.faces.len());
        list.set_material(self.material);
        list.push(
            Shape::GroundQuads {
                face_count: face_count as u32,
            },
            stack.current(),
        );
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Smooth-shading normals, one per vertex.
    pub fn vertex_normals(&self) -> &[Vec3] {
        &self.vertex_normals
    }

    /// Row-major faces; each carries its flat-shading normal.
    pub fn faces(&self) -> &[QuadFace] {
        &self.faces
    }

    /// Two triangles per face, faces in row-major order.
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|face| {
                let [a, b, c, d] = face.corners;
                [a, b, c, a, c, d]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(resolution: usize) -> QuadMesh {
        let mut mesh = QuadMesh::new(resolution, 16.0).unwrap();
        mesh.init_mesh(
            resolution,
            Vec3::new(-8.0, 0.0, 8.0),
            16.0,
            16.0,
            Vec3::X,
            Vec3::NEG_Z,
        )
        .unwrap();
        mesh
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(matches!(
            QuadMesh::new(0, 16.0),
            Err(Error::InvalidResolution(0))
        ));

        let mut mesh = ground(4);
        let result = mesh.init_mesh(0, Vec3::ZERO, 1.0, 1.0, Vec3::X, Vec3::NEG_Z);
        assert!(result.is_err());
        assert_eq!(mesh.resolution(), 4);
    }

    #[test]
    fn counts_follow_resolution() {
        for resolution in [1, 2, 7, 16] {
            let mesh = ground(resolution);
            assert_eq!(mesh.faces().len(), resolution * resolution);
            assert_eq!(mesh.positions().len(), (resolution + 1) * (resolution + 1));
            assert_eq!(mesh.vertex_normals().len(), mesh.positions().len());
            assert_eq!(mesh.triangle_indices().len(), resolution * resolution * 6);
        }
    }

    #[test]
    fn vertices_lie_on_regular_lattice() {
        let resolution = 16;
        let mesh = ground(resolution);
        let origin = Vec3::new(-8.0, 0.0, 8.0);

        for row in 0..=resolution {
            for col in 0..=resolution {
                let expected = origin + Vec3::new(col as f32, 0.0, -(row as f32));
                let actual = mesh.positions()[row * (resolution + 1) + col];
                assert!(actual.abs_diff_eq(expected, 1e-5), "{actual} != {expected}");
            }
        }
    }

    #[test]
    fn rectangular_patch_along_custom_directions() {
        let mut mesh = QuadMesh::new(2, 1.0).unwrap();
        mesh.init_mesh(2, Vec3::new(1.0, 2.0, 3.0), 4.0, 2.0, Vec3::Y, Vec3::Z)
            .unwrap();

        let last = *mesh.positions().last().unwrap();
        assert!(last.abs_diff_eq(Vec3::new(1.0, 6.0, 5.0), 1e-6));
        for face in mesh.faces() {
            assert!(face.normal.abs_diff_eq(Vec3::X, 1e-6));
        }
    }

    #[test]
    fn normals_match_direction_cross_product() {
        let mesh = ground(8);
        let expected = Vec3::X.cross(Vec3::NEG_Z);
        assert!(expected.abs_diff_eq(Vec3::Y, 1e-6));

        for face in mesh.faces() {
            assert!(face.normal.abs_diff_eq(expected, 1e-5));
        }
        for normal in mesh.vertex_normals() {
            assert!(normal.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn faces_are_row_major() {
        let mesh = ground(3);
        let faces = mesh.faces();
        assert_eq!(faces[0].corners, [0, 1, 5, 4]);
        assert_eq!(faces[1].corners, [1, 2, 6, 5]);
        assert_eq!(faces[3].corners, [4, 5, 9, 8]);
    }

    #[test]
    fn draw_emits_one_item_with_mesh_material() {
        let mut mesh = ground(16);
        mesh.set_material(
            Material::GROUND.ambient,
            Material::GROUND.diffuse,
            Material::GROUND.specular,
            Material::GROUND.shininess,
        );
        let mut list = DrawList::new();
        mesh.draw_mesh(16, &TransformStack::new(), &mut list);

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].shape, Shape::GroundQuads { face_count: 256 });
        assert_eq!(list.items()[0].material, Material::GROUND);
    }

    #[test]
    fn oversized_draw_resolution_is_clamped() {
        let mesh = ground(4);
        let mut list = DrawList::new();
        mesh.draw_mesh(10, &TransformStack::new(), &mut list);
        assert_eq!(list.items()[0].shape, Shape::GroundQuads { face_count: 16 });
    }
}
