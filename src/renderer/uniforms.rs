use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::draw::DrawItem;
use crate::scene::frame::Frame;
use crate::scene::lighting::{Light, GLOBAL_AMBIENT};

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&Light> for GpuLight {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            ambient: light.ambient.extend(1.0).to_array(),
            diffuse: light.diffuse.extend(1.0).to_array(),
            specular: light.specular.extend(1.0).to_array(),
        }
    }
}

/// Bound once per frame at group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub global_ambient: [f32; 4],
    pub lights: [GpuLight; 2],
    /// 1.0 for each enabled light, in `x` and `y`
    pub light_enabled: [f32; 4],
}

impl FrameUniforms {
    pub fn from_frame(frame: &Frame) -> Self {
        let enabled = |light: &Light| if light.enabled { 1.0 } else { 0.0 };
        Self {
            view_proj: frame.view_projection().to_cols_array_2d(),
            eye: frame.eye.extend(1.0).to_array(),
            global_ambient: GLOBAL_AMBIENT.extend(1.0).to_array(),
            lights: [
                GpuLight::from(&frame.lights[0]),
                GpuLight::from(&frame.lights[1]),
            ],
            light_enabled: [enabled(&frame.lights[0]), enabled(&frame.lights[1]), 0.0, 0.0],
        }
    }
}

/// Bound per draw at group 1 through a dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// Shininess in `x`
    pub shininess: [f32; 4],
}

impl From<&DrawItem> for DrawUniforms {
    fn from(item: &DrawItem) -> Self {
        let material = &item.material;
        let color = |c: Vec3| c.extend(1.0).to_array();
        Self {
            model: item.model.to_cols_array_2d(),
            normal_matrix: normal_matrix(item.model).to_cols_array_2d(),
            ambient: color(material.ambient),
            diffuse: color(material.diffuse),
            specular: color(material.specular),
            shininess: [material.shininess, 0.0, 0.0, 0.0],
        }
    }
}

/// Inverse-transpose of the model matrix, so normals stay perpendicular under
/// non-uniform scale.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() < f32::EPSILON {
        return Mat4::IDENTITY;
    }
    model.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::draw::Shape;
    use crate::scene::lighting::Material;

    #[test]
    fn layouts_match_shader() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64 + 16 + 16 + 128 + 16);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 192);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(2.25, 1.0, 1.0));
        // Surface tangent (1, -1, 0) on a unit sphere at the diagonal
        let n = normal_matrix(model).transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let tangent = model.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-5);
    }

    #[test]
    fn draw_uniforms_carry_material() {
        let item = DrawItem {
            shape: Shape::SolidCube,
            model: Mat4::IDENTITY,
            material: Material::SUBMARINE,
        };
        let uniforms = DrawUniforms::from(&item);
        assert_eq!(uniforms.diffuse, [0.9, 0.5, 0.0, 1.0]);
        assert_eq!(uniforms.shininess[0], 0.0);
    }
}
