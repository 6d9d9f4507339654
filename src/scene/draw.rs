use glam::{Mat4, Vec3};

use super::lighting::Material;
use super::transform::TransformStack;

/// Geometry a draw item refers to. Solid and wire primitives are unit sized;
/// radius and edge length are folded into the model transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The first `face_count` faces of the ground quad mesh.
    GroundQuads { face_count: u32 },
    SolidSphere,
    SolidCube,
    WireSphere,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub shape: Shape,
    pub model: Mat4,
    pub material: Material,
}

/// Ordered draw commands for one frame. Holds a current material the way a
/// fixed-function context does; every emitted item captures it.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    material: Material,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DrawItem> {
        self.items
    }

    pub fn push(&mut self, shape: Shape, model: Mat4) {
        self.items.push(DrawItem {
            shape,
            model,
            material: self.material,
        });
    }

    pub fn solid_sphere(&mut self, stack: &TransformStack, radius: f32) {
        self.push(
            Shape::SolidSphere,
            stack.current() * Mat4::from_scale(Vec3::splat(radius)),
        );
    }

    pub fn solid_cube(&mut self, stack: &TransformStack, size: f32) {
        self.push(
            Shape::SolidCube,
            stack.current() * Mat4::from_scale(Vec3::splat(size)),
        );
    }

    pub fn wire_sphere(&mut self, stack: &TransformStack, radius: f32) {
        self.push(
            Shape::WireSphere,
            stack.current() * Mat4::from_scale(Vec3::splat(radius)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_capture_material_at_emission() {
        let stack = TransformStack::new();
        let mut list = DrawList::new();

        list.set_material(Material::GROUND);
        list.solid_cube(&stack, 1.0);
        list.set_material(Material::SUBMARINE);
        list.solid_sphere(&stack, 1.0);

        assert_eq!(list.items()[0].material, Material::GROUND);
        assert_eq!(list.items()[1].material, Material::SUBMARINE);
    }

    #[test]
    fn primitive_size_scales_model() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(0.0, 5.0, 0.0));
        let mut list = DrawList::new();
        list.wire_sphere(&stack, 0.4);

        let edge = list.items()[0].model.transform_point3(Vec3::X);
        assert!(edge.abs_diff_eq(Vec3::new(0.4, 5.0, 0.0), 1e-6));
        assert_eq!(list.items()[0].shape, Shape::WireSphere);
    }
}
