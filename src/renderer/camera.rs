use glam::{Mat4, Vec3};

/// Camera fixed above and in front of the scene, looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 6.0, 22.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 60.0,
            near: 0.2,
            far: 40.0,
        }
    }
}

impl FixedCamera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect.max(1e-3), self.near, self.far)
    }
}

/// Screen-space projection for overlay text, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoProjection {
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoProjection {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            near: -5.0,
            far: 5.0,
        }
    }
}

impl OrthoProjection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, 0.0, self.height, self.near, self.far)
    }

    /// Maps an overlay coordinate to a top-left-origin position on a target of
    /// `target_width × target_height`.
    pub fn to_screen(&self, x: f32, y: f32, target_width: f32, target_height: f32) -> (f32, f32) {
        let ndc = self.matrix().transform_point3(Vec3::new(x, y, 0.0));
        (
            (ndc.x + 1.0) * 0.5 * target_width,
            (1.0 - ndc.y) * 0.5 * target_height,
        )
    }
}
