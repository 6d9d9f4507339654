use glam::{Mat4, Vec3};

/// Composed model transforms with save/restore, in the style of a fixed-function
/// matrix stack. Each operation post-multiplies the current matrix, so the last
/// call is applied to geometry first.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.current *= Mat4::from_translation(offset);
    }

    /// Rotation in degrees about `axis`.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.current *= Mat4::from_axis_angle(axis.normalize(), degrees.to_radians());
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.current *= Mat4::from_scale(factors);
    }

    /// Runs `f` with the current transform saved, restoring it afterwards.
    pub fn with_pushed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.saved.push(self.current);
        let result = f(self);
        if let Some(saved) = self.saved.pop() {
            self.current = saved;
        }
        result
    }
}
