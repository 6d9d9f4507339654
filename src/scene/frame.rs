use glam::{Mat4, Vec3, Vec4};

use super::draw::DrawItem;
use super::lighting::Light;
use crate::renderer::camera::OrthoProjection;

pub const CLEAR_COLOR: Vec4 = Vec4::new(0.6, 0.6, 0.6, 0.0);

/// Help text, bottom-left origin overlay coordinates.
pub const HELP_LINES: [OverlayLine; 4] = [
    OverlayLine::new("Page Up: Speed Increase", 50.0, 200.0),
    OverlayLine::new("Page Down: Speed Decrease", 50.0, 180.0),
    OverlayLine::new("Arrow Keys: Direction", 50.0, 160.0),
    OverlayLine::new("F1 toggles the hotkey menu", 50.0, 140.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLine {
    pub text: &'static str,
    pub x: f32,
    pub y: f32,
}

impl OverlayLine {
    pub const fn new(text: &'static str, x: f32, y: f32) -> Self {
        Self { text, x, y }
    }
}

/// 2D text drawn after the 3D content with its own projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub projection: OrthoProjection,
    pub lines: Vec<OverlayLine>,
}

impl Overlay {
    pub fn help() -> Self {
        Self {
            projection: OrthoProjection::default(),
            lines: HELP_LINES.to_vec(),
        }
    }
}

/// Everything the renderer needs for one frame, in submission order.
#[derive(Debug, Clone)]
pub struct Frame {
    pub clear_color: Vec4,
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub lights: [Light; 2],
    pub draws: Vec<DrawItem>,
    pub overlay: Option<Overlay>,
}

impl Frame {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
