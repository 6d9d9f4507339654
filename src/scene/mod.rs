//! Scene state and per-tick / per-frame logic.
//!
//! One [`Scene`] owns the ground mesh, the submarine and the help-overlay flag.
//! The event loop drives it through [`Scene::tick`], [`Scene::handle_key`] and
//! [`Scene::compose_frame`], all on the same thread.

pub mod draw;
pub mod frame;
pub mod lighting;
pub mod quad_mesh;
pub mod submarine;
pub mod transform;

use glam::Vec3;

use crate::error::Error;
use crate::renderer::camera::FixedCamera;
use draw::DrawList;
use frame::{Frame, Overlay, CLEAR_COLOR};
use lighting::{Light, Material};
use quad_mesh::QuadMesh;
use submarine::{SceneKey, Submarine};
use transform::TransformStack;

pub const GROUND_SIZE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub mesh_resolution: usize,
    pub second_light: bool,
    pub show_help: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mesh_resolution: 16,
            second_light: false,
            show_help: false,
        }
    }
}

/// Navigable volume of the scene. Declared for reference, not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

pub struct Scene {
    ground: QuadMesh,
    pub submarine: Submarine,
    pub bounds: BoundingBox,
    pub lights: [Light; 2],
    pub camera: FixedCamera,
    pub show_help: bool,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Result<Self, Error> {
        let resolution = config.mesh_resolution;
        let mut ground = QuadMesh::new(resolution, GROUND_SIZE)?;
        ground.init_mesh(
            resolution,
            Vec3::new(-8.0, 0.0, 8.0),
            GROUND_SIZE,
            GROUND_SIZE,
            Vec3::X,
            Vec3::NEG_Z,
        )?;
        let m = Material::GROUND;
        ground.set_material(m.ambient, m.diffuse, m.specular, m.shininess);

        Ok(Self {
            ground,
            submarine: Submarine::default(),
            bounds: BoundingBox {
                min: Vec3::new(-8.0, 0.0, -8.0),
                max: Vec3::new(8.0, 6.0, 8.0),
            },
            lights: lighting::scene_lights(config.second_light),
            camera: FixedCamera::default(),
            show_help: config.show_help,
        })
    }

    pub fn ground(&self) -> &QuadMesh {
        &self.ground
    }

    pub fn tick(&mut self) {
        if self.submarine.tick() {
            log::trace!("Submarine wrapped to {}", self.submarine.position);
        }
        if !self.bounds.contains(self.submarine.position) {
            log::trace!("Submarine outside bounds at {}", self.submarine.position);
        }
    }

    /// Returns whether the key changed anything.
    pub fn handle_key(&mut self, key: SceneKey) -> bool {
        let changed = match key {
            SceneKey::F1 => {
                self.show_help = !self.show_help;
                true
            }
            other => self.submarine.apply_key(other),
        };
        log::debug!(
            "{:?}: changed={} speed={:.3} prop_speed={:.2} altitude={:.2} heading={}",
            key,
            changed,
            self.submarine.speed,
            self.submarine.prop_speed,
            self.submarine.position.y,
            self.submarine.heading,
        );
        changed
    }

    /// Builds the frame: ground first, then the submarine, then the optional
    /// help overlay with its own screen projection.
    pub fn compose_frame(&self, aspect: f32) -> Frame {
        let mut stack = TransformStack::new();
        let mut list = DrawList::new();

        self.ground
            .draw_mesh(self.ground.resolution(), &stack, &mut list);

        list.set_material(Material::SUBMARINE);
        self.submarine.draw(&mut stack, &mut list);

        Frame {
            clear_color: CLEAR_COLOR,
            eye: self.camera.eye,
            view: self.camera.view(),
            projection: self.camera.projection(aspect),
            lights: self.lights,
            draws: list.into_items(),
            overlay: self.show_help.then(Overlay::help),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::draw::Shape;
    use super::*;

    fn scene() -> Scene {
        Scene::new(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn rejects_zero_resolution() {
        let config = SceneConfig {
            mesh_resolution: 0,
            ..SceneConfig::default()
        };
        assert!(matches!(Scene::new(&config), Err(Error::InvalidResolution(0))));
    }

    #[test]
    fn page_up_then_ten_ticks() {
        let mut scene = scene();
        scene.submarine.position.x = 0.0;

        assert!(scene.handle_key(SceneKey::PageUp));
        assert!((scene.submarine.speed - 0.075).abs() < 1e-6);
        assert!((scene.submarine.prop_speed - 1.25).abs() < 1e-6);

        for _ in 0..10 {
            scene.tick();
        }
        assert!((scene.submarine.position.x - -0.75).abs() < 1e-5);
        assert_eq!(scene.submarine.prop_phase, 105.0);
    }

    #[test]
    fn help_toggle_pairs_cancel() {
        let mut scene = scene();
        let initial = scene.show_help;
        scene.handle_key(SceneKey::F1);
        assert_ne!(scene.show_help, initial);
        scene.handle_key(SceneKey::F1);
        assert_eq!(scene.show_help, initial);
    }

    #[test]
    fn frame_draws_ground_before_submarine() {
        let frame = scene().compose_frame(1.0);

        assert_eq!(frame.draws[0].shape, Shape::GroundQuads { face_count: 256 });
        assert_eq!(frame.draws[0].material, Material::GROUND);
        assert_eq!(frame.draws.len(), 1 + 14);
        assert!(frame.draws[1..]
            .iter()
            .all(|d| d.material == Material::SUBMARINE));
        assert_eq!(frame.clear_color, CLEAR_COLOR);
    }

    #[test]
    fn overlay_leaves_3d_projection_untouched() {
        let mut scene = scene();
        let plain = scene.compose_frame(1.5);
        assert!(plain.overlay.is_none());

        scene.handle_key(SceneKey::F1);
        let with_help = scene.compose_frame(1.5);
        let overlay = with_help.overlay.as_ref().unwrap();

        assert_eq!(overlay.lines.len(), 4);
        assert_eq!(overlay.lines[0].text, "Page Up: Speed Increase");
        assert_eq!(with_help.projection, plain.projection);
        assert_eq!(with_help.view, plain.view);
        assert_ne!(overlay.projection.matrix(), plain.projection);
    }

    #[test]
    fn bounding_box_is_not_enforced() {
        let mut scene = scene();
        for _ in 0..200 {
            scene.tick();
        }
        assert!(!scene.bounds.contains(scene.submarine.position));
        assert!(scene.bounds.contains(Vec3::new(0.0, 5.0, 0.0)));
    }
}
