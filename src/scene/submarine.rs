use glam::Vec3;

use super::draw::DrawList;
use super::transform::TransformStack;

/// Degrees added to the propeller phase each tick.
pub const PROP_PHASE_STEP: f32 = 1.5;

pub const SPEED_STEP: f32 = 0.025;
pub const PROP_SPEED_STEP: f32 = 0.25;
pub const SPEED_MIN: f32 = 0.1;
pub const SPEED_MAX: f32 = 0.25;
const SPEED_EPSILON: f32 = 1e-4;

pub const ALTITUDE_STEP: f32 = 0.25;
pub const HEADING_STEP: f32 = 5.0;

/// Once x drops below this, the submarine reappears at `WRAP_RESET`.
pub const WRAP_THRESHOLD: f32 = -16.0;
pub const WRAP_RESET: f32 = 16.0;

/// Keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKey {
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F1,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submarine {
    pub position: Vec3,
    /// Rotation about +Y, degrees.
    pub heading: f32,
    pub speed: f32,
    /// Multiplier on the propeller phase when drawing blades.
    pub prop_speed: f32,
    /// Accumulated blade angle, degrees. Never wrapped.
    pub prop_phase: f32,
    pub body_length: f32,
    pub body_height: f32,
    pub body_width: f32,
}

impl Default for Submarine {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            heading: 0.0,
            speed: 0.05,
            prop_speed: 1.0,
            prop_phase: 90.0,
            body_length: 2.25,
            body_height: 1.0,
            body_width: 1.0,
        }
    }
}

impl Submarine {
    /// Advances one timer step. Returns true when the position wrapped.
    pub fn tick(&mut self) -> bool {
        self.position.x -= self.speed;
        self.prop_phase += PROP_PHASE_STEP;

        if self.position.x < WRAP_THRESHOLD {
            self.position.x = WRAP_RESET;
            true
        } else if self.position.y > WRAP_RESET {
            // Altitude only changes through input; the ceiling check rides
            // along with the horizontal one and is skipped on a wrap tick.
            self.position.y = WRAP_THRESHOLD;
            true
        } else {
            false
        }
    }

    /// Applies a motion key. Returns false when the key left the record untouched.
    pub fn apply_key(&mut self, key: SceneKey) -> bool {
        match key {
            SceneKey::PageUp => {
                if self.speed + SPEED_STEP > SPEED_MAX + SPEED_EPSILON {
                    return false;
                }
                self.speed += SPEED_STEP;
                self.prop_speed += PROP_SPEED_STEP;
            }
            SceneKey::PageDown => {
                if self.speed - SPEED_STEP < SPEED_MIN - SPEED_EPSILON {
                    return false;
                }
                self.speed -= SPEED_STEP;
                self.prop_speed -= PROP_SPEED_STEP;
            }
            SceneKey::Up => self.position.y += ALTITUDE_STEP,
            SceneKey::Down => self.position.y -= ALTITUDE_STEP,
            SceneKey::Left => self.heading += HEADING_STEP,
            SceneKey::Right => self.heading -= HEADING_STEP,
            SceneKey::F1 => return false,
        }
        true
    }

    /// Emits the hull, propellers, holders and side fins. Every part is placed
    /// relative to `position` after the heading rotation about the world origin.
    pub fn draw(&self, stack: &mut TransformStack, list: &mut DrawList) {
        let p = self.position;
        let main_angle = self.prop_phase * self.prop_speed;
        let mini_angle = (self.prop_phase + 45.0) * self.prop_speed;

        stack.with_pushed(|stack| {
            stack.rotate(self.heading, Vec3::Y);

            // Hull
            stack.with_pushed(|s| {
                s.translate(p);
                s.scale(Vec3::new(self.body_length, self.body_height, self.body_width));
                list.solid_sphere(s, 1.0);
            });

            // Main propeller
            for blade in [Vec3::new(1.0, 3.5, 1.0), Vec3::new(1.0, 1.0, 3.5)] {
                stack.with_pushed(|s| {
                    s.translate(p + Vec3::new(3.0, 0.0, 0.0));
                    s.rotate(main_angle, Vec3::X);
                    s.scale(blade);
                    list.solid_cube(s, 0.5);
                });
            }

            for side in [1.0, -1.0] {
                // Mini propeller
                for blade in [Vec3::new(1.0, 3.5, 1.0), Vec3::new(1.0, 1.0, 3.5)] {
                    stack.with_pushed(|s| {
                        s.translate(p + Vec3::new(0.5, -1.5, side));
                        s.rotate(mini_angle, Vec3::X);
                        s.scale(blade);
                        list.solid_cube(s, 0.25);
                    });
                }

                // Holder: horizontal arm, then vertical strut
                stack.with_pushed(|s| {
                    s.translate(p + Vec3::new(0.25, -1.5, side));
                    s.scale(Vec3::new(2.0, 1.0, 1.0));
                    list.solid_cube(s, 0.25);
                });
                stack.with_pushed(|s| {
                    s.translate(p + Vec3::new(0.0, -1.25, side));
                    s.scale(Vec3::new(1.0, 3.0, 1.0));
                    list.solid_cube(s, 0.25);
                });
            }

            // Main propeller shaft
            stack.with_pushed(|s| {
                s.translate(p + Vec3::new(2.5, 0.0, 0.0));
                s.scale(Vec3::new(2.0, 1.0, 1.0));
                list.solid_cube(s, 0.5);
            });

            // Side fins
            for side in [1.0, -1.0] {
                stack.with_pushed(|s| {
                    s.translate(p + Vec3::new(0.0, -0.5, side));
                    s.scale(Vec3::new(2.5, 1.25, 1.0));
                    list.wire_sphere(s, 0.4);
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::draw::Shape;

    #[test]
    fn tick_moves_left_and_spins_propeller() {
        let mut sub = Submarine::default();
        let x0 = sub.position.x;
        let n = 40;
        for _ in 0..n {
            assert!(!sub.tick());
        }
        assert!((sub.position.x - (x0 - n as f32 * sub.speed)).abs() < 1e-4);
        assert_eq!(sub.prop_phase, 90.0 + 1.5 * n as f32);
    }

    #[test]
    fn wraps_exactly_when_crossing_threshold() {
        let mut sub = Submarine {
            speed: 0.25,
            ..Submarine::default()
        };
        sub.position.x = -15.5;

        assert!(!sub.tick());
        assert_eq!(sub.position.x, -15.75);
        // Landing exactly on the threshold is not a crossing
        assert!(!sub.tick());
        assert_eq!(sub.position.x, -16.0);

        assert!(sub.tick());
        assert_eq!(sub.position.x, WRAP_RESET);

        sub.tick();
        assert_eq!(sub.position.x, WRAP_RESET - 0.25);
    }

    #[test]
    fn altitude_ceiling_resets_to_floor() {
        let mut sub = Submarine::default();
        sub.position.y = 16.25;
        assert!(sub.tick());
        assert_eq!(sub.position.y, WRAP_THRESHOLD);
    }

    #[test]
    fn horizontal_wrap_takes_precedence_over_ceiling() {
        let mut sub = Submarine::default();
        sub.position = Vec3::new(-15.99, 17.0, 0.0);
        sub.tick();
        assert_eq!(sub.position.x, WRAP_RESET);
        assert_eq!(sub.position.y, 17.0);
    }

    #[test]
    fn propeller_phase_is_unbounded() {
        let mut sub = Submarine::default();
        for _ in 0..1000 {
            sub.tick();
        }
        assert_eq!(sub.prop_phase, 90.0 + 1500.0);
    }

    #[test]
    fn page_up_is_capped() {
        let mut sub = Submarine::default();
        for _ in 0..20 {
            sub.apply_key(SceneKey::PageUp);
            assert!(sub.speed <= SPEED_MAX + 1e-4);
        }
        assert!((sub.speed - SPEED_MAX).abs() < 1e-4);
        assert!((sub.prop_speed - 3.0).abs() < 1e-4);
        assert!(!sub.apply_key(SceneKey::PageUp));
    }

    #[test]
    fn page_down_stops_at_floor() {
        let mut sub = Submarine {
            speed: 0.2,
            prop_speed: 2.5,
            ..Submarine::default()
        };
        for _ in 0..10 {
            sub.apply_key(SceneKey::PageDown);
            assert!(sub.speed >= SPEED_MIN - 1e-4);
        }
        assert!((sub.speed - SPEED_MIN).abs() < 1e-4);
        assert!((sub.prop_speed - 1.5).abs() < 1e-4);
    }

    #[test]
    fn page_down_below_floor_is_ignored() {
        let mut sub = Submarine::default();
        assert!(!sub.apply_key(SceneKey::PageDown));
        assert_eq!(sub.speed, 0.05);
        assert_eq!(sub.prop_speed, 1.0);
    }

    #[test]
    fn speed_and_prop_speed_move_together() {
        let mut sub = Submarine::default();
        assert!(sub.apply_key(SceneKey::PageUp));
        assert!((sub.speed - 0.075).abs() < 1e-6);
        assert!((sub.prop_speed - 1.25).abs() < 1e-6);
    }

    #[test]
    fn arrows_change_altitude_and_heading() {
        let mut sub = Submarine::default();
        sub.apply_key(SceneKey::Up);
        sub.apply_key(SceneKey::Up);
        sub.apply_key(SceneKey::Down);
        sub.apply_key(SceneKey::Left);
        sub.apply_key(SceneKey::Right);
        sub.apply_key(SceneKey::Right);

        assert_eq!(sub.position.y, 5.25);
        assert_eq!(sub.heading, -5.0);
    }

    #[test]
    fn draw_emits_all_parts() {
        let sub = Submarine::default();
        let mut stack = TransformStack::new();
        let mut list = DrawList::new();
        sub.draw(&mut stack, &mut list);

        let count = |shape| list.items().iter().filter(|i| i.shape == shape).count();
        assert_eq!(count(Shape::SolidSphere), 1);
        assert_eq!(count(Shape::SolidCube), 2 + 4 + 4 + 1);
        assert_eq!(count(Shape::WireSphere), 2);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn hull_follows_position_and_heading() {
        let mut sub = Submarine::default();
        sub.position = Vec3::new(4.0, 5.0, 0.0);
        sub.heading = 90.0;

        let mut list = DrawList::new();
        sub.draw(&mut TransformStack::new(), &mut list);

        let hull = list.items()[0];
        assert_eq!(hull.shape, Shape::SolidSphere);
        let centre = hull.model.transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(0.0, 5.0, -4.0), 1e-4));
    }

    #[test]
    fn blades_turn_with_phase() {
        let sub = Submarine {
            prop_phase: 0.0,
            ..Submarine::default()
        };
        let turned = Submarine {
            prop_phase: 90.0,
            ..Submarine::default()
        };

        let blade_tip = |s: &Submarine| {
            let mut list = DrawList::new();
            s.draw(&mut TransformStack::new(), &mut list);
            list.items()[1].model.transform_point3(Vec3::new(0.0, 0.5, 0.0))
        };

        let still = blade_tip(&sub) - Vec3::new(3.0, 5.0, 0.0);
        let spun = blade_tip(&turned) - Vec3::new(3.0, 5.0, 0.0);
        assert!(still.abs_diff_eq(Vec3::new(0.0, 0.875, 0.0), 1e-4));
        assert!(spun.abs_diff_eq(Vec3::new(0.0, 0.0, 0.875), 1e-4));
    }
}
