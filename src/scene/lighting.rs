use glam::Vec3;

/// Surface response to lighting, applied per draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Orange hull paint.
    pub const SUBMARINE: Material = Material::new(
        Vec3::new(0.4, 0.2, 0.0),
        Vec3::new(0.9, 0.5, 0.0),
        Vec3::new(0.1, 0.1, 0.0),
        0.0,
    );

    /// Grassy seabed.
    pub const GROUND: Material = Material::new(
        Vec3::new(0.0, 0.05, 0.0),
        Vec3::new(0.4, 0.8, 0.4),
        Vec3::new(0.04, 0.04, 0.04),
        0.2,
    );
}

impl Default for Material {
    /// Fixed-function default: grey ambient and diffuse, no specular.
    fn default() -> Self {
        Self::new(Vec3::splat(0.2), Vec3::splat(0.8), Vec3::ZERO, 0.0)
    }
}

/// Positional light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub enabled: bool,
}

impl Light {
    pub fn white(position: Vec3, enabled: bool) -> Self {
        Self {
            position,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            enabled,
        }
    }
}

/// Scene-wide ambient term added regardless of light sources.
pub const GLOBAL_AMBIENT: Vec3 = Vec3::splat(0.2);

/// The two overhead lights. The second one is configured but only lit on request.
pub fn scene_lights(second_light: bool) -> [Light; 2] {
    [
        Light::white(Vec3::new(-6.0, 12.0, 0.0), true),
        Light::white(Vec3::new(6.0, 12.0, 0.0), second_light),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_light_is_off_unless_requested() {
        let lights = scene_lights(false);
        assert!(lights[0].enabled);
        assert!(!lights[1].enabled);
        assert!(scene_lights(true)[1].enabled);
    }

    #[test]
    fn lights_sit_symmetrically_overhead() {
        let [left, right] = scene_lights(true);
        assert_eq!(left.position.x, -right.position.x);
        assert_eq!(left.position.y, 12.0);
        assert_eq!(right.position.y, 12.0);
    }
}
