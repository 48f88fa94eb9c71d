//! Scene configuration.
//!
//! The built-in defaults are the full scene, so the viewer runs without any
//! file or flag. A RON file (see `solar-system.ron`) can replace any part of
//! it, and a few command-line flags override the result.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Command-line arguments. Everything is optional.
#[derive(Parser, Debug, Default)]
#[command(name = "rust-orrery", about = "Textured solar system viewer")]
pub struct CliArgs {
    /// RON scene file to load instead of the built-in scene.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start with orbit outlines hidden.
    #[arg(long)]
    pub no_orbits: bool,

    /// Use the flat orthographic camera instead of the perspective one.
    #[arg(long)]
    pub orthographic: bool,

    /// Default log filter (error, warn, info, debug, trace). RUST_LOG wins.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub primary: PrimaryConfig,
    pub bodies: BodyList,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraMode {
    Perspective,
    /// Fixed half-height of 1, half-width follows the aspect ratio.
    Orthographic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    pub position: [f32; 3],
    /// Degrees. -90 looks down -z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    /// Degrees of rotation per pixel of mouse drag.
    pub sensitivity: f32,
    /// World units per movement key press.
    pub move_step: f32,
    /// Whether mouse drags rotate the camera.
    pub free_look: bool,
    pub z_near: f32,
    pub z_far: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub disc_segments: usize,
    pub outline_segments: usize,
    pub show_orbits: bool,
    /// Draw the primary as a textured sphere instead of a flat disc.
    pub primary_as_sphere: bool,
    pub sphere_sectors: usize,
    pub sphere_stacks: usize,
    pub outline_color: [f32; 3],
    pub outline_intensity: f32,
    pub background: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrimaryConfig {
    pub name: String,
    pub radius: f32,
    pub texture: PathBuf,
}

/// Bodies are listed so that a parent always comes before its satellites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BodyList(pub Vec<BodyConfig>);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub radius: f32,
    pub semi_major: f64,
    pub semi_minor: f64,
    pub orbit_speed: f64,
    pub spin_speed: f64,
    pub texture: PathBuf,
    #[serde(default)]
    pub parent: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1280,
            height: 720,
            title: "Realistic Solar System".to_owned(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            mode: CameraMode::Perspective,
            position: [0.0, 0.0, 3.5],
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            fov_min: 15.0,
            fov_max: 90.0,
            sensitivity: 0.1,
            move_step: 0.1,
            free_look: true,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            disc_segments: 100,
            outline_segments: 100,
            show_orbits: true,
            primary_as_sphere: false,
            sphere_sectors: 36,
            sphere_stacks: 18,
            outline_color: [0.5, 0.5, 0.5],
            outline_intensity: 1.0,
            background: [0.02, 0.02, 0.08],
        }
    }
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        PrimaryConfig {
            name: "Sun".to_owned(),
            radius: 0.15,
            texture: PathBuf::from("textures/2k_sun.jpg"),
        }
    }
}

impl Default for BodyList {
    fn default() -> Self {
        fn body(
            name: &str,
            (radius, semi_major, semi_minor): (f32, f64, f64),
            (orbit_speed, spin_speed): (f64, f64),
            texture: &str,
            parent: Option<&str>,
        ) -> BodyConfig {
            BodyConfig {
                name: name.to_owned(),
                radius,
                semi_major,
                semi_minor,
                orbit_speed,
                spin_speed,
                texture: Path::new("textures").join(texture),
                parent: parent.map(str::to_owned),
            }
        }

        BodyList(vec![
            body("Mercury", (0.05, 0.25, 0.20), (1.60, 4.0), "2k_mercury.jpg", None),
            body("Venus", (0.06, 0.35, 0.30), (1.20, 3.8), "2k_venus_surface.jpg", None),
            body("Earth", (0.07, 0.45, 0.40), (1.00, 3.0), "2k_earth_daymap.jpg", None),
            body("Moon", (0.025, 0.10, 0.07), (5.0, 3.0), "moon.jpg", Some("Earth")),
            body("Mars", (0.06, 0.60, 0.50), (0.80, 2.8), "2k_mars.jpg", None),
            body("Jupiter", (0.12, 0.80, 0.70), (0.60, 2.6), "2k_jupiter.jpg", None),
            body("Saturn", (0.10, 1.00, 0.90), (0.45, 2.4), "2k_saturn.jpg", None),
            body("Uranus", (0.09, 1.15, 1.05), (0.35, 2.2), "2k_uranus.jpg", None),
            body("Neptune", (0.08, 1.30, 1.20), (0.25, 2.0), "2k_neptune.jpg", None),
        ])
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = ron::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if args.no_orbits {
            self.render.show_orbits = false;
        }
        if args.orthographic {
            self.camera.mode = CameraMode::Orthographic;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_camera()?;

        if !(self.primary.radius.is_finite() && self.primary.radius > 0.0) {
            return Err(ConfigError::InvalidBody {
                body: self.primary.name.clone(),
                reason: format!("radius must be positive, got {}", self.primary.radius),
            });
        }

        let mut seen = HashSet::new();
        seen.insert(self.primary.name.as_str());
        for body in self.bodies.0.iter() {
            let invalid = |reason: String| ConfigError::InvalidBody {
                body: body.name.clone(),
                reason,
            };

            if !(body.radius.is_finite() && body.radius > 0.0) {
                return Err(invalid(format!(
                    "radius must be positive, got {}",
                    body.radius
                )));
            }
            for (label, axis) in [("semi_major", body.semi_major), ("semi_minor", body.semi_minor)] {
                if !(axis.is_finite() && axis > 0.0) {
                    return Err(invalid(format!("{} must be positive, got {}", label, axis)));
                }
            }
            for (label, speed) in [("orbit_speed", body.orbit_speed), ("spin_speed", body.spin_speed)]
            {
                if !speed.is_finite() {
                    return Err(invalid(format!("{} must be finite, got {}", label, speed)));
                }
            }

            // The primary counts as a valid parent name but is the implicit
            // center anyway.
            if let Some(parent) = &body.parent {
                if !seen.contains(parent.as_str()) {
                    return Err(ConfigError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if !seen.insert(body.name.as_str()) {
                return Err(invalid("name is used more than once".to_owned()));
            }
        }

        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if render.disc_segments < 1 || render.outline_segments < 1 {
            return Err(ConfigError::InvalidMesh(format!(
                "need at least one segment, got disc {} and outline {}",
                render.disc_segments, render.outline_segments
            )));
        }
        if render.sphere_sectors < 1 || render.sphere_stacks < 2 {
            return Err(ConfigError::InvalidMesh(format!(
                "sphere needs at least 1 sector and 2 stacks, got {} and {}",
                render.sphere_sectors, render.sphere_stacks
            )));
        }
        let sphere_vertices = (render.sphere_sectors + 1) * (render.sphere_stacks + 1);
        if sphere_vertices > u16::MAX as usize + 1 {
            return Err(ConfigError::InvalidMesh(format!(
                "sphere has {} vertices, more than 16-bit indices can address",
                sphere_vertices
            )));
        }
        Ok(())
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_min > 0.0 && camera.fov_min <= camera.fov_max && camera.fov_max < 180.0) {
            return Err(ConfigError::InvalidCamera(format!(
                "field of view bounds [{}, {}] must lie within (0, 180)",
                camera.fov_min, camera.fov_max
            )));
        }
        if !(camera.z_near > 0.0 && camera.z_near < camera.z_far) {
            return Err(ConfigError::InvalidCamera(format!(
                "clip planes must satisfy 0 < near < far, got {} and {}",
                camera.z_near, camera.z_far
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.bodies.0.len(), 9);
        assert_eq!(config.bodies.0[3].parent.as_deref(), Some("Earth"));
    }

    #[test]
    fn test_shipped_file_matches_defaults() {
        let config = SceneConfig::from_ron_str(include_str!("../solar-system.ron")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SceneConfig::from_ron_str(
            "(window: (width: 800), render: (show_orbits: false))",
        )
        .unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert!(!config.render.show_orbits);
        assert_eq!(config.bodies, BodyList::default());
    }

    #[test]
    fn test_custom_bodies() {
        let config = SceneConfig::from_ron_str(
            r#"(
                bodies: [
                    (
                        name: "Planet",
                        radius: 0.1,
                        semi_major: 1.0,
                        semi_minor: 0.5,
                        orbit_speed: -2.0,
                        spin_speed: 0.0,
                        texture: "planet.png",
                    ),
                    (
                        name: "Satellite",
                        radius: 0.01,
                        semi_major: 0.2,
                        semi_minor: 0.2,
                        orbit_speed: 4.0,
                        spin_speed: 1.0,
                        texture: "satellite.png",
                        parent: Some("Planet"),
                    ),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(config.bodies.0.len(), 2);
        assert_eq!(config.bodies.0[0].parent, None);
        assert_eq!(config.bodies.0[1].parent.as_deref(), Some("Planet"));
    }

    #[test]
    fn test_parent_must_come_first() {
        let mut config = SceneConfig::default();
        config.bodies.0.swap(2, 3); // Moon before Earth
        match config.validate() {
            Err(ConfigError::UnknownParent { body, parent }) => {
                assert_eq!(body, "Moon");
                assert_eq!(parent, "Earth");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_bodies() {
        let mut config = SceneConfig::default();
        config.bodies.0[0].radius = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBody { .. })));

        let mut config = SceneConfig::default();
        config.bodies.0[1].orbit_speed = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBody { .. })));

        let mut config = SceneConfig::default();
        config.bodies.0[4].name = "Earth".to_owned();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBody { .. })));
    }

    #[test]
    fn test_rejects_bad_meshes_and_camera() {
        let mut config = SceneConfig::default();
        config.render.disc_segments = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMesh(_))));

        let mut config = SceneConfig::default();
        config.render.sphere_sectors = 1000;
        config.render.sphere_stacks = 1000;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMesh(_))));

        let mut config = SceneConfig::default();
        config.camera.fov_min = 100.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCamera(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SceneConfig::from_ron_str("(window: (width: \"wide\"))"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = SceneConfig::load(Path::new("does/not/exist.ron"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_cli_override() {
        let mut config = SceneConfig::default();
        let args = CliArgs {
            width: Some(1920),
            no_orbits: true,
            orthographic: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 720);
        assert!(!config.render.show_orbits);
        assert_eq!(config.camera.mode, CameraMode::Orthographic);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = SceneConfig::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["rust-orrery", "--no-orbits", "--height", "600"]);
        assert!(args.no_orbits);
        assert_eq!(args.height, Some(600));
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
    }
}
