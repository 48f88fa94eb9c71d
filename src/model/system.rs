use std::collections::HashMap;

use nalgebra::Point3;

use super::body::{BodyID, OrbitingBody, PrimaryBody};
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::gfx::{TextureHandle, TextureLoader};

/// The fixed table of bodies in the scene.
///
/// Invariant: a body's parent always has a smaller index than the body itself.
/// This rules out cycles and lets positions be resolved in a single forward
/// pass.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    primary: PrimaryBody,
    bodies: Vec<OrbitingBody>,
}

impl SolarSystem {
    pub fn new(primary: PrimaryBody) -> Self {
        SolarSystem {
            primary,
            bodies: vec![],
        }
    }

    /// Builds the scene described by `config`, loading textures as it goes.
    /// Textures that fail to load are logged and replaced by the placeholder.
    pub fn build(
        config: &SceneConfig,
        textures: &mut dyn TextureLoader,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut load = |name: &str, path: &std::path::Path| match textures.load(path) {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("{}: {}; drawing it with the placeholder texture", name, err);
                TextureHandle::PLACEHOLDER
            }
        };

        let primary = PrimaryBody {
            name: config.primary.name.clone(),
            radius: config.primary.radius,
            texture: load(&config.primary.name, &config.primary.texture),
        };
        let mut system = SolarSystem::new(primary);

        let mut name_to_id = HashMap::new();
        for body in config.bodies.0.iter() {
            // Naming the primary as parent is the same as naming no parent.
            let parent = match &body.parent {
                Some(parent) if *parent != config.primary.name => {
                    match name_to_id.get(parent.as_str()) {
                        Some(&id) => Some(id),
                        None => {
                            return Err(ConfigError::UnknownParent {
                                body: body.name.clone(),
                                parent: parent.clone(),
                            })
                        }
                    }
                }
                _ => None,
            };

            let id = system.add_body(OrbitingBody {
                name: body.name.clone(),
                radius: body.radius,
                semi_major: body.semi_major,
                semi_minor: body.semi_minor,
                orbit_speed: body.orbit_speed,
                spin_speed: body.spin_speed,
                texture: load(&body.name, &body.texture),
                parent,
            });
            name_to_id.insert(body.name.as_str(), id);
        }

        log::info!(
            "Built scene around {} with {} orbiting bodies",
            system.primary.name,
            system.bodies.len()
        );
        Ok(system)
    }

    /// Appends a body to the table. Its parent must already be in the table.
    pub fn add_body(&mut self, body: OrbitingBody) -> BodyID {
        let id = BodyID(self.bodies.len());
        if let Some(parent) = body.parent {
            assert!(
                parent < id,
                "Body {} orbits {:?}, which has not been added yet",
                body.name,
                parent
            );
        }
        self.bodies.push(body);
        id
    }

    pub fn primary(&self) -> &PrimaryBody {
        &self.primary
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn get_body(&self, id: BodyID) -> &OrbitingBody {
        &self.bodies[id.0]
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.bodies.iter().position(|b| b.name == name).map(BodyID)
    }

    /// World position of every body at time `t`, indexed like `bodies()`.
    pub fn world_positions(&self, t: f64) -> Vec<Point3<f64>> {
        let mut positions: Vec<Point3<f64>> = Vec::with_capacity(self.bodies.len());
        for body in self.bodies.iter() {
            let center = self.orbit_center_in(&positions, body);
            positions.push(body.position_of(&center, t));
        }
        positions
    }

    /// Center of `body`'s orbit, looked up in positions computed for the same
    /// frame.
    pub fn orbit_center_in(&self, positions: &[Point3<f64>], body: &OrbitingBody) -> Point3<f64> {
        match body.parent {
            Some(parent) => positions[parent.0],
            None => Point3::origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::TextureError;

    /// Hands out sequential handles, failing for any path containing "missing".
    struct FakeTextures {
        loaded: Vec<String>,
    }

    impl TextureLoader for FakeTextures {
        fn load(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
            let path_str = path.to_string_lossy().into_owned();
            if path_str.contains("missing") {
                return Err(TextureError::Read {
                    path: path.to_owned(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                });
            }
            self.loaded.push(path_str);
            Ok(TextureHandle(self.loaded.len()))
        }
    }

    fn default_system() -> SolarSystem {
        let mut textures = FakeTextures { loaded: vec![] };
        SolarSystem::build(&SceneConfig::default(), &mut textures).unwrap()
    }

    #[test]
    fn test_build_default_scene() {
        let system = default_system();
        assert_eq!(system.primary().name, "Sun");
        assert_eq!(system.bodies().len(), 9);

        let earth = system.find_body("Earth").unwrap();
        let moon = system.find_body("Moon").unwrap();
        assert_eq!(system.get_body(moon).parent, Some(earth));
        assert!(system.bodies().iter().all(|b| !b.texture.is_placeholder()));
    }

    #[test]
    fn test_missing_texture_uses_placeholder() {
        let mut config = SceneConfig::default();
        config.bodies.0[1].texture = "textures/missing.jpg".into();

        let mut textures = FakeTextures { loaded: vec![] };
        let system = SolarSystem::build(&config, &mut textures).unwrap();

        assert!(system.bodies()[1].texture.is_placeholder());
        assert!(!system.bodies()[0].texture.is_placeholder());
        assert!(!system.bodies()[2].texture.is_placeholder());
        assert_eq!(textures.loaded.len(), 9);
    }

    #[test]
    fn test_moon_follows_earth() {
        let system = default_system();
        let earth = system.find_body("Earth").unwrap();
        let moon = system.find_body("Moon").unwrap();

        let mut unparented_moon = system.get_body(moon).clone();
        unparented_moon.parent = None;

        for i in 0..100 {
            let t = 0.1 * i as f64;
            let positions = system.world_positions(t);
            let expected = system.get_body(earth).position_of(&Point3::origin(), t)
                + unparented_moon.position_of(&Point3::origin(), t).coords;
            assert_relative_eq!(positions[moon.0], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_positions_reproducible() {
        let system = default_system();
        assert_eq!(system.world_positions(42.5), system.world_positions(42.5));
    }

    #[test]
    fn test_primary_as_parent_means_origin() {
        let mut config = SceneConfig::default();
        config.bodies.0[0].parent = Some("Sun".to_owned());

        let mut textures = FakeTextures { loaded: vec![] };
        let system = SolarSystem::build(&config, &mut textures).unwrap();
        assert_eq!(system.bodies()[0].parent, None);
    }

    #[test]
    #[should_panic]
    fn test_parent_must_exist() {
        let mut system = SolarSystem::new(PrimaryBody {
            name: "Sun".to_owned(),
            radius: 0.15,
            texture: TextureHandle::PLACEHOLDER,
        });
        system.add_body(OrbitingBody {
            name: "Orphan".to_owned(),
            radius: 0.1,
            semi_major: 1.0,
            semi_minor: 1.0,
            orbit_speed: 1.0,
            spin_speed: 1.0,
            texture: TextureHandle::PLACEHOLDER,
            parent: Some(BodyID(0)),
        });
    }
}
