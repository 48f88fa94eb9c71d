use nalgebra::{Point3, Vector3};

use crate::gfx::TextureHandle;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// The body at the center of the scene. It never moves or spins.
#[derive(Debug, Clone)]
pub struct PrimaryBody {
    pub name: String,
    pub radius: f32,
    pub texture: TextureHandle,
}

/// A body on a fixed elliptical path around its parent (or the primary).
///
/// Orbits here are configuration, not physics: the semi-axes and angular
/// speeds are picked to look right, and the path is centered on the parent
/// rather than having it at a focus.
#[derive(Debug, Clone)]
pub struct OrbitingBody {
    pub name: String,
    pub radius: f32,
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Radians of orbital phase per second, negative for clockwise.
    pub orbit_speed: f64,
    /// Radians of spin per second, negative for clockwise.
    pub spin_speed: f64,
    pub texture: TextureHandle,
    pub parent: Option<BodyID>,
}

impl OrbitingBody {
    /// Offset from the orbit's center at time `t`.
    pub fn offset_at(&self, t: f64) -> Vector3<f64> {
        let phase = t * self.orbit_speed;
        Vector3::new(
            self.semi_major * phase.cos(),
            self.semi_minor * phase.sin(),
            0.0,
        )
    }

    /// World position at time `t`, given where the orbit's center is at that
    /// same time.
    pub fn position_of(&self, parent_world: &Point3<f64>, t: f64) -> Point3<f64> {
        parent_world + self.offset_at(t)
    }

    /// Spin angle about +z at time `t`. Not reduced mod 2pi.
    pub fn spin_at(&self, t: f64) -> f64 {
        t * self.spin_speed
    }
}
