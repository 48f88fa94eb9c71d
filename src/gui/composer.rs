use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point3, Vector3};

use super::camera::FlyCamera;
use crate::config::RenderConfig;
use crate::gfx::{Geometry, GraphicsBackend, Primitive, Program, Uniform};
use crate::model::SolarSystem;

/// Sizes of the static buffers the composer draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryCounts {
    pub disc_vertices: usize,
    pub outline_vertices: usize,
    pub sphere_indices: usize,
}

/// Turns the state of the scene at one instant into an ordered list of draw
/// calls.
///
/// Order within a frame:
/// 1. orbit outlines (if enabled), one line loop per body, translated to the
///    parent's position of this frame for satellites
/// 2. the primary, at the origin
/// 3. every orbiting body, in table order
///
/// Projection and view are set once per program, not per draw.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    counts: GeometryCounts,
    show_orbits: bool,
    primary_as_sphere: bool,
    outline_color: Vector3<f32>,
    outline_intensity: f32,
}

impl SceneComposer {
    pub fn new(config: &RenderConfig, counts: GeometryCounts) -> Self {
        let [r, g, b] = config.outline_color;
        SceneComposer {
            counts,
            show_orbits: config.show_orbits,
            primary_as_sphere: config.primary_as_sphere,
            outline_color: Vector3::new(r, g, b),
            outline_intensity: config.outline_intensity,
        }
    }

    pub fn show_orbits(&self) -> bool {
        self.show_orbits
    }

    pub fn toggle_orbits(&mut self) {
        self.show_orbits = !self.show_orbits;
        log::debug!(
            "Orbit outlines {}",
            if self.show_orbits { "on" } else { "off" }
        );
    }

    pub fn compose_frame<B: GraphicsBackend>(
        &self,
        system: &SolarSystem,
        camera: &FlyCamera,
        time: f64,
        backend: &mut B,
    ) {
        let projection = camera.projection_matrix(camera.aspect());
        let view = camera.view_matrix();

        // Every satellite reads its parent's position from here, so they are
        // all resolved before anything is drawn.
        let positions = system.world_positions(time);

        if self.show_orbits {
            self.draw_orbits(system, &positions, &projection, &view, backend);
        }

        backend.use_program(Program::Textured);
        backend.set_uniform("projection", Uniform::Mat4(projection));
        backend.set_uniform("view", Uniform::Mat4(view));

        let primary = system.primary();
        backend.bind_texture(primary.texture);
        let primary_scale = Matrix4::new_scaling(primary.radius);
        if self.primary_as_sphere {
            // Tip the pole from +z to +y, so the camera sees the equator
            let tilt = Matrix4::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
            backend.set_uniform("model", Uniform::Mat4(primary_scale * tilt));
            backend.draw(
                Geometry::Sphere,
                Primitive::Triangles,
                self.counts.sphere_indices,
            );
        } else {
            backend.set_uniform("model", Uniform::Mat4(primary_scale));
            backend.draw(
                Geometry::Disc,
                Primitive::TriangleFan,
                self.counts.disc_vertices,
            );
        }

        for (body, position) in system.bodies().iter().zip(positions.iter()) {
            let model = body_transform(position, body.spin_at(time), body.radius);
            backend.bind_texture(body.texture);
            backend.set_uniform("model", Uniform::Mat4(model));
            backend.draw(
                Geometry::Disc,
                Primitive::TriangleFan,
                self.counts.disc_vertices,
            );
        }
    }

    fn draw_orbits<B: GraphicsBackend>(
        &self,
        system: &SolarSystem,
        positions: &[Point3<f64>],
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        backend: &mut B,
    ) {
        backend.use_program(Program::Outline);
        backend.set_uniform("projection", Uniform::Mat4(*projection));
        backend.set_uniform("view", Uniform::Mat4(*view));
        backend.set_uniform("color", Uniform::Vec3(self.outline_color));
        backend.set_uniform("intensity", Uniform::Float(self.outline_intensity));

        for body in system.bodies() {
            let center = system.orbit_center_in(positions, body);
            let model = orbit_transform(&center, body.semi_major, body.semi_minor);
            backend.set_uniform("model", Uniform::Mat4(model));
            backend.draw(
                Geometry::Outline,
                Primitive::LineLoop,
                self.counts.outline_vertices,
            );
        }
    }
}

/// `translate(position) * rotate_z(spin) * scale(radius)`
pub fn body_transform(position: &Point3<f64>, spin: f64, radius: f32) -> Matrix4<f32> {
    let position: Point3<f32> = nalgebra::convert(*position);
    Matrix4::new_translation(&position.coords)
        * Matrix4::from_axis_angle(&Vector3::z_axis(), spin as f32)
        * Matrix4::new_scaling(radius)
}

/// Maps the unit circle onto an orbit's ellipse around `center`.
pub fn orbit_transform(center: &Point3<f64>, semi_major: f64, semi_minor: f64) -> Matrix4<f32> {
    let center: Point3<f32> = nalgebra::convert(*center);
    Matrix4::new_translation(&center.coords)
        * Matrix4::new_nonuniform_scaling(&Vector3::new(semi_major as f32, semi_minor as f32, 1.0))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_body_transform() {
        let model = body_transform(&Point3::new(1.0, 2.0, 0.0), PI / 2.0, 0.5);

        // Center goes to the body's position
        let center = model.transform_point(&Point3::origin());
        assert_abs_diff_eq!(center, Point3::new(1.0, 2.0, 0.0), epsilon = 1e-6);

        // The rim point at angle 0 is scaled, then turned a quarter
        let rim = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(rim, Point3::new(1.0, 2.5, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_orbit_transform() {
        let model = orbit_transform(&Point3::new(0.45, 0.0, 0.0), 0.10, 0.07);
        let rim = model.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(rim, Point3::new(0.45, 0.07, 0.0), epsilon = 1e-6);
        let rim = model.transform_point(&Point3::new(-1.0, 0.0, 0.0));
        assert_abs_diff_eq!(rim, Point3::new(0.35, 0.0, 0.0), epsilon = 1e-6);
    }
}
