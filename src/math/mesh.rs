//! Static meshes shared by every body in the scene.
//!
//! Everything here is unit-sized and lies around the origin. Per-body sizes,
//! positions and orbit semi-axes are applied by the model matrix at draw time,
//! so each mesh is uploaded once and reused for the whole run.

use std::f32::consts::PI;

use nalgebra::{Point2, Point3};

use super::utils::unit_circle;

/// Triangle-fan disc: a center vertex followed by a closed rim.
#[derive(Debug, Clone)]
pub struct DiscMesh {
    pub positions: Vec<Point3<f32>>,
    pub tex_coords: Vec<Point2<f32>>,
}

impl DiscMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Indexed UV sphere with its pole along z. Since the radius is 1, each
/// position is also the outward normal at that vertex.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<Point3<f32>>,
    pub tex_coords: Vec<Point2<f32>>,
    pub indices: Vec<Point3<u16>>,
}

impl SphereMesh {
    /// Number of indices to hand to an indexed triangle draw.
    pub fn index_count(&self) -> usize {
        3 * self.indices.len()
    }
}

/// Unit disc for billboards, `segments + 2` vertices in triangle-fan order.
///
/// The texture square is mapped onto the disc, so a round planet texture
/// centered in its image lines up with the rim.
pub fn generate_disc(segments: usize) -> DiscMesh {
    let mut positions = Vec::with_capacity(segments + 2);
    let mut tex_coords = Vec::with_capacity(segments + 2);

    positions.push(Point3::origin());
    tex_coords.push(Point2::new(0.5, 0.5));

    for pt in unit_circle(segments) {
        positions.push(pt);
        tex_coords.push(Point2::new(0.5 + 0.5 * pt.x, 0.5 + 0.5 * pt.y));
    }

    DiscMesh {
        positions,
        tex_coords,
    }
}

/// Rim of the unit circle, `segments + 1` points, for drawing as a line loop.
pub fn generate_ellipse_outline(segments: usize) -> Vec<Point3<f32>> {
    unit_circle(segments).collect()
}

pub fn generate_sphere(sectors: usize, stacks: usize) -> SphereMesh {
    assert!(
        sectors >= 1 && stacks >= 2,
        "Sphere needs at least 1 sector and 2 stacks, got {} and {}",
        sectors,
        stacks
    );
    let num_vertices = (stacks + 1) * (sectors + 1);
    assert!(
        num_vertices <= u16::MAX as usize + 1,
        "Sphere has too many vertices for 16-bit indices: {}",
        num_vertices
    );

    let sector_step = 2.0 * PI / sectors as f32;
    let stack_step = PI / stacks as f32;

    let mut positions = Vec::with_capacity(num_vertices);
    let mut tex_coords = Vec::with_capacity(num_vertices);
    for i in 0..=stacks {
        // From +pi/2 (north pole) down to -pi/2
        let stack_angle = PI / 2.0 - i as f32 * stack_step;
        let xy = stack_angle.cos();
        let z = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            positions.push(Point3::new(
                xy * sector_angle.cos(),
                xy * sector_angle.sin(),
                z,
            ));
            tex_coords.push(Point2::new(
                j as f32 / sectors as f32,
                i as f32 / stacks as f32,
            ));
        }
    }

    // The top and bottom stacks collapse to a single triangle per sector.
    let mut indices = Vec::with_capacity(sectors * (2 * stacks - 2));
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            if i != 0 {
                indices.push(Point3::new(k1 as u16, k2 as u16, (k1 + 1) as u16));
            }
            if i != stacks - 1 {
                indices.push(Point3::new((k1 + 1) as u16, k2 as u16, (k2 + 1) as u16));
            }
            k1 += 1;
            k2 += 1;
        }
    }

    SphereMesh {
        positions,
        tex_coords,
        indices,
    }
}
