use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{AllocationType, BufferType, GPUVec};
use nalgebra::{Point2, Point3};

use self::programs::{GlProgram, Programs};
use self::textures::TextureTable;
use super::composer::GeometryCounts;
use crate::config::RenderConfig;
use crate::error::InitError;
use crate::gfx::{CommandRecorder, DrawCommand, Geometry, Primitive, Program};
use crate::math::mesh::{generate_disc, generate_ellipse_outline, generate_sphere};

mod programs;
mod textures;

// GL enums kiss3d's context doesn't name
const GL_LINE_LOOP: u32 = 0x0002;
const GL_TRIANGLE_FAN: u32 = 0x0006;
const GL_UNSIGNED_SHORT: u32 = 0x1403;

struct StaticBuffers {
    disc_positions: GPUVec<Point3<f32>>,
    disc_tex_coords: GPUVec<Point2<f32>>,
    outline_positions: GPUVec<Point3<f32>>,
    sphere_positions: GPUVec<Point3<f32>>,
    sphere_tex_coords: GPUVec<Point2<f32>>,
    sphere_indices: GPUVec<Point3<u16>>,
}

impl StaticBuffers {
    fn upload(config: &RenderConfig) -> (Self, GeometryCounts) {
        fn upload<T: kiss3d::resource::GLPrimitive>(data: Vec<T>, kind: BufferType) -> GPUVec<T> {
            GPUVec::new(data, kind, AllocationType::StaticDraw)
        }

        let disc = generate_disc(config.disc_segments);
        let outline = generate_ellipse_outline(config.outline_segments);
        let sphere = generate_sphere(config.sphere_sectors, config.sphere_stacks);

        let counts = GeometryCounts {
            disc_vertices: disc.vertex_count(),
            outline_vertices: outline.len(),
            sphere_indices: sphere.index_count(),
        };
        let buffers = StaticBuffers {
            disc_positions: upload(disc.positions, BufferType::Array),
            disc_tex_coords: upload(disc.tex_coords, BufferType::Array),
            outline_positions: upload(outline, BufferType::Array),
            sphere_positions: upload(sphere.positions, BufferType::Array),
            sphere_tex_coords: upload(sphere.tex_coords, BufferType::Array),
            sphere_indices: upload(sphere.indices, BufferType::ElementArray),
        };
        (buffers, counts)
    }

    fn bind(&mut self, program: &mut GlProgram, geometry: Geometry) {
        let (positions, tex_coords) = match geometry {
            Geometry::Disc => (&mut self.disc_positions, Some(&mut self.disc_tex_coords)),
            Geometry::Outline => (&mut self.outline_positions, None),
            Geometry::Sphere => {
                self.sphere_indices.bind();
                (
                    &mut self.sphere_positions,
                    Some(&mut self.sphere_tex_coords),
                )
            }
        };

        program.position.bind_sub_buffer(positions, 0, 0);
        if let (Some(attrib), Some(buffer)) = (&mut program.tex_coord, tex_coords) {
            attrib.bind_sub_buffer(buffer, 0, 0);
        }
    }
}

/// Flat geometry is layered in draw order. The sphere overlaps itself, so its
/// far side has to be hidden by depth.
fn needs_depth_test(geometry: Geometry) -> bool {
    match geometry {
        Geometry::Sphere => true,
        Geometry::Disc | Geometry::Outline => false,
    }
}

/// Plays back the frame the composer recorded, inside kiss3d's render pass.
///
/// Fields drop in declaration order, so GPU buffers go first, then textures,
/// then shader programs.
pub struct GlRenderer {
    buffers: StaticBuffers,
    textures: TextureTable,
    programs: Programs,
    counts: GeometryCounts,
    frame: CommandRecorder,
}

impl GlRenderer {
    /// Needs a live GL context, i.e. a kiss3d window must exist already.
    pub fn new(config: &RenderConfig) -> Result<Self, InitError> {
        let programs = Programs::compile()?;
        let (buffers, counts) = StaticBuffers::upload(config);
        log::info!(
            "Uploaded static geometry: disc {} vertices, outline {} vertices, sphere {} indices",
            counts.disc_vertices,
            counts.outline_vertices,
            counts.sphere_indices
        );

        Ok(GlRenderer {
            buffers,
            textures: TextureTable::new(),
            programs,
            counts,
            frame: CommandRecorder::new(),
        })
    }

    pub fn geometry_counts(&self) -> GeometryCounts {
        self.counts
    }

    pub fn textures_mut(&mut self) -> &mut TextureTable {
        &mut self.textures
    }

    /// Throws away the previous frame and hands out the recorder for the next
    /// one.
    pub fn begin_frame(&mut self) -> &mut CommandRecorder {
        self.frame.clear();
        &mut self.frame
    }
}

impl Renderer for GlRenderer {
    fn render(&mut self, _: usize, _: &mut dyn Camera) {
        if self.frame.is_empty() {
            return;
        }

        let GlRenderer {
            buffers,
            textures,
            programs,
            frame,
            ..
        } = self;

        // Bodies are layered in draw order, like a 2D painter
        let ctxt = Context::get();
        ctxt.disable(Context::DEPTH_TEST);

        let mut current: Option<Program> = None;
        for command in frame.commands() {
            match command {
                DrawCommand::UseProgram(program) => {
                    if let Some(previous) = current {
                        programs.get_mut(previous).deactivate();
                    }
                    programs.get_mut(*program).activate();
                    current = Some(*program);
                }
                DrawCommand::SetUniform(name, value) => match current {
                    Some(program) => programs.get_mut(program).set_uniform(name, value),
                    None => log::warn!("Uniform `{}` set before any program was used", name),
                },
                DrawCommand::BindTexture(handle) => textures.bind(*handle),
                DrawCommand::Draw {
                    geometry,
                    primitive,
                    count,
                } => {
                    let program = match current {
                        Some(program) => programs.get_mut(program),
                        None => {
                            log::warn!("Draw of {:?} issued before any program was used", geometry);
                            continue;
                        }
                    };
                    buffers.bind(program, *geometry);

                    let depth_tested = needs_depth_test(*geometry);
                    if depth_tested {
                        ctxt.clear(Context::DEPTH_BUFFER_BIT);
                        ctxt.enable(Context::DEPTH_TEST);
                    }

                    let count = *count as i32;
                    match primitive {
                        Primitive::TriangleFan => ctxt.draw_arrays(GL_TRIANGLE_FAN, 0, count),
                        Primitive::LineLoop => ctxt.draw_arrays(GL_LINE_LOOP, 0, count),
                        Primitive::Triangles => {
                            ctxt.draw_elements(Context::TRIANGLES, count, GL_UNSIGNED_SHORT, 0)
                        }
                    }

                    if depth_tested {
                        ctxt.disable(Context::DEPTH_TEST);
                    }
                }
            }
        }

        if let Some(program) = current {
            programs.get_mut(program).deactivate();
        }
        ctxt.enable(Context::DEPTH_TEST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sphere_is_depth_tested() {
        assert!(needs_depth_test(Geometry::Sphere));
        assert!(!needs_depth_test(Geometry::Disc));
        assert!(!needs_depth_test(Geometry::Outline));
    }
}
