//! The graphics capabilities the scene is drawn against.
//!
//! Nothing in here touches OpenGL. The composer talks to a [`GraphicsBackend`],
//! which in the running program is a [`CommandRecorder`] that the GL renderer
//! replays during kiss3d's render pass, and in tests is the same recorder
//! inspected directly.

use std::path::Path;
use std::time::Instant;

use nalgebra::{Matrix4, Vector3};

use crate::error::TextureError;

mod recorder;

pub use recorder::{CommandRecorder, DrawCommand};

/// Non-owning reference to a texture living in the graphics backend.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextureHandle(pub usize);

impl TextureHandle {
    /// Always valid; stands in for textures that failed to load.
    pub const PLACEHOLDER: TextureHandle = TextureHandle(0);

    pub fn is_placeholder(self) -> bool {
        self == Self::PLACEHOLDER
    }
}

/// The shader programs the scene knows how to use.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Program {
    /// Textured geometry, used for every body.
    Textured,
    /// Flat colored lines, used for orbit paths.
    Outline,
}

impl Program {
    pub fn name(self) -> &'static str {
        match self {
            Program::Textured => "textured",
            Program::Outline => "outline",
        }
    }
}

/// The static buffers uploaded at startup.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Geometry {
    Disc,
    Outline,
    Sphere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    TriangleFan,
    LineLoop,
    /// Indexed triangles; the count is the number of indices.
    Triangles,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Float(f32),
    Vec3(Vector3<f32>),
    Mat4(Matrix4<f32>),
}

/// Explicit stand-in for the GL state machine. Uniforms and textures apply to
/// the most recently used program, and every draw names the buffer it reads.
pub trait GraphicsBackend {
    fn use_program(&mut self, program: Program);
    fn set_uniform(&mut self, name: &'static str, value: Uniform);
    fn bind_texture(&mut self, texture: TextureHandle);
    fn draw(&mut self, geometry: Geometry, primitive: Primitive, count: usize);
}

pub trait TextureLoader {
    /// Decodes an image file and uploads it as a 2D texture.
    fn load(&mut self, path: &Path) -> Result<TextureHandle, TextureError>;
}

/// Monotonic source of simulation time, in seconds.
pub trait Clock {
    fn elapsed_seconds(&self) -> f64;
}

pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        WallClock {
            start: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
