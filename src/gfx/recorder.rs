use super::{Geometry, GraphicsBackend, Primitive, Program, TextureHandle, Uniform};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    UseProgram(Program),
    SetUniform(&'static str, Uniform),
    BindTexture(TextureHandle),
    Draw {
        geometry: Geometry,
        primitive: Primitive,
        count: usize,
    },
}

/// Backend that just remembers what it was asked to do, in order.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Draw { .. }))
            .count()
    }
}

impl GraphicsBackend for CommandRecorder {
    fn use_program(&mut self, program: Program) {
        self.commands.push(DrawCommand::UseProgram(program));
    }

    fn set_uniform(&mut self, name: &'static str, value: Uniform) {
        self.commands.push(DrawCommand::SetUniform(name, value));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn draw(&mut self, geometry: Geometry, primitive: Primitive, count: usize) {
        self.commands.push(DrawCommand::Draw {
            geometry,
            primitive,
            count,
        });
    }
}
