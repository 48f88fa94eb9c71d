use std::collections::HashMap;

use kiss3d::context::Context;
use kiss3d::resource::{Effect, ShaderAttribute, ShaderUniform};
use nalgebra::{Matrix4, Point2, Point3};

use crate::error::{InitError, ShaderStage};
use crate::gfx::{Program, Uniform};

#[derive(Debug, Clone, Copy)]
enum UniformKind {
    Float,
    Vec3,
    Mat4,
}

struct ProgramSource {
    program: Program,
    vertex: &'static str,
    fragment: &'static str,
    uses_tex_coords: bool,
    uniforms: &'static [(&'static str, UniformKind)],
}

const TEXTURED: ProgramSource = ProgramSource {
    program: Program::Textured,
    vertex: TEXTURED_VERTEX_SRC,
    fragment: TEXTURED_FRAGMENT_SRC,
    uses_tex_coords: true,
    uniforms: &[
        ("model", UniformKind::Mat4),
        ("view", UniformKind::Mat4),
        ("projection", UniformKind::Mat4),
    ],
};

const OUTLINE: ProgramSource = ProgramSource {
    program: Program::Outline,
    vertex: OUTLINE_VERTEX_SRC,
    fragment: OUTLINE_FRAGMENT_SRC,
    uses_tex_coords: false,
    uniforms: &[
        ("model", UniformKind::Mat4),
        ("view", UniformKind::Mat4),
        ("projection", UniformKind::Mat4),
        ("color", UniformKind::Vec3),
        ("intensity", UniformKind::Float),
    ],
};

enum UniformSlot {
    Float(ShaderUniform<f32>),
    Vec3(ShaderUniform<Point3<f32>>),
    Mat4(ShaderUniform<Matrix4<f32>>),
}

pub struct GlProgram {
    program: Program,
    effect: Effect,
    pub position: ShaderAttribute<Point3<f32>>,
    pub tex_coord: Option<ShaderAttribute<Point2<f32>>>,
    uniforms: HashMap<&'static str, UniformSlot>,
}

impl GlProgram {
    fn compile(source: &ProgramSource) -> Result<Self, InitError> {
        let name = source.program.name();

        // Effect panics on a bad shader, so both stages are test-compiled first
        // to get a proper error out.
        check_stage(name, ShaderStage::Vertex, source.vertex)?;
        check_stage(name, ShaderStage::Fragment, source.fragment)?;

        let mut effect = Effect::new_from_str(source.vertex, source.fragment);
        effect.use_program();

        let missing = |input: &'static str| InitError::ShaderInterface {
            program: name,
            name: input,
        };

        let position = effect
            .get_attrib::<Point3<f32>>("position")
            .ok_or_else(|| missing("position"))?;
        let tex_coord = if source.uses_tex_coords {
            let attrib = effect
                .get_attrib::<Point2<f32>>("tex_coord")
                .ok_or_else(|| missing("tex_coord"))?;

            // Only one texture unit is ever used
            let mut sampler = effect
                .get_uniform::<i32>("tex")
                .ok_or_else(|| missing("tex"))?;
            sampler.upload(&0);

            Some(attrib)
        } else {
            None
        };

        let mut uniforms = HashMap::new();
        for &(uniform, kind) in source.uniforms {
            let slot = match kind {
                UniformKind::Float => effect.get_uniform::<f32>(uniform).map(UniformSlot::Float),
                UniformKind::Vec3 => effect
                    .get_uniform::<Point3<f32>>(uniform)
                    .map(UniformSlot::Vec3),
                UniformKind::Mat4 => effect
                    .get_uniform::<Matrix4<f32>>(uniform)
                    .map(UniformSlot::Mat4),
            };
            uniforms.insert(uniform, slot.ok_or_else(|| missing(uniform))?);
        }

        log::info!("Compiled {} shader program", name);
        Ok(GlProgram {
            program: source.program,
            effect,
            position,
            tex_coord,
            uniforms,
        })
    }

    pub fn activate(&mut self) {
        self.effect.use_program();
        self.position.enable();
        if let Some(tex_coord) = &mut self.tex_coord {
            tex_coord.enable();
        }
    }

    pub fn deactivate(&mut self) {
        self.position.disable();
        if let Some(tex_coord) = &mut self.tex_coord {
            tex_coord.disable();
        }
    }

    pub fn set_uniform(&mut self, name: &str, value: &Uniform) {
        match (self.uniforms.get_mut(name), value) {
            (Some(UniformSlot::Float(slot)), Uniform::Float(v)) => slot.upload(v),
            (Some(UniformSlot::Vec3(slot)), Uniform::Vec3(v)) => slot.upload(&Point3::from(*v)),
            (Some(UniformSlot::Mat4(slot)), Uniform::Mat4(v)) => slot.upload(v),
            (Some(_), _) => log::warn!(
                "Uniform `{}` of the {} program has a different type than {:?}",
                name,
                self.program.name(),
                value
            ),
            (None, _) => log::warn!(
                "The {} program has no uniform `{}`",
                self.program.name(),
                name
            ),
        }
    }
}

pub struct Programs {
    textured: GlProgram,
    outline: GlProgram,
}

impl Programs {
    pub fn compile() -> Result<Self, InitError> {
        Ok(Programs {
            textured: GlProgram::compile(&TEXTURED)?,
            outline: GlProgram::compile(&OUTLINE)?,
        })
    }

    pub fn get_mut(&mut self, program: Program) -> &mut GlProgram {
        match program {
            Program::Textured => &mut self.textured,
            Program::Outline => &mut self.outline,
        }
    }
}

fn check_stage(program: &'static str, stage: ShaderStage, source: &str) -> Result<(), InitError> {
    let failed = |message: String| InitError::ShaderCompile {
        program,
        stage,
        message,
    };

    let ctxt = Context::get();
    let kind = match stage {
        ShaderStage::Vertex => Context::VERTEX_SHADER,
        ShaderStage::Fragment => Context::FRAGMENT_SHADER,
    };
    let shader = ctxt
        .create_shader(kind)
        .ok_or_else(|| failed("could not create shader object".to_owned()))?;

    ctxt.shader_source(&shader, source);
    ctxt.compile_shader(&shader);
    let compiled = ctxt.get_shader_parameter_int(&shader, Context::COMPILE_STATUS) != Some(0);
    let log = ctxt.get_shader_info_log(&shader);
    ctxt.delete_shader(Some(&shader));

    if compiled {
        Ok(())
    } else {
        Err(failed(log.unwrap_or_else(|| "no compiler output".to_owned())))
    }
}

const TEXTURED_VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 tex_coord;
    varying   vec2 v_tex_coord;
    uniform   mat4 model;
    uniform   mat4 view;
    uniform   mat4 projection;
    void main() {
        gl_Position = projection * view * model * vec4(position, 1.0);
        v_tex_coord = tex_coord;
    }";

const TEXTURED_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec2 v_tex_coord;
    uniform sampler2D tex;
    void main() {
        gl_FragColor = texture2D(tex, v_tex_coord);
    }";

const OUTLINE_VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    uniform   mat4 model;
    uniform   mat4 view;
    uniform   mat4 projection;
    void main() {
        gl_Position = projection * view * model * vec4(position, 1.0);
    }";

const OUTLINE_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3  color;
    uniform float intensity;
    void main() {
        gl_FragColor = vec4(color * intensity, 1.0);
    }";
