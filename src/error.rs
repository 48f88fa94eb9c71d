use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Anything that stops the viewer from starting. None of these are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to create window: {0}")]
    Window(String),

    #[error("{stage} shader of the {program} program failed to compile: {message}")]
    ShaderCompile {
        program: &'static str,
        stage: ShaderStage,
        message: String,
    },

    #[error("{program} program has no active input named `{name}`")]
    ShaderInterface {
        program: &'static str,
        name: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("body `{body}` orbits `{parent}`, which is not listed before it")]
    UnknownParent { body: String, parent: String },

    #[error("body `{body}` is invalid: {reason}")]
    InvalidBody { body: String, reason: String },

    #[error("invalid mesh resolution: {0}")]
    InvalidMesh(String),

    #[error("invalid camera settings: {0}")]
    InvalidCamera(String),
}

/// Texture failures only cost the body its appearance.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
