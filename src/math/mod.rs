pub mod mesh;
pub mod utils;
