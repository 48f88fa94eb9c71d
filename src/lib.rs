pub mod config;
pub mod error;
pub mod gfx;
pub mod gui;
pub mod math;
pub mod model;
