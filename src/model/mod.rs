mod body;
mod system;

pub use body::{BodyID, OrbitingBody, PrimaryBody};
pub use system::SolarSystem;
