pub mod error;
pub mod math;
pub mod renderer;
pub mod yarn;

pub use error::{Result, YarnError};
pub use math::MeshSnapshot;
pub use yarn::{StrandConfig, YarnEngine, generate};
