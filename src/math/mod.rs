pub mod curve;
pub mod frame;
pub mod mesh;

pub use curve::{CurveShape, SegmentSpan, sample};
pub use frame::{CurveSample, Frame, estimate_frame};
pub use mesh::{DebugLine, DrawIndirectArgs, MeshSnapshot};
