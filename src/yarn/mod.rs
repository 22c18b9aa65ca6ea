pub mod allocator;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod extrude;
pub mod grid;
pub mod output;
pub mod presets;

pub use allocator::{AllocationCoordinator, DESIGNATED_WORKER, SegmentAllocation};
pub use config::{ResourceKey, StrandConfig, StrandUniforms};
pub use dispatch::{dispatch, generate, run_pass};
pub use engine::{PassStats, YarnCommand, YarnEngine, YarnResult};
pub use extrude::TubeExtruder;
pub use grid::GridIterator;
pub use output::{DebugLineBuffer, IndirectDrawDescriptor, OutputMesh, StrandTargets};
pub use presets::{STRAND_PRESETS, StrandPreset, find_preset};
