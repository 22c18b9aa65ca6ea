pub mod buffers;
pub mod cache;
pub mod compute;
pub mod gpu;

pub use buffers::{StrandGpuBuffers, color_layout, line_position_layout, position_layout};
pub use cache::ResourceCache;
pub use compute::{StrandResources, YarnCompute, kernel_source};
pub use gpu::GpuContext;
