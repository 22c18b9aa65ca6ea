use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndirectArgs {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

impl DrawIndirectArgs {
    pub const RESET: Self = Self {
        vertex_count: 0,
        instance_count: 1,
        first_vertex: 0,
        first_instance: 0,
    };
}

// Same layout as `DebugLine` in yarn.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DebugLine {
    pub start: [f32; 3],
    pub _pad: f32,
    pub end: [f32; 3],
    pub color: u32,
}

impl DebugLine {
    pub const WORDS: usize = 8;

    pub fn new(start: Vec3, end: Vec3, color: u32) -> Self {
        Self {
            start: start.to_array(),
            _pad: 0.0,
            end: end.to_array(),
            color,
        }
    }

    pub fn start(&self) -> Vec3 {
        Vec3::from_array(self.start)
    }

    pub fn end(&self) -> Vec3 {
        Vec3::from_array(self.end)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshSnapshot {
    pub positions: Vec<f32>,
    pub colors: Vec<u32>,
    pub draw: DrawIndirectArgs,
    pub lines: Vec<DebugLine>,
    pub line_draw: DrawIndirectArgs,
}

impl MeshSnapshot {
    pub fn vertex_count(&self) -> usize {
        self.colors.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[vertex * 3..vertex * 3 + 3])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions
            .chunks_exact(9)
            .map(|t| [Vec3::from_slice(&t[0..3]), Vec3::from_slice(&t[3..6]), Vec3::from_slice(&t[6..9])])
    }
}
