use crate::math::{DebugLine, DrawIndirectArgs};
use crate::yarn::config::{ResourceKey, StrandUniforms};

const POSITION_STRIDE: u64 = 3 * 4;
const COLOR_STRIDE: u64 = 4;
const LINE_SIZE: u64 = std::mem::size_of::<DebugLine>() as u64;
const INDIRECT_SIZE: u64 = std::mem::size_of::<DrawIndirectArgs>() as u64;

pub struct StrandGpuBuffers {
    pub key: ResourceKey,
    pub uniforms: wgpu::Buffer,
    pub positions: wgpu::Buffer,
    pub colors: wgpu::Buffer,
    pub draw_indirect: wgpu::Buffer,
    pub lines: wgpu::Buffer,
    pub line_indirect: wgpu::Buffer,
}

impl StrandGpuBuffers {
    pub fn new(device: &wgpu::Device, key: ResourceKey) -> Self {
        let vertices = key.vertex_capacity.max(1) as u64;
        let lines = key.line_capacity.max(1) as u64;

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Strand Uniform Buffer"),
            size: std::mem::size_of::<StrandUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let positions = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Strand Position Buffer"),
            size: vertices * POSITION_STRIDE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let colors = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Strand Color Buffer"),
            size: vertices * COLOR_STRIDE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let draw_indirect = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Strand Indirect Buffer"),
            size: INDIRECT_SIZE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Debug Line Buffer"),
            size: lines * LINE_SIZE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let line_indirect = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Debug Line Indirect Buffer"),
            size: INDIRECT_SIZE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        Self {
            key,
            uniforms,
            positions,
            colors,
            draw_indirect,
            lines: line_buffer,
            line_indirect,
        }
    }

    pub fn prepare(&self, queue: &wgpu::Queue, uniforms: &StrandUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
        let reset = bytemuck::bytes_of(&DrawIndirectArgs::RESET);
        queue.write_buffer(&self.draw_indirect, 0, reset);
        queue.write_buffer(&self.line_indirect, 0, reset);
    }
}

pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: POSITION_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

pub fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: COLOR_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Unorm8x4,
        }],
    }
}

pub fn line_position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: LINE_SIZE / 2,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}
