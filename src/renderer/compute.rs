use log::{debug, info};

use crate::error::{Result, YarnError};
use crate::math::{DebugLine, DrawIndirectArgs, MeshSnapshot};
use crate::renderer::buffers::StrandGpuBuffers;
use crate::renderer::cache::ResourceCache;
use crate::renderer::gpu::GpuContext;
use crate::yarn::config::{ResourceKey, StrandConfig};

const KERNEL_SOURCE: &str = include_str!("yarn.wgsl");
const WORKGROUP_SIZE_ATTRIBUTE: &str = "@workgroup_size(WORKGROUP_SIZE)";

pub fn kernel_source(workgroup_size: u32) -> String {
    KERNEL_SOURCE.replace(
        WORKGROUP_SIZE_ATTRIBUTE,
        &format!("@workgroup_size({}u)", workgroup_size),
    )
}

pub struct StrandResources {
    pub buffers: StrandGpuBuffers,
    pub bind_group: wgpu::BindGroup,
}

pub struct YarnCompute {
    ctx: &'static GpuContext,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: ResourceCache<u32, wgpu::ComputePipeline>,
    resources: ResourceCache<ResourceKey, StrandResources>,
    current: Option<ResourceKey>,
}

impl YarnCompute {
    pub fn try_new() -> Result<Self> {
        Ok(Self::new(GpuContext::try_get()?))
    }

    pub fn new(ctx: &'static GpuContext) -> Self {
        let device = &ctx.device;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Yarn Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
                storage_entry(4),
                storage_entry(5),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Yarn Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        Self {
            ctx,
            bind_group_layout,
            pipeline_layout,
            pipelines: ResourceCache::new(),
            resources: ResourceCache::new(),
            current: None,
        }
    }

    pub fn context(&self) -> &'static GpuContext {
        self.ctx
    }

    pub fn prepare(&mut self, config: &StrandConfig) -> Result<ResourceKey> {
        config.validate()?;
        self.check_limits(config)?;

        let key = config.resource_key();
        if let Some(stale) = self.current.replace(key).filter(|k| *k != key) {
            if self.resources.invalidate(&stale).is_some() {
                debug!("dropped stale strand buffers {:?}", stale);
            }
        }

        let device = &self.ctx.device;
        let pipeline_layout = &self.pipeline_layout;
        let bind_group_layout = &self.bind_group_layout;

        self.pipelines.get_or_insert_with(key.workgroup_size, |size| {
            info!("building strand pipeline for workgroup size {}", size);
            create_pipeline(device, pipeline_layout, *size)
        });
        self.resources.get_or_insert_with(key, |k| {
            info!(
                "allocating strand buffers: {} vertices, {} lines",
                k.vertex_capacity, k.line_capacity
            );
            create_resources(device, bind_group_layout, *k)
        });

        Ok(key)
    }

    pub fn encode_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        config: &StrandConfig,
    ) -> Result<()> {
        let key = self.prepare(config)?;
        let (pipeline, resources) = self.lookup(&key)?;

        resources.buffers.prepare(&self.ctx.queue, &config.uniforms());

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Strand Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &resources.bind_group, &[]);
        pass.dispatch_workgroups(config.num_workgroups, 1, 1);

        Ok(())
    }

    pub fn buffers(&self, config: &StrandConfig) -> Option<&StrandGpuBuffers> {
        self.resources
            .get(&config.resource_key())
            .map(|r| &r.buffers)
    }

    pub fn buffer_allocations(&self) -> u64 {
        self.resources.misses()
    }

    pub fn generate_blocking(&mut self, config: &StrandConfig) -> Result<MeshSnapshot> {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Strand Encoder"),
            });
        self.encode_pass(&mut encoder, config)?;
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.read_back(config)
    }

    pub fn read_back(&self, config: &StrandConfig) -> Result<MeshSnapshot> {
        let key = config.resource_key();
        let (_, resources) = self.lookup(&key)?;
        let buffers = &resources.buffers;
        let device = &self.ctx.device;

        let sources = [
            &buffers.draw_indirect,
            &buffers.line_indirect,
            &buffers.positions,
            &buffers.colors,
            &buffers.lines,
        ];
        let staging: Vec<wgpu::Buffer> = sources
            .iter()
            .map(|source| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Strand Staging Buffer"),
                    size: source.size(),
                    usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Strand Readback Encoder"),
        });
        for (source, target) in sources.iter().zip(&staging) {
            encoder.copy_buffer_to_buffer(source, 0, target, 0, source.size());
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        let draw: DrawIndirectArgs = bytemuck::pod_read_unaligned(&self.map_read(&staging[0])?);
        let line_draw: DrawIndirectArgs =
            bytemuck::pod_read_unaligned(&self.map_read(&staging[1])?);

        let vertices = (draw.vertex_count as usize).min(key.vertex_capacity);
        let lines = ((line_draw.vertex_count / 2) as usize).min(key.line_capacity);

        let positions = self.map_read(&staging[2])?;
        let colors = self.map_read(&staging[3])?;
        let line_bytes = self.map_read(&staging[4])?;

        Ok(MeshSnapshot {
            positions: positions[..vertices * 12]
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect(),
            colors: colors[..vertices * 4]
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
            draw,
            lines: line_bytes[..lines * std::mem::size_of::<DebugLine>()]
                .chunks_exact(std::mem::size_of::<DebugLine>())
                .map(bytemuck::pod_read_unaligned::<DebugLine>)
                .collect(),
            line_draw,
        })
    }

    fn lookup(&self, key: &ResourceKey) -> Result<(&wgpu::ComputePipeline, &StrandResources)> {
        match (
            self.pipelines.get(&key.workgroup_size),
            self.resources.get(key),
        ) {
            (Some(pipeline), Some(resources)) => Ok((pipeline, resources)),
            _ => Err(YarnError::InvalidConfig(format!(
                "no GPU resources prepared for {:?}",
                key
            ))),
        }
    }

    fn map_read(&self, buffer: &wgpu::Buffer) -> Result<Vec<u8>> {
        let slice = buffer.slice(..);
        let (tx, rx) = crossbeam::channel::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.ctx.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| YarnError::BufferMapping(e.to_string()))?
            .map_err(|e| YarnError::BufferMapping(e.to_string()))?;

        let bytes = slice.get_mapped_range().to_vec();
        buffer.unmap();
        Ok(bytes)
    }

    fn check_limits(&self, config: &StrandConfig) -> Result<()> {
        let limits = self.ctx.device.limits();

        if config.workgroup_size > limits.max_compute_workgroup_size_x
            || config.workgroup_size > limits.max_compute_invocations_per_workgroup
        {
            return Err(YarnError::InvalidConfig(format!(
                "workgroup_size {} exceeds the device limit of {}",
                config.workgroup_size,
                limits
                    .max_compute_workgroup_size_x
                    .min(limits.max_compute_invocations_per_workgroup)
            )));
        }
        if config.num_workgroups > limits.max_compute_workgroups_per_dimension {
            return Err(YarnError::InvalidConfig(format!(
                "num_workgroups {} exceeds the device limit of {}",
                config.num_workgroups, limits.max_compute_workgroups_per_dimension
            )));
        }

        let largest = (config.vertex_capacity() * 12)
            .max(config.line_capacity() * std::mem::size_of::<DebugLine>());
        if largest as u64 > self.ctx.max_storage_buffer_binding_size() {
            return Err(YarnError::InvalidConfig(format!(
                "{} byte output buffer exceeds the device binding limit",
                largest
            )));
        }

        Ok(())
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    workgroup_size: u32,
) -> wgpu::ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Yarn Shader"),
        source: wgpu::ShaderSource::Wgsl(kernel_source(workgroup_size).into()),
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Strand Pipeline"),
        layout: Some(layout),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn create_resources(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    key: ResourceKey,
) -> StrandResources {
    let buffers = StrandGpuBuffers::new(device, key);

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Yarn Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: buffers.positions.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: buffers.colors.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: buffers.draw_indirect.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: buffers.lines.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: buffers.line_indirect.as_entire_binding(),
            },
        ],
    });

    StrandResources {
        buffers,
        bind_group,
    }
}
