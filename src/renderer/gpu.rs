use std::sync::OnceLock;

use log::{info, warn};

use crate::error::{Result, YarnError};

static GPU_CONTEXT: OnceLock<Option<GpuContext>> = OnceLock::new();

pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    pub fn get() -> Option<&'static Self> {
        GPU_CONTEXT
            .get_or_init(|| match pollster::block_on(Self::init()) {
                Ok(ctx) => {
                    info!(
                        "GPU context: {} ({:?})",
                        ctx.adapter_info.name, ctx.adapter_info.backend
                    );
                    Some(ctx)
                }
                Err(e) => {
                    warn!("GPU initialization failed: {}", e);
                    None
                }
            })
            .as_ref()
    }

    pub fn try_get() -> Result<&'static Self> {
        Self::get().ok_or(YarnError::GpuNotAvailable)
    }

    pub fn is_available() -> bool {
        Self::get().is_some()
    }

    async fn init() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(YarnError::GpuNotAvailable)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("yarn3d"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| YarnError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            adapter_info: adapter.get_info(),
        })
    }

    pub fn max_storage_buffer_binding_size(&self) -> u64 {
        self.device.limits().max_storage_buffer_binding_size as u64
    }
}
