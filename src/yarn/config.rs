use std::path::Path;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::{Result, YarnError};
use crate::math::CurveShape;

// Two triangles per side of the cross-section.
pub const VERTICES_PER_SIDE: u32 = 6;
pub const LINES_PER_FRAME: u32 = 3;
pub const VERTICES_PER_LINE: u32 = 2;
pub const LINE_VERTICES_PER_FRAME: u32 = LINES_PER_FRAME * VERTICES_PER_LINE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    pub num_workgroups: u32,
    pub workgroup_size: u32,
    pub height: f32,
    pub amplitude: f32,
    pub depth: f32,
    // tube radius
    pub thickness: f32,
    pub row_count: u32,
    pub sides: u32,
    pub curve_scale: f32,
    pub row_spacing: f32,
    pub debug_frames: bool,
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            num_workgroups: 4,
            workgroup_size: 32,
            height: 1.0,
            amplitude: 0.5,
            depth: 0.5,
            thickness: 0.1,
            row_count: 1,
            sides: 12,
            curve_scale: 8.0 * std::f32::consts::PI,
            row_spacing: 0.5,
            debug_frames: false,
        }
    }
}

impl StrandConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("num_workgroups", self.num_workgroups),
            ("workgroup_size", self.workgroup_size),
            ("row_count", self.row_count),
            ("sides", self.sides),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(YarnError::InvalidConfig(format!("{name} must be > 0")));
            }
        }

        let reals = [
            ("height", self.height),
            ("amplitude", self.amplitude),
            ("depth", self.depth),
            ("thickness", self.thickness),
            ("curve_scale", self.curve_scale),
            ("row_spacing", self.row_spacing),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                return Err(YarnError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        let Some(workers) = self.num_workgroups.checked_mul(self.workgroup_size) else {
            return Err(YarnError::InvalidConfig(format!(
                "{} workgroups of {} invocations overflow a 32-bit invocation index",
                self.num_workgroups, self.workgroup_size
            )));
        };
        let demand = [self.row_count, VERTICES_PER_SIDE, self.sides]
            .into_iter()
            .try_fold(workers, u32::checked_mul);
        if demand.is_none() {
            return Err(YarnError::InvalidConfig(format!(
                "{} vertices do not fit a 32-bit vertex counter",
                self.vertex_capacity()
            )));
        }

        Ok(())
    }

    pub fn total_workers(&self) -> u32 {
        self.num_workgroups.saturating_mul(self.workgroup_size)
    }

    pub fn shape(&self) -> CurveShape {
        CurveShape {
            height: self.height,
            amplitude: self.amplitude,
            depth: self.depth,
        }
    }

    pub fn vertices_per_segment(&self) -> u32 {
        VERTICES_PER_SIDE.saturating_mul(self.sides)
    }

    // Every (worker, row) pair reserves once. Saturates, never wraps.
    pub fn vertex_capacity(&self) -> usize {
        self.segment_count()
            .saturating_mul(self.vertices_per_segment() as usize)
    }

    pub fn line_capacity(&self) -> usize {
        if self.debug_frames {
            self.segment_count().saturating_mul(LINES_PER_FRAME as usize)
        } else {
            0
        }
    }

    fn segment_count(&self) -> usize {
        (self.total_workers() as usize).saturating_mul(self.row_count as usize)
    }

    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey {
            workgroup_size: self.workgroup_size,
            vertex_capacity: self.vertex_capacity(),
            line_capacity: self.line_capacity(),
        }
    }

    pub fn uniforms(&self) -> StrandUniforms {
        StrandUniforms {
            num_workgroups: self.num_workgroups,
            workgroup_size: self.workgroup_size,
            sides: self.sides,
            row_count: self.row_count,
            height: self.height,
            amplitude: self.amplitude,
            depth: self.depth,
            thickness: self.thickness,
            curve_scale: self.curve_scale,
            row_spacing: self.row_spacing,
            debug_frames: self.debug_frames as u32,
            _pad: 0,
        }
    }
}

// Field order matches `struct Uniforms` in yarn.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StrandUniforms {
    pub num_workgroups: u32,
    pub workgroup_size: u32,
    pub sides: u32,
    pub row_count: u32,
    pub height: f32,
    pub amplitude: f32,
    pub depth: f32,
    pub thickness: f32,
    pub curve_scale: f32,
    pub row_spacing: f32,
    pub debug_frames: u32,
    pub _pad: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub workgroup_size: u32,
    pub vertex_capacity: usize,
    pub line_capacity: usize,
}
