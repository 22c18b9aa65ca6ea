use glam::Vec3;

use crate::math::{CurveSample, DebugLine, SegmentSpan, estimate_frame};
use crate::yarn::allocator::{AllocationCoordinator, finalize_descriptor};
use crate::yarn::config::{LINE_VERTICES_PER_FRAME, StrandConfig, VERTICES_PER_LINE};
use crate::yarn::extrude::TubeExtruder;
use crate::yarn::output::StrandTargets;

pub const TANGENT_COLOR: u32 = 0xFF00_00FF;
pub const AXIS1_COLOR: u32 = 0xFF00_FF00;
pub const AXIS2_COLOR: u32 = 0xFFFF_0000;
pub const FRAME_LINE_SCALE: f32 = 3.0;

pub fn segment_samples(config: &StrandConfig, worker: u32) -> (CurveSample, CurveSample) {
    let shape = config.shape();
    let span = SegmentSpan::for_worker(worker, config.total_workers(), config.curve_scale);
    let step = span.step();

    let prev = shape.sample(span.t0 - step);
    let start = shape.sample(span.t0);
    let end = shape.sample(span.t1);
    let next = shape.sample(span.t1 + step);

    (
        CurveSample {
            point: start,
            frame: estimate_frame(prev, end),
        },
        CurveSample {
            point: end,
            frame: estimate_frame(start, next),
        },
    )
}

pub fn row_offset(config: &StrandConfig, row: u32) -> Vec3 {
    Vec3::new(0.0, row as f32 * config.row_spacing, 0.0)
}

pub struct GridIterator<'a> {
    config: &'a StrandConfig,
    targets: &'a StrandTargets,
    extruder: TubeExtruder,
}

impl<'a> GridIterator<'a> {
    pub fn new(config: &'a StrandConfig, targets: &'a StrandTargets) -> Self {
        Self {
            config,
            targets,
            extruder: TubeExtruder::new(config.sides, config.thickness),
        }
    }

    pub fn run(&self, worker: u32) {
        finalize_descriptor(worker, &[self.targets.mesh.draw(), self.targets.lines.draw()]);

        let (start, end) = segment_samples(self.config, worker);
        let mesh = AllocationCoordinator::new(self.targets.mesh.draw());
        let lines = AllocationCoordinator::new(self.targets.lines.draw());
        let vertex_count = self.extruder.vertex_count();

        for row in 0..self.config.row_count {
            let offset = row_offset(self.config, row);

            let allocation = mesh.reserve(vertex_count);
            let base = allocation.base_vertex as usize;
            self.extruder.extrude(&start, &end, offset, |i, position, color| {
                self.targets.mesh.write_vertex(base + i, position, color);
            });

            if self.config.debug_frames {
                let allocation = lines.reserve(LINE_VERTICES_PER_FRAME);
                let first_line = (allocation.base_vertex / VERTICES_PER_LINE) as usize;
                self.write_frame_lines(first_line, &start, offset);
            }
        }
    }

    fn write_frame_lines(&self, first_line: usize, sample: &CurveSample, offset: Vec3) {
        let origin = sample.point + offset;
        let length = FRAME_LINE_SCALE * self.config.thickness;
        let axes = [
            (sample.frame.tangent, TANGENT_COLOR),
            (sample.frame.axis1, AXIS1_COLOR),
            (sample.frame.axis2, AXIS2_COLOR),
        ];
        for (i, (axis, color)) in axes.into_iter().enumerate() {
            let line = DebugLine::new(origin, origin + axis * length, color);
            self.targets.lines.write_line(first_line + i, &line);
        }
    }
}
