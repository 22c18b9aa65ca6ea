use std::f32::consts::PI;

use crate::yarn::config::StrandConfig;

pub struct StrandPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: StrandConfig,
}

pub const STRAND_PRESETS: &[StrandPreset] = &[
    StrandPreset {
        name: "single-row",
        description: "One strand, 32 segments, 12-sided tube",
        config: StrandConfig {
            num_workgroups: 1,
            workgroup_size: 32,
            height: 1.0,
            amplitude: 0.5,
            depth: 0.5,
            thickness: 0.1,
            row_count: 1,
            sides: 12,
            curve_scale: 8.0 * PI,
            row_spacing: 0.5,
            debug_frames: false,
        },
    },
    StrandPreset {
        name: "knit-panel",
        description: "Tight loops stacked into 16 rows",
        config: StrandConfig {
            num_workgroups: 8,
            workgroup_size: 64,
            height: 0.6,
            amplitude: 0.8,
            depth: 0.3,
            thickness: 0.12,
            row_count: 16,
            sides: 8,
            curve_scale: 32.0 * PI,
            row_spacing: 0.9,
            debug_frames: false,
        },
    },
    StrandPreset {
        name: "loose-ribbon",
        description: "Wide, flat wave with a thin triangular cross-section",
        config: StrandConfig {
            num_workgroups: 2,
            workgroup_size: 64,
            height: 2.0,
            amplitude: 0.1,
            depth: 0.05,
            thickness: 0.05,
            row_count: 3,
            sides: 3,
            curve_scale: 6.0 * PI,
            row_spacing: 2.5,
            debug_frames: false,
        },
    },
    StrandPreset {
        name: "frames",
        description: "Coarse strand with tangent and normal axes drawn",
        config: StrandConfig {
            num_workgroups: 1,
            workgroup_size: 16,
            height: 1.0,
            amplitude: 0.5,
            depth: 0.5,
            thickness: 0.15,
            row_count: 2,
            sides: 6,
            curve_scale: 4.0 * PI,
            row_spacing: 1.0,
            debug_frames: true,
        },
    },
];

pub fn find_preset(name: &str) -> Option<&'static StrandPreset> {
    STRAND_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
