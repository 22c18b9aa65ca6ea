use glam::Vec3;

use yarn3d::math::{DrawIndirectArgs, MeshSnapshot};
use yarn3d::renderer::{GpuContext, YarnCompute};
use yarn3d::yarn::{StrandConfig, generate};

fn compute() -> Option<YarnCompute> {
    GpuContext::get().map(YarnCompute::new)
}

fn block_centroids(mesh: &MeshSnapshot, per_segment: usize) -> Vec<Vec3> {
    (0..mesh.vertex_count() / per_segment)
        .map(|block| {
            let first = block * per_segment;
            (first..first + per_segment)
                .map(|v| mesh.position(v))
                .sum::<Vec3>()
                / per_segment as f32
        })
        .collect()
}

#[test]
#[ignore = "requires a GPU"]
fn test_gpu_reference_pass() {
    let Some(mut compute) = compute() else {
        eprintln!("no GPU adapter, skipping");
        return;
    };

    let config = StrandConfig {
        num_workgroups: 1,
        workgroup_size: 32,
        sides: 12,
        row_count: 1,
        ..Default::default()
    };
    let mesh = compute.generate_blocking(&config).unwrap();
    assert_eq!(
        mesh.draw,
        DrawIndirectArgs {
            vertex_count: 2304,
            instance_count: 1,
            first_vertex: 0,
            first_instance: 0,
        }
    );

    let four = compute
        .generate_blocking(&StrandConfig {
            row_count: 4,
            ..config
        })
        .unwrap();
    assert_eq!(four.draw.vertex_count, 4 * 2304);
}

#[test]
#[ignore = "requires a GPU"]
fn test_gpu_matches_cpu() {
    let Some(mut compute) = compute() else {
        eprintln!("no GPU adapter, skipping");
        return;
    };

    let config = StrandConfig {
        num_workgroups: 2,
        workgroup_size: 16,
        sides: 6,
        row_count: 2,
        debug_frames: true,
        ..Default::default()
    };
    let gpu = compute.generate_blocking(&config).unwrap();
    let cpu = generate(&config).unwrap().snapshot();

    assert_eq!(gpu.draw, cpu.draw);
    assert_eq!(gpu.line_draw, cpu.line_draw);
    assert!(gpu.colors.iter().all(|c| c >> 24 == 0xFF));

    let per_segment = config.vertices_per_segment() as usize;
    let cpu_blocks = block_centroids(&cpu, per_segment);
    for centroid in block_centroids(&gpu, per_segment) {
        let nearest = cpu_blocks
            .iter()
            .map(|c| c.distance(centroid))
            .fold(f32::INFINITY, f32::min);
        assert!(nearest < 1e-3, "no CPU block near {centroid}");
    }
}

#[test]
#[ignore = "requires a GPU"]
fn test_gpu_buffers_are_reused_for_same_key() {
    let Some(mut compute) = compute() else {
        eprintln!("no GPU adapter, skipping");
        return;
    };

    let config = StrandConfig::default();
    compute.prepare(&config).unwrap();
    let allocations = compute.buffer_allocations();

    let moved = StrandConfig {
        height: 2.0,
        ..config.clone()
    };
    compute.prepare(&moved).unwrap();
    assert_eq!(compute.buffer_allocations(), allocations);

    let larger = StrandConfig {
        row_count: 3,
        ..config.clone()
    };
    compute.prepare(&larger).unwrap();
    assert_eq!(compute.buffer_allocations(), allocations + 1);
    assert!(compute.buffers(&config).is_none());
    assert!(compute.buffers(&larger).is_some());
}

#[test]
#[ignore = "requires a GPU"]
fn test_gpu_rejects_oversized_workgroup() {
    let Some(mut compute) = compute() else {
        eprintln!("no GPU adapter, skipping");
        return;
    };

    let config = StrandConfig {
        workgroup_size: 1 << 20,
        num_workgroups: 1,
        ..Default::default()
    };
    assert!(compute.prepare(&config).is_err());
}
