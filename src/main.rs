use std::process::ExitCode;

use env_logger::{Builder, Env};
use log::{error, info, warn};

use yarn3d::renderer::YarnCompute;
use yarn3d::yarn::{StrandConfig, YarnEngine, YarnResult, find_preset};
use yarn3d::{MeshSnapshot, Result};

fn load_config(arg: Option<String>) -> Result<StrandConfig> {
    let Some(arg) = arg else {
        return Ok(StrandConfig::default());
    };
    match find_preset(&arg) {
        Some(preset) => {
            info!("preset '{}': {}", preset.name, preset.description);
            Ok(preset.config.clone())
        }
        None => StrandConfig::load(&arg),
    }
}

fn report(backend: &str, mesh: &MeshSnapshot) {
    info!(
        "{}: {} vertices, {} triangles, draw {{ {}, {}, {}, {} }}",
        backend,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.draw.vertex_count,
        mesh.draw.instance_count,
        mesh.draw.first_vertex,
        mesh.draw.first_instance
    );
    if mesh.line_draw.vertex_count > 0 {
        info!("{}: {} frame lines", backend, mesh.lines.len());
    }
}

fn run() -> Result<()> {
    let config = load_config(std::env::args().nth(1))?;
    config.validate()?;
    info!(
        "{} workers x {} rows, {} sides",
        config.total_workers(),
        config.row_count,
        config.sides
    );

    let engine = YarnEngine::new();
    engine.generate(config.clone());
    match engine.recv_result()? {
        YarnResult::Mesh(mesh) => {
            report("cpu", &mesh);
            info!("cpu pass took {} us", engine.stats().last_pass_micros());
        }
        YarnResult::Error(e) => error!("cpu pass failed: {}", e),
    }

    match YarnCompute::try_new() {
        Ok(mut compute) => {
            let mesh = compute.generate_blocking(&config)?;
            report("gpu", &mesh);
        }
        Err(e) => warn!("skipping GPU pass: {}", e),
    }

    Ok(())
}

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("naga", log::LevelFilter::Warn)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
