use std::env;
use std::process::ExitCode;

use raylang::{raster, Mesh};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: raylang <model.smf> [output.png]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    };

    if let Ok(cwd) = env::current_dir() {
        info!("cwd: {}", cwd.display());
    }

    let mesh = match Mesh::load(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Unable to read mesh file {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Loaded {path}"
    );

    if let Some(output) = args.get(2) {
        if let Err(e) = raster::write_gradient_png(output) {
            error!("{e}");
            return ExitCode::FAILURE;
        }
        info!("Wrote {output}");
    }

    ExitCode::SUCCESS
}
