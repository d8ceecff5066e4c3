//! Voxseg command line - rasterize, filter, segment and export a point set.
//!
//! Usage: cargo run --release --bin voxseg -- --input <FILE> [OPTIONS]
//!
//! Options:
//!   --input <FILE>      Vertex file, one `v x y z` per line (required)
//!   --output <FILE>     Write the final lattice as `v x y z` lines
//!   --config <FILE>     Session settings as JSON
//!   --raster <N>        Cells along the longest axis (overrides config)
//!   --filter <A,B,..>   Filter chain, e.g. `gauss-sobel,smooth-gradients`
//!   --seed <X,Y,Z>      Grow and mark a region from this voxel
//!   --ray <OX,OY,OZ,DX,DY,DZ>
//!                       Pick a voxel with this ray, then grow and mark
//!   --lattice           Input already holds lattice coordinates
//!   --summary <FILE>    Write run statistics as JSON

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::Vec3;
use serde_json::json;

use voxseg::filter::FilterKind;
use voxseg::voxel::VoxelCoord;
use voxseg::{Session, SessionConfig};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> voxseg::core::Result<()> {
    let Some(input) = parse_str_arg(args, "--input").map(PathBuf::from) else {
        return Err(voxseg::core::Error::Config("--input <FILE> is required".into()));
    };

    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => SessionConfig::from_json_file(&PathBuf::from(path))?,
        None => SessionConfig::default(),
    };
    if let Some(raster) = parse_u32_arg(args, "--raster") {
        config.raster_size = raster.max(1);
    }
    let lattice = args.iter().any(|a| a == "--lattice");
    let filters: Vec<FilterKind> = parse_str_arg(args, "--filter")
        .map(|chain| chain.split(',').map(FilterKind::from_name).collect())
        .unwrap_or_default();
    let seed = parse_i32_list_arg(args, "--seed").and_then(|v| match v[..] {
        [x, y, z] => Some(VoxelCoord::new(x, y, z)),
        _ => None,
    });
    let ray = parse_f32_list_arg(args, "--ray").and_then(|v| match v[..] {
        [ox, oy, oz, dx, dy, dz] => Some((Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz))),
        _ => None,
    });

    println!("=== Voxseg ===");
    println!("Input:  {}{}", input.display(), if lattice { " (lattice)" } else { "" });
    println!("Raster: {}", config.raster_size);
    println!("Trace:  {:?}", config.trace_strategy);
    println!();

    let start = Instant::now();
    let mut session = Session::new(config);
    let loaded = if lattice {
        session.load_lattice_file(&input)?
    } else {
        session.load_file_async(&input).await?
    };
    println!("Loaded: {} voxels in {:.2}s", loaded, start.elapsed().as_secs_f64());

    for kind in &filters {
        let stage = Instant::now();
        let size = session.apply(*kind).size();
        println!("Filter {:<18} {} voxels in {:.2}s", kind.name(), size, stage.elapsed().as_secs_f64());
    }

    let mut region_size = None;
    if let Some(seed) = seed {
        let region = session.segment_at(seed);
        session.mark(&region);
        println!("Seed {}: {} voxels marked", seed, region.len());
        region_size = Some(region.len());
    }
    if let Some((origin, direction)) = ray {
        match session.segment_from_ray(origin, direction)? {
            Some(region) => {
                println!("Ray: {} voxels marked", region.len());
                region_size = Some(region.len());
            }
            None => println!("Ray: no voxel hit"),
        }
    }

    let volume = session.volume();
    if let Some(bounds) = session.bounds() {
        println!(
            "Bounds: {:?} .. {:?}, value {:.3} .. {:.3}",
            bounds.lattice_min.to_array(),
            bounds.lattice_max.to_array(),
            bounds.value.min,
            bounds.value.max
        );
    }

    if let Some(output) = parse_str_arg(args, "--output").map(PathBuf::from) {
        session.write_export(&output)?;
        println!("Output: {}", output.display());
    }

    if let Some(summary_path) = parse_str_arg(args, "--summary").map(PathBuf::from) {
        let histogram = session.histogram(16);
        let summary = json!({
            "input": input.display().to_string(),
            "config": session.config(),
            "filters": filters.iter().map(|k| k.name()).collect::<Vec<_>>(),
            "voxels": volume.size(),
            "marked": volume.marked_count(),
            "region": region_size,
            "total_value": volume.total_value(),
            "histogram": histogram,
            "elapsed_secs": start.elapsed().as_secs_f64(),
        });
        std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
        println!("Summary: {}", summary_path.display());
    }

    println!();
    println!("Done: {} voxels, {} marked", volume.size(), volume.marked_count());
    Ok(())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_i32_list_arg(args: &[String], flag: &str) -> Option<Vec<i32>> {
    parse_str_arg(args, flag)
        .and_then(|s| s.split(',').map(|p| p.trim().parse().ok()).collect())
}

fn parse_f32_list_arg(args: &[String], flag: &str) -> Option<Vec<f32>> {
    parse_str_arg(args, flag)
        .and_then(|s| s.split(',').map(|p| p.trim().parse().ok()).collect())
}
