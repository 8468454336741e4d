//! Terrain streaming demo: walks a reference point across the world
//! and mirrors chunk churn into a stand-in upload table, the way a
//! renderer would mirror GPU buffers.

mod config;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use hashbrown::HashMap;

use flur_field::{TerrainField, TerrainParams};
use flur_geom::{Aabb, Vec3};
use flur_lattice::ChunkCoord;
use flur_mesh::ChunkMesh;
use flur_store::{ChunkStore, StreamParams};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config with [terrain] and [stream] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Update steps to walk along +x
    #[arg(long, default_value_t = 64)]
    steps: u32,

    /// World units moved per step
    #[arg(long, default_value_t = 4.0)]
    stride: f64,

    /// Override the configured resident radius
    #[arg(long)]
    radius: Option<i32>,
}

/// What a renderer would retain per resident chunk after upload.
struct UploadedBuffers {
    verts: usize,
    tris: usize,
}

fn upload(mesh: &ChunkMesh) -> UploadedBuffers {
    UploadedBuffers {
        verts: mesh.build.vertex_count(),
        tris: mesh.build.triangle_count(),
    }
}

fn merge_bounds(bounds: Option<Aabb>, bbox: Aabb) -> Aabb {
    match bounds {
        None => bbox,
        Some(b) => Aabb {
            min: Vec3::new(
                b.min.x.min(bbox.min.x),
                b.min.y.min(bbox.min.y),
                b.min.z.min(bbox.min.z),
            ),
            max: Vec3::new(
                b.max.x.max(bbox.max.x),
                b.max.y.max(bbox.max.y),
                b.max.z.max(bbox.max.z),
            ),
        },
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let cfg = match &args.config {
        Some(path) => config::load_app_config(path)?,
        None => AppConfig::default(),
    };
    let mut stream = cfg.stream.clone();
    if let Some(r) = args.radius {
        stream.radius = r;
    }
    let params = StreamParams::from_config(&stream)?;
    let field = TerrainField::new(TerrainParams::from_config(&cfg.terrain));
    let mut store = ChunkStore::new(Arc::new(field), params);

    let mut uploaded: HashMap<ChunkCoord, UploadedBuffers> = HashMap::new();
    let mut bounds: Option<Aabb> = None;
    let mut created_total = 0usize;
    let mut evicted_total = 0usize;

    let t_run = Instant::now();
    for step in 0..args.steps {
        let x = f64::from(step) * args.stride;
        let up = store.update(x, 0.0);
        for c in &up.evicted {
            uploaded.remove(c);
            log::debug!("[step {}] ChunkDropped ({}, {})", step, c.cx, c.cz);
        }
        for c in &up.created {
            if let Some(mesh) = store.get(*c) {
                let buffers = upload(mesh);
                log::debug!(
                    "[step {}] ChunkReady ({}, {}) verts={} tris={}",
                    step,
                    c.cx,
                    c.cz,
                    buffers.verts,
                    buffers.tris
                );
                bounds = Some(merge_bounds(bounds, mesh.bbox));
                uploaded.insert(*c, buffers);
            }
        }
        created_total += up.created.len();
        evicted_total += up.evicted.len();
        if !up.is_empty() {
            log::info!(
                "[step {}] x={:.1} created={} evicted={} resident={}",
                step,
                x,
                up.created.len(),
                up.evicted.len(),
                store.len()
            );
        }
    }
    let run_ms = t_run.elapsed().as_millis();

    let live_verts: usize = uploaded.values().map(|b| b.verts).sum();
    let live_tris: usize = uploaded.values().map(|b| b.tris).sum();
    println!(
        "walked {} steps: created={} evicted={} resident={} live_verts={} live_tris={} workers={} run_ms={}",
        args.steps,
        created_total,
        evicted_total,
        store.len(),
        live_verts,
        live_tris,
        store.workers(),
        run_ms
    );
    if let Some(b) = bounds {
        println!(
            "meshed bounds ({:.1}, {:.1}, {:.1}) .. ({:.1}, {:.1}, {:.1})",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        );
    }
    Ok(())
}
