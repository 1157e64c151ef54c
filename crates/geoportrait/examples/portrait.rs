//! Example: build a portrait mesh from a photo and sweep the reveal.
//!
//! Loads an image, runs the edge-field strategy through `PortraitEngine`,
//! and simulates a pointer sweeping diagonally across the canvas, printing
//! how many elements are visible at each step. The finished mesh is
//! written to a JSON file next to the input image.
//!
//! Run from the workspace root:
//!   cargo run -p geoportrait --example portrait -- --help
//!   cargo run -p geoportrait --example portrait -- --input photo.png

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use geoportrait::{
    MeshStrategy, PointerState, PortraitConfig, PortraitEngine, PortraitState, SampleConfig,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Build a geometric portrait mesh from a photo")]
struct Args {
    /// Path to the input image (default: data/portrait.png)
    #[arg(long, default_value = "data/portrait.png")]
    input: String,

    /// Target canvas width
    #[arg(long, default_value_t = 280)]
    width: u32,

    /// Target canvas height
    #[arg(long, default_value_t = 350)]
    height: u32,

    /// Reveal radius around the pointer, in canvas units
    #[arg(long, default_value_t = 70.0)]
    radius: f32,

    /// Feature sampler seed (same seed + same image = same mesh)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of pointer positions in the diagonal sweep
    #[arg(long, default_value_t = 8)]
    sweep_steps: usize,

    /// Output JSON path (default: <input stem>_mesh.json next to input)
    #[arg(long)]
    out: Option<String>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MeshDump<'a> {
    width: u32,
    height: u32,
    mesh: &'a geoportrait::Mesh,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let img_path = &args.input;
    let out_path = args.out.unwrap_or_else(|| {
        let p = std::path::Path::new(img_path);
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let dir = p.parent().unwrap_or(std::path::Path::new("."));
        dir.join(format!("{stem}_mesh.json"))
            .to_string_lossy()
            .into_owned()
    });

    let bytes = std::fs::read(img_path).with_context(|| format!("reading {img_path}"))?;

    let cfg = PortraitConfig {
        target_width: args.width,
        target_height: args.height,
        reveal_radius: args.radius,
        strategy: MeshStrategy::Edge(SampleConfig {
            seed: args.seed,
            ..SampleConfig::default()
        }),
    };
    let mut engine = PortraitEngine::new(cfg);

    let t0 = Instant::now();
    engine.load_image(&bytes);
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    match engine.state() {
        PortraitState::Ready(mesh) => {
            println!(
                "built mesh from {img_path}: {} points, {} triangles  ({elapsed_ms:.2} ms)",
                mesh.points.len(),
                mesh.triangles.len()
            );
        }
        PortraitState::Failed(err) => {
            println!("load failed ({err}); using the fallback silhouette");
        }
        other => anyhow::bail!("unexpected state after load: {other:?}"),
    }

    // Sweep the pointer along the canvas diagonal and count visible elements.
    let mesh = engine.display_mesh();
    let steps = args.sweep_steps.max(2);
    for i in 0..steps {
        let t = i as f32 / (steps - 1) as f32;
        let pointer = PointerState::at(t * args.width as f32, t * args.height as f32);
        let frame = engine.reveal(&pointer);

        let visible_points = frame.points.iter().filter(|&&o| o > 0.0).count();
        let visible_tris = frame.triangles.iter().filter(|&&o| o > 0.0).count();
        println!(
            "  pointer ({:6.1}, {:6.1}): {visible_points}/{} points, {visible_tris}/{} triangles visible",
            pointer.x,
            pointer.y,
            mesh.points.len(),
            mesh.triangles.len()
        );
    }

    let dump = MeshDump {
        width: args.width,
        height: args.height,
        mesh,
    };
    let out_file =
        std::fs::File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    serde_json::to_writer_pretty(out_file, &dump)
        .with_context(|| format!("writing JSON to {out_path}"))?;

    println!("mesh written to {out_path}");
    Ok(())
}
