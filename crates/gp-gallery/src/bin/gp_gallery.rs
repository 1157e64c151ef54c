use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use serde::Serialize;

use geoportrait::{MeshStrategy, PortraitConfig, build_mesh, decode_image};
use gp_core::{Mesh, MeshPoint, Triangle};
use gp_edge::EdgeExtractor;
use gp_mesh::{FallbackConfig, SampleConfig, silhouette_mesh};
use gp_reveal::{PointerState, reveal_frame};
use gp_trace::TraceConfig;

#[derive(Parser, Debug)]
#[command(name = "gp_gallery")]
#[command(about = "Run geoportrait pipeline stages on external images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the edge magnitude field as a grayscale PNG
    #[command(name = "edge_field")]
    EdgeField(EdgeFieldArgs),
    /// Edge-sampled Delaunay mesh: JSON + SVG
    #[command(name = "mesh")]
    Mesh(MeshArgs),
    /// Traced line-art segments: JSON + SVG
    #[command(name = "lineart")]
    LineArt(LineArtArgs),
    /// Procedural silhouette mesh (no input image): JSON + SVG
    #[command(name = "fallback")]
    Fallback(FallbackArgs),
    /// Per-element reveal opacities for one pointer position
    #[command(name = "reveal")]
    Reveal(RevealArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out/gallery")]
    out: PathBuf,
    #[arg(long, default_value_t = 280)]
    width: u32,
    #[arg(long, default_value_t = 350)]
    height: u32,
}

#[derive(Args, Debug, Clone)]
struct EdgeFieldArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
struct MeshArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 60.0)]
    threshold: f32,
    #[arg(long, default_value_t = 0.25)]
    density: f32,
    #[arg(long, default_value_t = 380)]
    max_points: usize,
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Args, Debug, Clone)]
struct LineArtArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 180)]
    threshold: u8,
    #[arg(long, default_value_t = 6.0)]
    min_segment_length: f32,
}

#[derive(Args, Debug, Clone)]
struct FallbackArgs {
    #[arg(long, default_value = "out/gallery")]
    out: PathBuf,
    #[arg(long, default_value_t = 280)]
    width: u32,
    #[arg(long, default_value_t = 350)]
    height: u32,
    #[arg(long, default_value_t = 11)]
    cols: usize,
    #[arg(long, default_value_t = 14)]
    rows: usize,
}

#[derive(Args, Debug, Clone)]
struct RevealArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 140.0)]
    pointer_x: f32,
    #[arg(long, default_value_t = 175.0)]
    pointer_y: f32,
    #[arg(long, default_value_t = 70.0)]
    radius: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MeshDto {
    width: u32,
    height: u32,
    points: Vec<MeshPoint>,
    triangles: Vec<[i32; 3]>,
    lines: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaEdgeField {
    working_width: usize,
    working_height: usize,
    max_magnitude: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaMesh {
    threshold: f32,
    density: f32,
    max_points: usize,
    seed: u64,
    point_count: usize,
    triangle_count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaLineArt {
    threshold: u8,
    min_segment_length: f32,
    segment_count: usize,
    point_count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaFallback {
    cols: usize,
    rows: usize,
    point_count: usize,
    triangle_count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct RevealDto {
    pointer_x: f32,
    pointer_y: f32,
    radius: f32,
    visible_points: usize,
    visible_triangles: usize,
    points: Vec<f32>,
    triangles: Vec<f32>,
    lines: Vec<f32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::EdgeField(args) => run_edge_field(args),
        Command::Mesh(args) => run_mesh(args),
        Command::LineArt(args) => run_lineart(args),
        Command::Fallback(args) => run_fallback(args),
        Command::Reveal(args) => run_reveal(args),
    }
}

fn run_edge_field(args: EdgeFieldArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "edge_field")?;
    let cfg = edge_config(&args.common, SampleConfig::default());
    let img = load_decoded(&args.common.input, &cfg)?;

    let mut extractor = EdgeExtractor::new();
    let field = extractor
        .extract_rgba(img.rgba(), img.width(), img.height())
        .context("extracting edge field")?;

    let vis = f32_to_u8_vis(&field.magnitude);
    save_luma_raw(case_dir.join("magnitude.png"), field.width, field.height, vis)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaEdgeField {
            working_width: field.width,
            working_height: field.height,
            max_magnitude: field.max_magnitude(),
        },
    )?;

    println!(
        "edge field {}x{}, max magnitude {:.1}",
        field.width, field.height,
        field.max_magnitude()
    );
    Ok(())
}

fn run_mesh(args: MeshArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "mesh")?;
    let params = SampleConfig {
        threshold: args.threshold,
        density: args.density,
        max_points: args.max_points,
        seed: args.seed,
    };
    let cfg = edge_config(&args.common, params.clone());
    let img = load_decoded(&args.common.input, &cfg)?;
    let mesh = build_mesh(&img, &cfg).context("building edge mesh")?;

    write_json(case_dir.join("mesh.json"), &mesh_dto(&mesh, &args.common))?;
    write_svg(
        case_dir.join("mesh.svg"),
        &mesh,
        args.common.width,
        args.common.height,
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaMesh {
            threshold: params.threshold,
            density: params.density,
            max_points: params.max_points,
            seed: params.seed,
            point_count: mesh.points.len(),
            triangle_count: mesh.triangles.len(),
        },
    )?;

    println!(
        "mesh: {} points, {} triangles",
        mesh.points.len(),
        mesh.triangles.len()
    );
    Ok(())
}

fn run_lineart(args: LineArtArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "lineart")?;
    let params = TraceConfig {
        threshold: args.threshold,
        min_segment_length: args.min_segment_length,
    };
    let cfg = PortraitConfig {
        target_width: args.common.width,
        target_height: args.common.height,
        strategy: MeshStrategy::LineArt(params.clone()),
        ..PortraitConfig::default()
    };
    let img = load_decoded(&args.common.input, &cfg)?;
    let mesh = build_mesh(&img, &cfg).context("tracing line art")?;

    write_json(case_dir.join("mesh.json"), &mesh_dto(&mesh, &args.common))?;
    write_svg(
        case_dir.join("mesh.svg"),
        &mesh,
        args.common.width,
        args.common.height,
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaLineArt {
            threshold: params.threshold,
            min_segment_length: params.min_segment_length,
            segment_count: mesh.lines.len(),
            point_count: mesh.points.len(),
        },
    )?;

    println!(
        "line art: {} segments, {} distinct points",
        mesh.lines.len(),
        mesh.points.len()
    );
    Ok(())
}

fn run_fallback(args: FallbackArgs) -> Result<()> {
    let case_dir = prepare_case(&args.out, "fallback")?;
    let params = FallbackConfig {
        cols: args.cols,
        rows: args.rows,
        ..FallbackConfig::default()
    };
    let mesh = silhouette_mesh(args.width as f32, args.height as f32, &params);

    let common = CommonArgs {
        input: PathBuf::new(),
        out: args.out,
        width: args.width,
        height: args.height,
    };
    write_json(case_dir.join("mesh.json"), &mesh_dto(&mesh, &common))?;
    write_svg(case_dir.join("mesh.svg"), &mesh, args.width, args.height)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaFallback {
            cols: params.cols,
            rows: params.rows,
            point_count: mesh.points.len(),
            triangle_count: mesh.triangles.len(),
        },
    )?;

    println!(
        "fallback silhouette: {} points, {} triangles",
        mesh.points.len(),
        mesh.triangles.len()
    );
    Ok(())
}

fn run_reveal(args: RevealArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "reveal")?;
    let cfg = edge_config(&args.common, SampleConfig::default());
    let img = load_decoded(&args.common.input, &cfg)?;
    let mesh = build_mesh(&img, &cfg).context("building edge mesh")?;

    let pointer = PointerState::at(args.pointer_x, args.pointer_y);
    let frame = reveal_frame(&pointer, &mesh, args.radius);

    let visible_points = frame.points.iter().filter(|&&o| o > 0.0).count();
    let visible_triangles = frame.triangles.iter().filter(|&&o| o > 0.0).count();

    write_json(
        case_dir.join("reveal.json"),
        &RevealDto {
            pointer_x: args.pointer_x,
            pointer_y: args.pointer_y,
            radius: args.radius,
            visible_points,
            visible_triangles,
            points: frame.points,
            triangles: frame.triangles,
            lines: frame.lines,
        },
    )?;

    println!(
        "reveal at ({:.1}, {:.1}): {visible_points}/{} points, {visible_triangles}/{} triangles",
        args.pointer_x,
        args.pointer_y,
        mesh.points.len(),
        mesh.triangles.len()
    );
    Ok(())
}

fn edge_config(common: &CommonArgs, params: SampleConfig) -> PortraitConfig {
    PortraitConfig {
        target_width: common.width,
        target_height: common.height,
        strategy: MeshStrategy::Edge(params),
        ..PortraitConfig::default()
    }
}

fn load_decoded(path: &Path, cfg: &PortraitConfig) -> Result<geoportrait::DecodedImage> {
    ensure_file_exists(path, "input")?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_image(&bytes, cfg).with_context(|| format!("decoding {}", path.display()))
}

fn prepare_case(out: &Path, case_name: &str) -> Result<PathBuf> {
    let case_dir = out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;
    Ok(case_dir)
}

fn mesh_dto(mesh: &Mesh, common: &CommonArgs) -> MeshDto {
    MeshDto {
        width: common.width,
        height: common.height,
        points: mesh.points.clone(),
        triangles: mesh.triangles.iter().map(triangle_ids).collect(),
        lines: mesh
            .lines
            .iter()
            .map(|s| [s.a.id, s.b.id])
            .collect(),
    }
}

fn triangle_ids(t: &Triangle) -> [i32; 3] {
    [t.a.id, t.b.id, t.c.id]
}

fn write_svg(path: PathBuf, mesh: &Mesh, width: u32, height: u32) -> Result<()> {
    let mut file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    writeln!(
        file,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}">"#
    )
    .context("writing svg header")?;

    for t in &mesh.triangles {
        writeln!(
            file,
            r##"  <polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="none" stroke="#888" stroke-width="0.5"/>"##,
            t.a.x, t.a.y, t.b.x, t.b.y, t.c.x, t.c.y
        )
        .context("writing svg triangle")?;
    }

    for s in &mesh.lines {
        writeln!(
            file,
            r##"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#444" stroke-width="0.8"/>"##,
            s.a.x, s.a.y, s.b.x, s.b.y
        )
        .context("writing svg segment")?;
    }

    for p in &mesh.points {
        writeln!(
            file,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="1" fill="#222"/>"##,
            p.x, p.y
        )
        .context("writing svg point")?;
    }

    writeln!(file, "</svg>").context("writing svg footer")
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn save_luma_raw(path: PathBuf, width: usize, height: usize, data: Vec<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(width as u32, height as u32, data)
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn f32_to_u8_vis(data: &[f32]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut max_v = 0.0f32;
    for &v in data {
        if v > max_v {
            max_v = v;
        }
    }
    if max_v < 1e-12 {
        return vec![0u8; data.len()];
    }

    let scale = 255.0 / max_v;
    data.iter()
        .map(|&v| (v * scale).round().clamp(0.0, 255.0) as u8)
        .collect()
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
