use std::convert::TryFrom;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sphere_tracer::color::Rgb8;
use sphere_tracer::config::{ RenderJob, SceneJson };
use sphere_tracer::consts::OUT_FILE;

/// Renders a scene of spheres with a recursive ray tracer.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Scene description (JSON). The built-in scene is used when omitted.
    scene: Option<PathBuf>,

    /// Where to save the image; `.png` or `.ppm`.
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Override the canvas width, in pixels.
    #[clap(long)]
    width: Option<usize>,

    /// Override the canvas height, in pixels.
    #[clap(long)]
    height: Option<usize>,

    /// Override the maximum trace depth (1 disables reflections).
    #[clap(long)]
    depth: Option<u32>,

    /// Override the background color, as `R,G,B`.
    #[clap(long, parse(try_from_str = parse_rgb))]
    background: Option<Rgb8>,

    /// Print the effective scene description as JSON and exit.
    #[clap(long)]
    dump_scene: bool,
}

fn parse_rgb(s: &str) -> Result<Rgb8, String> {
    let channels = s.split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|e| format!("{:?}: {}", c, e)))
        .collect::<Result<Vec<u8>, String>>()?;

    match channels.as_slice() {
        &[r, g, b] => Ok([r, g, b]),
        _ => Err(format!("expected three channels, got {}", channels.len())),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();

    let mut scene_json = match args.scene {
        Some(ref path) => SceneJson::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            log::info!("No scene file given; using the built-in scene");
            SceneJson::default()
        },
    };

    if let Some(width) = args.width {
        scene_json.canvas_width = width;
    }
    if let Some(height) = args.height {
        scene_json.canvas_height = height;
    }
    if let Some(depth) = args.depth {
        scene_json.max_depth = depth;
    }
    if let Some(background) = args.background {
        scene_json.background = background;
    }

    if args.dump_scene {
        println!("{}", scene_json.to_json()?);
        return Ok(());
    }

    let job = RenderJob::try_from(scene_json).context("invalid scene")?;
    let canvas = job.render();

    canvas.save(&args.output)
        .with_context(|| format!("failed to save {}", args.output.display()))?;
    log::info!("Saved render to {}.", args.output.display());

    Ok(())
}

#[test]
fn parse_rgb_accepts_three_bytes() {
    assert_eq!(parse_rgb("255, 128,0"), Ok([255, 128, 0]));
    assert!(parse_rgb("255,0").is_err());
    assert!(parse_rgb("256,0,0").is_err());
}
