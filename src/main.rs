//! bonnie-gl - render OBJ models with the software pipeline
//!
//! All models share one frame: one camera, one depth buffer, one image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use bonnie_gl::config::{load_config, save_config, SceneConfig};
use bonnie_gl::model::Model;
use bonnie_gl::rasterizer::{DepthBuffer, Image};
use bonnie_gl::shading::{draw_model, NormalMapShader};
use bonnie_gl::VERSION;

#[derive(Parser)]
#[command(name = "bonnie-gl")]
#[command(author, version, about = "Software rasterizer for OBJ models")]
#[command(long_about = "
Renders one or more Wavefront OBJ models into a single image on the CPU.
Texture maps named <model>_diffuse.tga, <model>_nm_tangent.tga and
<model>_spec.tga are picked up from the model's directory.

Examples:
  bonnie-gl obj/head.obj
  bonnie-gl obj/head.obj obj/eyes.obj -o head.png
  bonnie-gl -c scene.ron obj/diablo.obj --width 1024 --height 1024
  bonnie-gl --dump-config scene.ron
")]
struct Cli {
    /// Input models
    #[arg(required_unless_present = "dump_config")]
    models: Vec<PathBuf>,

    /// Scene file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output image, overrides the scene file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raster width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Raster height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write the effective scene file and exit
    #[arg(long, value_name = "FILE")]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }

    if let Some(path) = &cli.dump_config {
        save_config(&config, path)
            .with_context(|| format!("Failed to write scene {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
        return Ok(());
    }

    log::info!("=== Bonnie GL v{} ===", VERSION);
    render(&cli.models, &config)
}

fn render(models: &[PathBuf], config: &SceneConfig) -> Result<()> {
    let frame = config.frame_transforms();
    let mut target = Image::filled(config.width, config.height, config.background());
    let mut depth = DepthBuffer::new(config.width, config.height);

    for path in models {
        let model = Model::from_file(path)
            .with_context(|| format!("Failed to load model {}", path.display()))?;
        let mut shader = NormalMapShader::new(&model, &frame, config.light_dir(), config.lighting);

        let bar = ProgressBar::new(model.nfaces() as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} faces")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        bar.set_message(path.display().to_string());

        draw_model(&mut shader, &frame, &mut target, &mut depth, |_| bar.inc(1));
        bar.finish();
    }

    // Row 0 is the bottom of the frame; files store the top row first
    target.flip_vertically();
    target
        .save(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!(
        "Wrote {}x{} image to {}",
        config.width,
        config.height,
        config.output.display()
    );
    Ok(())
}
