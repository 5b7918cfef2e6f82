use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    DirSource, FrameRenderer, FrameRgba, FrameStore, ManualFrameClock, Region, ScrollScene,
    SiteConfig, StackedLayout, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one region at a fixed progress as a PNG.
    Frame(FrameArgs),
    /// Scroll the whole page in even steps and write one composited PNG per step.
    Scroll(ScrollArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Site config JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that frame paths resolve under.
    #[arg(long)]
    assets: PathBuf,

    /// Override loader worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Region to draw (primary|secondary|tertiary).
    #[arg(long, default_value = "primary")]
    region: String,

    /// Scroll progress of the region in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrollArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Number of scroll steps from top to bottom (writes steps + 1 images).
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scroll(args) => cmd_scroll(args),
    }
}

/// Load config and every sequence, waiting for background sequences too.
fn load(args: &SourceArgs) -> anyhow::Result<(SiteConfig, FrameStore)> {
    let config = match &args.config {
        Some(path) => SiteConfig::from_json_file(path)?,
        None => SiteConfig::default(),
    };
    config.validate()?;

    let store = FrameStore::from_config(&config);
    let source = Arc::new(DirSource::new(&args.assets));
    let preload = scrollreel::preload(&config, &store, source, args.threads)?;
    let progress = Arc::clone(&preload.progress);
    for report in preload.finish() {
        tracing::info!(
            region = %report.region,
            loaded = report.loaded,
            failed = report.failed,
            aborted = report.aborted,
            "sequence settled"
        );
    }
    tracing::info!(percent = progress.percent(), "preload complete");
    Ok((config, store))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let region = Region::parse(&args.region)?;
    let (config, store) = load(&args.source)?;
    let viewport = Viewport::new(args.source.width, args.source.height);

    let scene = ScrollScene::new(config, store, viewport)?;
    let mut renderer = FrameRenderer::new(
        region,
        scene.config().sequence(region).render,
        scene.renderer(region).style(),
        viewport,
    )?;
    let outcome = renderer.render(scene.store().sequence(region), args.progress);
    tracing::info!(%region, progress = args.progress, ?outcome, "rendered");

    write_png(&args.out, renderer.surface().readback())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scroll(args: ScrollArgs) -> anyhow::Result<()> {
    let (config, store) = load(&args.source)?;
    let viewport = Viewport::new(args.source.width, args.source.height);
    let fade_ms = config.fade_ms;

    let mut layout = StackedLayout::new(viewport, config.section_height_vh)?;
    let mut clock = ManualFrameClock::new();
    let mut scene = ScrollScene::new(config, store, viewport)?;
    scene.mount(&layout, &mut clock);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let steps = args.steps.max(1);
    for step in 0..=steps {
        layout.scroll_to_fraction(f64::from(step) / f64::from(steps));
        scene.on_scroll(&mut clock);
        // One refresh for the scroll tick, one for the redraw it requests.
        for _ in 0..2 {
            for token in clock.next_refresh() {
                scene.on_animation_frame(token, &layout, &mut clock);
            }
        }
        scene.advance_fade(fade_ms);

        let out = args.out_dir.join(format!("step_{step:03}.png"));
        write_png(&out, scene.composite()?)?;
        tracing::debug!(step, active = %scene.active(), path = %out.display(), "wrote step");
    }

    scene.teardown(&mut clock);
    eprintln!("wrote {} frames to {}", steps + 1, args.out_dir.display());
    Ok(())
}

fn write_png(path: &Path, frame: FrameRgba) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = frame.into_straight();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
