use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gridreel::{CleanupPolicy, IndexMode, OverflowPolicy, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "gridreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: discover, materialize frames, assemble the
    /// video, clean up (requires `ffmpeg` on PATH).
    Run(RunArgs),
    /// Materialize frame images only; leave them on disk.
    Frames(RunArgs),
    /// Assemble an existing img{N}.png set into a video.
    Assemble(AssembleArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Pipeline config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing file{N} inputs.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory to write img{N}.png frames into.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output video path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Process exactly file0..file{COUNT-1} instead of inferring the range.
    #[arg(long)]
    count: Option<u64>,

    /// Wrap out-of-range channel values mod 256 instead of clamping.
    #[arg(long)]
    wrap: bool,

    /// Materialize frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Keep intermediate frames after assembly.
    #[arg(long)]
    keep_frames: bool,
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Directory containing img{N}.png frames.
    #[arg(long, default_value = ".")]
    frames_dir: PathBuf,

    /// Output video path.
    #[arg(long, default_value = "ani.avi")]
    out: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 1)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Assemble(args) => cmd_assemble(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<PipelineConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: PipelineConfig =
        serde_json::from_reader(r).with_context(|| "parse pipeline config JSON")?;
    Ok(cfg)
}

fn load_config(args: &RunArgs) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => read_config_json(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(dir) = &args.input_dir {
        cfg.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(out) = &args.out {
        cfg.video_path = out.clone();
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(count) = args.count {
        cfg.index_mode = IndexMode::Fixed(count);
    }
    if args.wrap {
        cfg.overflow = OverflowPolicy::Wrap;
    }
    if args.parallel {
        cfg.parallel = true;
    }
    if args.keep_frames {
        cfg.cleanup = CleanupPolicy::Keep;
    }
    Ok(cfg)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let summary = gridreel::run(&cfg)?;
    eprintln!(
        "wrote {} ({} frames, {} cleaned up)",
        cfg.video_path.display(),
        summary.frames,
        summary.removed
    );
    Ok(())
}

fn cmd_frames(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let inputs = gridreel::discover_inputs(&cfg.input_dir, cfg.index_mode)?;
    anyhow::ensure!(
        !inputs.is_empty(),
        "no 'file{{N}}' inputs in '{}'",
        cfg.input_dir.display()
    );
    gridreel::materialize_all(&cfg, &inputs)?;
    eprintln!(
        "wrote {} frames to {}",
        inputs.len(),
        cfg.output_dir.display()
    );
    Ok(())
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let frames = gridreel::discover_frames(&args.frames_dir)?;
    gridreel::assemble_video(&frames, args.fps, &args.out, true)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
