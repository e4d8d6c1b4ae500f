use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    assemble,
    colormap::OverflowPolicy,
    discover::{self, IndexMode},
    error::{GridreelError, GridreelResult},
    grid, materialize,
};

/// What happens to the intermediate frame images after a successful assembly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Delete each frame, best-effort: a failed delete is logged and skipped.
    #[default]
    Remove,
    /// Leave the frames on disk next to the video.
    Keep,
}

/// Explicit configuration for one pipeline run. There is no other state; the
/// working directory is never consulted implicitly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the `file{N}` inputs.
    pub input_dir: PathBuf,
    /// Directory the `img{N}.png` frames are written into.
    pub output_dir: PathBuf,
    /// Path of the final video.
    pub video_path: PathBuf,
    /// Output frame rate.
    pub fps: u32,
    pub index_mode: IndexMode,
    pub overflow: OverflowPolicy,
    pub cleanup: CleanupPolicy,
    /// Fan the per-index materialize stage out over a rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // Defaults mirror the upstream layout: dumps in ./output, frames and
        // the video in the working directory, one frame per second.
        Self {
            input_dir: PathBuf::from("output"),
            output_dir: PathBuf::from("."),
            video_path: PathBuf::from("ani.avi"),
            fps: 1,
            index_mode: IndexMode::Auto,
            overflow: OverflowPolicy::Clamp,
            cleanup: CleanupPolicy::Remove,
            parallel: false,
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub removed: u64,
}

/// Deterministic frame path for one input index.
pub fn frame_path(output_dir: &Path, index: u64) -> PathBuf {
    output_dir.join(format!("img{index}.png"))
}

fn materialize_index(cfg: &PipelineConfig, index: u64, input: &Path) -> GridreelResult<PathBuf> {
    let grid = grid::parse_grid(input)?;
    let path = frame_path(&cfg.output_dir, index);
    materialize::write_frame(&grid, cfg.overflow, &path)?;
    Ok(path)
}

/// Materialize one frame per discovered input.
///
/// Independent per index; with `cfg.parallel` the indices fan out over rayon,
/// collecting one result per index. Any failure fails the whole batch — no
/// partial success is reported.
pub fn materialize_all(cfg: &PipelineConfig, inputs: &[(u64, PathBuf)]) -> GridreelResult<()> {
    if cfg.parallel {
        let results: Vec<GridreelResult<PathBuf>> = inputs
            .par_iter()
            .map(|(idx, path)| materialize_index(cfg, *idx, path))
            .collect();
        for result in results {
            result?;
        }
    } else {
        for (idx, path) in inputs {
            materialize_index(cfg, *idx, path)?;
        }
    }
    info!(count = inputs.len(), "materialized frames");
    Ok(())
}

/// Run the whole pipeline:
/// discover inputs → materialize ×N → discover frames → assemble → clean up.
#[tracing::instrument(skip_all, fields(input_dir = %cfg.input_dir.display()))]
pub fn run(cfg: &PipelineConfig) -> GridreelResult<RunSummary> {
    let inputs = discover::discover_inputs(&cfg.input_dir, cfg.index_mode)?;
    if inputs.is_empty() {
        return Err(GridreelError::not_found(format!(
            "no 'file{{N}}' inputs in '{}'",
            cfg.input_dir.display()
        )));
    }
    info!(count = inputs.len(), "discovered inputs");

    materialize_all(cfg, &inputs)?;

    let frames = discover::discover_frames(&cfg.output_dir)?;
    assemble::assemble_video(&frames, cfg.fps, &cfg.video_path, true)?;

    let removed = match cfg.cleanup {
        CleanupPolicy::Remove => cleanup_frames(&frames),
        CleanupPolicy::Keep => 0,
    };

    Ok(RunSummary {
        frames: frames.len() as u64,
        removed,
    })
}

/// Delete assembled frame images, best-effort per file. Returns the number
/// actually removed; failures are logged and skipped.
pub fn cleanup_frames(frames: &[(u64, PathBuf)]) -> u64 {
    let mut removed = 0;
    for (_, path) in frames {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove frame"),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_mirrors_the_upstream_layout() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.input_dir, PathBuf::from("output"));
        assert_eq!(cfg.video_path, PathBuf::from("ani.avi"));
        assert_eq!(cfg.fps, 1);
        assert_eq!(cfg.index_mode, IndexMode::Auto);
        assert_eq!(cfg.overflow, OverflowPolicy::Clamp);
        assert_eq!(cfg.cleanup, CleanupPolicy::Remove);
    }

    #[test]
    fn config_json_roundtrip_with_partial_input() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"fps": 4, "overflow": "wrap", "index_mode": {"fixed": 3}}"#)
                .unwrap();
        assert_eq!(cfg.fps, 4);
        assert_eq!(cfg.overflow, OverflowPolicy::Wrap);
        assert_eq!(cfg.index_mode, IndexMode::Fixed(3));
        assert_eq!(cfg.input_dir, PathBuf::from("output"));

        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fps, cfg.fps);
        assert_eq!(back.index_mode, cfg.index_mode);
    }

    #[test]
    fn frame_paths_are_deterministic() {
        assert_eq!(
            frame_path(Path::new("/tmp/x"), 12),
            PathBuf::from("/tmp/x/img12.png")
        );
    }

    #[test]
    fn cleanup_is_best_effort() {
        let dir = std::env::temp_dir().join(format!(
            "gridreel_cleanup_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let present = dir.join("img0.png");
        std::fs::write(&present, b"x").unwrap();
        let missing = dir.join("img1.png");

        let frames = vec![(0u64, present.clone()), (1u64, missing)];
        assert_eq!(cleanup_frames(&frames), 1);
        assert!(!present.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
