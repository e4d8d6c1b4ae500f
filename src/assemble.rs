use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    encode_ffmpeg::{EncodeConfig, FfmpegEncoder},
    error::{GridreelError, GridreelResult},
    materialize,
};

/// Assemble ordered frame images into one video container.
///
/// The first frame fixes the canonical (width, height); any later frame with
/// different dimensions aborts with a shape mismatch before it is written.
/// `frames` must already be in numeric index order (see
/// [`crate::discover::discover_frames`]).
pub fn assemble_video(
    frames: &[(u64, PathBuf)],
    fps: u32,
    out_path: &Path,
    overwrite: bool,
) -> GridreelResult<()> {
    let Some(((_, first_path), rest)) = frames.split_first() else {
        return Err(GridreelError::encoding(
            "cannot assemble a video from zero frames (no dimensions to establish)",
        ));
    };

    let first = materialize::read_frame(first_path)?;
    info!(
        width = first.width,
        height = first.height,
        frames = frames.len(),
        fps,
        "assembling video"
    );

    let cfg = EncodeConfig {
        width: first.width,
        height: first.height,
        fps,
        out_path: out_path.to_path_buf(),
        overwrite,
    };
    let mut enc = FfmpegEncoder::new(cfg)?;
    enc.encode_frame(&first)?;

    for (idx, path) in rest {
        let frame = materialize::read_frame(path)?;
        if frame.width != first.width || frame.height != first.height {
            return Err(GridreelError::shape_mismatch(format!(
                "frame {idx} ('{}') is {}x{}, expected {}x{}",
                path.display(),
                frame.width,
                frame.height,
                first.width,
                first.height
            )));
        }
        enc.encode_frame(&frame)?;
    }

    enc.finish()?;
    info!(out = %out_path.display(), "video written");
    Ok(())
}
