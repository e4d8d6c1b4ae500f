//! gridreel turns numbered scalar-grid dump files into PNG frames and stitches
//! the frames, in index order, into a single video file.
//!
//! An upstream process periodically dumps a 2D grid of floating-point values
//! as text (`file0`, `file1`, ...). gridreel maps each grid to an RGB8 image
//! through a fixed single-channel encoding, writes one `img{N}.png` per input,
//! and streams the images into the system `ffmpeg` binary as rawvideo frames.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: enumerate `file{N}` inputs and fix the index range
//! 2. **Materialize**: parse each grid, map scalars to pixels, write `img{N}.png`
//! 3. **Assemble**: feed the frames, in numeric order, to `ffmpeg`
//! 4. **Clean up**: remove the intermediate frames (policy-controlled)
//!
//! Every error aborts the whole run; there is no retry logic and no
//! resumability. A failed run requires restarting with a cleared output
//! directory.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod colormap;
pub mod discover;
pub mod encode_ffmpeg;
pub mod error;
pub mod grid;
pub mod materialize;
pub mod pipeline;

pub use assemble::assemble_video;
pub use colormap::{OverflowPolicy, map_row, map_scalar};
pub use discover::{IndexMode, discover_frames, discover_inputs};
pub use encode_ffmpeg::{
    EncodeConfig, FfmpegEncoder, default_avi_config, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use error::{GridreelError, GridreelResult};
pub use grid::{Grid, parse_grid};
pub use materialize::{FrameRgb, grid_to_rgb8, read_frame, write_frame};
pub use pipeline::{
    CleanupPolicy, PipelineConfig, RunSummary, cleanup_frames, frame_path, materialize_all, run,
};
