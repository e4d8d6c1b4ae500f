use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    error::{GridreelError, GridreelResult},
    materialize::FrameRgb,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> GridreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GridreelError::encoding(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(GridreelError::encoding("encode fps must be non-zero"));
        }
        Ok(())
    }
}

/// Config for the default output: an uncompressed-rawvideo AVI at `fps`.
pub fn default_avi_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: out_path.into(),
        overwrite: true,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> GridreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Single scoped handle on the output container.
///
/// Frames are piped to the system `ffmpeg` binary as rgb24 rawvideo over
/// stdin; the container is closed by [`FfmpegEncoder::finish`], or on drop if
/// an error path abandons the encoder mid-write (the partial container is left
/// in place and must be treated as invalid).
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> GridreelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(GridreelError::encoding(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(GridreelError::encoding(
                "ffmpeg is required for video assembly, but was not found on PATH",
            ));
        }

        // System `ffmpeg` binary rather than `ffmpeg-next`, to avoid native
        // FFmpeg dev header/lib requirements.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "rawvideo",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            GridreelError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GridreelError::encoding("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child: Some(child),
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRgb) -> GridreelResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(GridreelError::shape_mismatch(format!(
                "frame is {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != (self.cfg.width * self.cfg.height * 3) as usize {
            return Err(GridreelError::encoding(
                "frame.data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(GridreelError::encoding(
                "ffmpeg encoder is already finalized",
            ));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            GridreelError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;

        Ok(())
    }

    pub fn finish(mut self) -> GridreelResult<()> {
        drop(self.stdin.take());

        let child = self
            .child
            .take()
            .ok_or_else(|| GridreelError::encoding("ffmpeg encoder is already finalized"))?;
        let output = child.wait_with_output().map_err(|e| {
            GridreelError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GridreelError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(
            EncodeConfig {
                width: 0,
                height: 10,
                fps: 1,
                out_path: PathBuf::from("out.avi"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );

        assert!(
            EncodeConfig {
                width: 10,
                height: 0,
                fps: 1,
                out_path: PathBuf::from("out.avi"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );

        assert!(
            EncodeConfig {
                width: 10,
                height: 10,
                fps: 0,
                out_path: PathBuf::from("out.avi"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn default_avi_config_overwrites() {
        let cfg = default_avi_config("ani.avi", 2, 1, 1);
        assert!(cfg.overwrite);
        assert_eq!(cfg.fps, 1);
        cfg.validate().unwrap();
    }
}
