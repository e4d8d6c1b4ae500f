use std::path::Path;

use anyhow::Context as _;

use crate::{
    colormap::{self, OverflowPolicy},
    encode_ffmpeg::ensure_parent_dir,
    error::{GridreelError, GridreelResult},
    grid::Grid,
};

/// One decoded frame: RGB8, no alpha, `data.len() == width * height * 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Apply the scalar-to-pixel mapping across a whole grid, producing a flat
/// RGB8 buffer in row-major order.
pub fn grid_to_rgb8(grid: &Grid, policy: OverflowPolicy) -> Vec<u8> {
    let mut buf = Vec::with_capacity(grid.rows() * grid.cols() * 3);
    for r in 0..grid.rows() {
        buf.extend_from_slice(&colormap::map_row(grid.row(r), policy));
    }
    buf
}

/// Encode a grid as an RGB8 PNG at `path`, creating or overwriting the file.
pub fn write_frame(grid: &Grid, policy: OverflowPolicy, path: &Path) -> GridreelResult<()> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(GridreelError::encoding(format!(
            "refusing to encode an empty ({}x{}) image for '{}'",
            grid.cols(),
            grid.rows(),
            path.display()
        )));
    }

    ensure_parent_dir(path)?;
    let data = grid_to_rgb8(grid, policy);
    image::save_buffer_with_format(
        path,
        &data,
        grid.cols() as u32,
        grid.rows() as u32,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Decode a frame image back into RGB8 pixels.
pub fn read_frame(path: &Path) -> GridreelResult<FrameRgb> {
    let dyn_img =
        image::open(path).with_context(|| format!("decode frame '{}'", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(FrameRgb {
        width,
        height,
        data: rgb.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "gridreel_materialize_{tag}_{}_{}.png",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn png_roundtrip_reproduces_exact_pixels() {
        let grid = Grid::from_rows(vec![vec![0.0, 255.0], vec![10.0, 1.5]]).unwrap();
        let path = tmp_path("roundtrip");

        write_frame(&grid, OverflowPolicy::Clamp, &path).unwrap();
        let frame = read_frame(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(frame.width, 2);
        assert_eq!(frame.height, 2);
        assert_eq!(
            frame.data,
            vec![0, 0, 0, 0, 0, 255, 0, 0, 10, 0, 0, 1]
        );
    }

    #[test]
    fn empty_grid_is_an_encoding_error() {
        let grid = Grid::from_rows(vec![]).unwrap();
        let err = write_frame(&grid, OverflowPolicy::Clamp, &tmp_path("empty")).unwrap_err();
        assert!(matches!(err, GridreelError::Encoding(_)), "{err}");
    }

    #[test]
    fn grid_to_rgb8_has_three_bytes_per_scalar() {
        let grid = Grid::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(grid_to_rgb8(&grid, OverflowPolicy::Clamp).len(), 9);
    }
}
