//! File-set discovery for the two naming conventions the pipeline touches:
//! `file{N}` inputs and `img{N}.png` intermediate frames.
//!
//! Ordering is always by the parsed numeric index. A lexical sort of generated
//! names stops being monotonic once N crosses a power of ten ("img10" sorts
//! before "img2"), so string order is never used for frame sequencing.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::{GridreelError, GridreelResult};

pub const INPUT_PREFIX: &str = "file";
pub const FRAME_PREFIX: &str = "img";
pub const FRAME_EXT: &str = "png";

/// How the input index range is determined.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// `max(N) + 1` inferred from the files present; requires `file0..=fileMax`
    /// to be contiguous.
    #[default]
    Auto,
    /// Process exactly `file0..file{count-1}`, all of which must exist.
    Fixed(u64),
}

/// Enumerate `file{N}` inputs under `dir`, sorted by index.
///
/// An empty directory yields an empty vec, not an error. A gap in the index
/// range fails fast here, naming the first missing index, rather than failing
/// later at open.
pub fn discover_inputs(dir: &Path, mode: IndexMode) -> GridreelResult<Vec<(u64, PathBuf)>> {
    let entries = scan(dir, INPUT_PREFIX, None)?;

    match mode {
        IndexMode::Auto => {
            for (pos, (idx, _)) in entries.iter().enumerate() {
                if *idx != pos as u64 {
                    return Err(GridreelError::not_found(format!(
                        "input file{pos} is missing from '{}' (indices must be contiguous from 0)",
                        dir.display()
                    )));
                }
            }
            Ok(entries)
        }
        IndexMode::Fixed(count) => {
            let mut out = Vec::with_capacity(count as usize);
            let mut iter = entries.into_iter().peekable();
            for want in 0..count {
                match iter.peek() {
                    Some((idx, _)) if *idx == want => {
                        out.push(iter.next().expect("peeked entry"));
                    }
                    _ => {
                        return Err(GridreelError::not_found(format!(
                            "input file{want} is missing from '{}' (fixed count {count})",
                            dir.display()
                        )));
                    }
                }
            }
            Ok(out)
        }
    }
}

/// Enumerate `img{N}.png` frames under `dir`, sorted by index.
pub fn discover_frames(dir: &Path) -> GridreelResult<Vec<(u64, PathBuf)>> {
    scan(dir, FRAME_PREFIX, Some(FRAME_EXT))
}

fn scan(
    dir: &Path,
    prefix: &str,
    ext: Option<&str>,
) -> GridreelResult<Vec<(u64, PathBuf)>> {
    if !dir.is_dir() {
        return Err(GridreelError::not_found(format!(
            "directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("scan directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("scan directory '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(idx) = parse_indexed_name(name, prefix, ext) {
            out.push((idx, entry.path()));
        }
    }
    out.sort_by_key(|(idx, _)| *idx);
    Ok(out)
}

fn parse_indexed_name(name: &str, prefix: &str, ext: Option<&str>) -> Option<u64> {
    let rest = name.strip_prefix(prefix)?;
    let digits = match ext {
        Some(ext) => rest.strip_suffix(ext)?.strip_suffix('.')?,
        None => rest,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
