//! Directory-backed frame loading and mask export.
//!
//! Frame order is the alphabetical order of file paths, so captures
//! named with zero-padded counters replay in the order they were shot.
//! Only available with the `image-io` feature.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Frame, FrameSource, Sequence, SourceError};
use crate::engine::Mask;

/// File extensions accepted as frames, compared case-insensitively.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Loads every supported image in one directory as a sequence.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Creates a loader rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Filters directory entries down to frame files, in replay order.
fn select_frame_paths(entries: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = entries.into_iter().filter(|p| is_supported(p)).collect();
    paths.sort();
    paths
}

impl FrameSource for DirectoryLoader {
    fn frames(&mut self) -> Result<Sequence, SourceError> {
        let read_err = |e: std::io::Error| {
            SourceError::ReadFailed(format!("{}: {}", self.root.display(), e))
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(read_err)? {
            entries.push(entry.map_err(read_err)?.path());
        }

        let paths = select_frame_paths(entries);
        if paths.is_empty() {
            return Err(SourceError::NoFrames(format!(
                "no supported images in {}",
                self.root.display()
            )));
        }

        tracing::info!(
            directory = %self.root.display(),
            count = paths.len(),
            "Loading frame sequence"
        );

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            let img = image::open(path)
                .map_err(|e| SourceError::DecodeFailed(format!("{}: {}", path.display(), e)))?
                .to_rgb8();
            let (width, height) = img.dimensions();
            tracing::debug!(file = %path.display(), width, height, "Decoded frame");
            frames.push(Frame::new(img.into_raw(), width, height)?);
        }

        Ok(Sequence::new(frames)?)
    }
}

/// Writes a mask as an 8-bit grayscale PNG.
///
/// Foreground pixels are bright, background is black; graded masks
/// keep their intermediate alpha levels.
pub fn write_mask(path: impl AsRef<Path>, mask: &Mask) -> Result<(), SourceError> {
    let path = path.as_ref();
    let img = image::GrayImage::from_raw(
        mask.width() as u32,
        mask.height() as u32,
        mask.data().to_vec(),
    )
    .ok_or_else(|| {
        SourceError::WriteFailed(format!("{}: mask buffer size mismatch", path.display()))
    })?;

    img.save(path)
        .map_err(|e| SourceError::WriteFailed(format!("{}: {}", path.display(), e)))?;
    tracing::info!(file = %path.display(), "Wrote mask");
    Ok(())
}
