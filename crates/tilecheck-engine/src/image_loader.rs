//! Image file → BGRA8 pixel buffer at a requested resolution.

use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::fatal::{HasStatus, Status};
use crate::pixels::PixelBuffer;

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("requested image size {width}x{height} is empty")]
    ZeroSize { width: u32, height: u32 },
}

impl HasStatus for ImageLoadError {
    fn status(&self) -> Status {
        match self {
            ImageLoadError::NotFound(_) => Status::FILE_NOT_FOUND,
            ImageLoadError::Io { .. } => Status::E_FAIL,
            ImageLoadError::Decode { .. } => Status::BAD_IMAGE,
            ImageLoadError::ZeroSize { .. } => Status::E_INVALIDARG,
        }
    }
}

/// Decodes `path` and resamples it to exactly `width`x`height` BGRA8 pixels.
///
/// Resampling always uses a Lanczos3 filter, regardless of the scale factor.
pub fn load_bgra8(path: &Path, width: u32, height: u32) -> Result<PixelBuffer, ImageLoadError> {
    if width == 0 || height == 0 {
        return Err(ImageLoadError::ZeroSize { width, height });
    }

    let reader = image::ImageReader::open(path).map_err(|source| io_error(path, source))?;
    let reader = reader
        .with_guessed_format()
        .map_err(|source| io_error(path, source))?;
    let decoded = reader.decode().map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "decoded {}: {}x{} -> {}x{}",
        path.display(),
        decoded.width(),
        decoded.height(),
        width,
        height
    );

    let rgba = decoded.to_rgba8();
    let resized = if rgba.dimensions() == (width, height) {
        rgba
    } else {
        imageops::resize(&rgba, width, height, FilterType::Lanczos3)
    };

    let mut data = resized.into_raw();
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    PixelBuffer::from_bgra8(width, height, data).ok_or(ImageLoadError::ZeroSize { width, height })
}

fn io_error(path: &Path, source: io::Error) -> ImageLoadError {
    if source.kind() == io::ErrorKind::NotFound {
        ImageLoadError::NotFound(path.to_path_buf())
    } else {
        ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
