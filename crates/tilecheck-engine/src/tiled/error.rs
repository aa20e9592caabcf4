use crate::fatal::{HasStatus, Status};

use super::{PoolSlot, TexelBox, TileCoord};

/// Failures of tiled-texture creation, mapping and writes.
#[derive(Debug, thiserror::Error)]
pub enum TiledError {
    #[error("texture descriptor does not request a tiled resource")]
    NotTiled,

    #[error("tiled textures support exactly one mip level, got {0}")]
    MipLevels(u32),

    #[error("texture extent {width}x{height} is not a non-zero multiple of the {tile_width}x{tile_height} tile")]
    UnalignedExtent {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    #[error("device cannot sample tiled resources: {0}")]
    TilingUnsupported(String),

    #[error("tile pool size {size} is not a non-zero multiple of {tile_bytes} bytes")]
    InvalidPoolSize { size: u64, tile_bytes: u64 },

    #[error("tile pool of {size} bytes exceeds the device binding limit of {limit} bytes")]
    PoolTooLarge { size: u64, limit: u64 },

    #[error("tile {coord} is outside the {columns}x{rows} tile grid")]
    TileOutOfRange {
        coord: TileCoord,
        columns: u32,
        rows: u32,
    },

    #[error("mip level {0} is not present")]
    MipOutOfRange(u32),

    #[error("pool slot {slot} is outside a pool of {capacity} tiles")]
    PoolSlotOutOfRange { slot: PoolSlot, capacity: u32 },

    #[error("texture is already backed by a different tile pool")]
    PoolMismatch,

    #[error("tile {0} has no pool mapping")]
    TileNotMapped(TileCoord),

    #[error("box {0} is empty, multi-slice or outside the texture")]
    BoxOutOfBounds(TexelBox),

    #[error("row pitch {row_pitch} is smaller than a packed row of {row_bytes} bytes")]
    RowPitch { row_pitch: u32, row_bytes: u32 },

    #[error("pixel data holds {actual} bytes, write needs {expected}")]
    PixelDataSize { expected: usize, actual: usize },

    #[error("device rejected {what}: {message}")]
    Device { what: &'static str, message: String },

    #[error("tile pool read-back failed: {0}")]
    ReadBack(String),
}

impl HasStatus for TiledError {
    fn status(&self) -> Status {
        match self {
            TiledError::TilingUnsupported(_) => Status::UNSUPPORTED,
            TiledError::Device { .. } | TiledError::ReadBack(_) => Status::DEVICE_LOST,
            TiledError::PoolTooLarge { .. } => Status::E_OUTOFMEMORY,
            _ => Status::E_INVALIDARG,
        }
    }
}
