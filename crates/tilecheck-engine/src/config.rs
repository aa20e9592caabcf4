//! Harness configuration.
//!
//! Everything the harness hard-codes lives here so tests and the binary
//! agree on one set of values.

use std::path::PathBuf;

use crate::paint::Color;
use crate::render::SamplerState;
use crate::tiled::{TexelBox, TexelFormat, TextureDesc, TileCoord};

pub use crate::device::GpuInit;
pub use crate::logging::LoggingConfig;
pub use crate::window::RuntimeConfig;

/// Opaque red as a little-endian `0xAARRGGBB` word.
pub const RED_FILL: u32 = 0xFF80_0000;

/// Opaque green as a little-endian `0xAARRGGBB` word.
pub const GREEN_FILL: u32 = 0xFF00_8000;

/// Tiled-resource layout and click behaviour of the harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Image loaded on every click, relative to the working directory.
    pub image_path: PathBuf,

    /// Width and height of the tiled texture in texels.
    pub texture_size: u32,

    /// Tiles in the tile pool.
    pub pool_tiles: u32,

    /// Tile backed by pool slot 0 and targeted by clicks.
    pub mapped_tile: TileCoord,

    /// Color written into the mapped tile at startup.
    pub initial_fill: u32,

    /// Color the right click clears the mapped tile to.
    pub clear_fill: u32,

    /// Resolution the left click loads the image at (one full tile).
    pub tile_image_size: u32,

    /// Resolution of the patch written by the right click.
    pub patch_size: u32,

    /// Top-left texel of the patch.
    pub patch_origin: (u32, u32),

    pub background: Color,
    pub sampler: SamplerState,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("image.png"),
            texture_size: 256,
            pool_tiles: 1,
            mapped_tile: TileCoord::new(0, 0),
            initial_fill: RED_FILL,
            clear_fill: GREEN_FILL,
            tile_image_size: 128,
            patch_size: 32,
            patch_origin: (12, 12),
            background: Color::BACKGROUND,
            sampler: SamplerState::default(),
        }
    }
}

impl HarnessConfig {
    pub fn texture_desc(&self) -> TextureDesc {
        TextureDesc::tiled(TexelFormat::Bgra8Unorm, self.texture_size, self.texture_size)
    }

    /// Region overwritten by the right click.
    pub fn patch_region(&self) -> TexelBox {
        let (left, top) = self.patch_origin;
        TexelBox::rect(left, top, self.patch_size, self.patch_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_two_by_two_tiles() {
        let config = HarnessConfig::default();
        let desc = config.texture_desc();
        assert_eq!(desc.tile_grid(), (2, 2));
        assert_eq!(desc.tile_shape().width, config.tile_image_size);
    }

    #[test]
    fn patch_stays_inside_the_mapped_tile() {
        let config = HarnessConfig::default();
        let region = config.patch_region();
        let shape = config.texture_desc().tile_shape();
        let tiles: Vec<_> = region.tiles(shape).collect();
        assert_eq!(tiles, vec![config.mapped_tile]);
        assert_eq!((region.right, region.bottom), (44, 44));
    }
}
