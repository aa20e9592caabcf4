use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Size of one hardware tile in bytes, independent of texel format.
pub const TILE_SIZE_IN_BYTES: u64 = 64 << 10;

/// Texel formats a tiled texture can be created with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TexelFormat {
    /// 32-bit BGRA, 8 bits per channel, unsigned normalized.
    Bgra8Unorm,
}

impl TexelFormat {
    pub const fn bytes_per_texel(self) -> u32 {
        match self {
            TexelFormat::Bgra8Unorm => 4,
        }
    }

    /// Texel footprint of one 64 KiB tile for this format.
    pub const fn tile_shape(self) -> TileShape {
        match self {
            TexelFormat::Bgra8Unorm => TileShape::new(128, 128),
        }
    }
}

impl fmt::Display for TexelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexelFormat::Bgra8Unorm => f.write_str("bgra8unorm"),
        }
    }
}

/// Texel dimensions of one tile.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TileShape {
    pub width: u32,
    pub height: u32,
}

impl TileShape {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn texel_count(self) -> u32 {
        self.width * self.height
    }
}

/// Resource creation flags.
///
/// Only the flags relevant for tiled resources are modelled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ResourceFlags(u32);

impl ResourceFlags {
    pub const TILED: Self = Self(1 << 0);
    pub const TILE_POOL: Self = Self(1 << 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ResourceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResourceFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Creation parameters of a tiled 2D texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub format: TexelFormat,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub flags: ResourceFlags,
}

impl TextureDesc {
    /// Single-mip tiled texture descriptor.
    pub const fn tiled(format: TexelFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            mip_levels: 1,
            flags: ResourceFlags::TILED,
        }
    }

    pub const fn tile_shape(&self) -> TileShape {
        self.format.tile_shape()
    }

    /// Number of tiles along x and y.
    pub const fn tile_grid(&self) -> (u32, u32) {
        let shape = self.tile_shape();
        (
            self.width.div_ceil(shape.width),
            self.height.div_ceil(shape.height),
        )
    }

    pub const fn tile_count(&self) -> u32 {
        let (x, y) = self.tile_grid();
        x * y
    }

    /// Bytes of one tightly packed row of the whole texture.
    pub const fn row_bytes(&self) -> u32 {
        self.width * self.format.bytes_per_texel()
    }

    /// Bytes of one full tile, tightly packed.
    pub const fn tile_bytes(&self) -> u32 {
        self.tile_shape().texel_count() * self.format.bytes_per_texel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra8_tile_fills_exactly_one_hardware_tile() {
        let desc = TextureDesc::tiled(TexelFormat::Bgra8Unorm, 256, 256);
        assert_eq!(desc.tile_shape(), TileShape::new(128, 128));
        assert_eq!(desc.tile_bytes() as u64, TILE_SIZE_IN_BYTES);
        assert_eq!(desc.tile_grid(), (2, 2));
        assert_eq!(desc.tile_count(), 4);
    }

    #[test]
    fn flags_combine() {
        let mut flags = ResourceFlags::empty();
        assert!(!flags.contains(ResourceFlags::TILED));
        flags |= ResourceFlags::TILED;
        assert!(flags.contains(ResourceFlags::TILED));
        assert!(!flags.contains(ResourceFlags::TILED | ResourceFlags::TILE_POOL));
    }
}
