use std::fmt;

use super::{TextureDesc, TileShape, TiledError};

/// Logical tile coordinate inside a tiled texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub mip: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y, mip: 0 }
    }

    /// Row-major index inside a grid `columns` tiles wide.
    pub const fn linear_index(self, columns: u32) -> u32 {
        self.y * columns + self.x
    }

    /// Checks the coordinate against the texture's tile grid and mip chain.
    pub fn validate(self, desc: &TextureDesc) -> Result<(), TiledError> {
        if self.mip >= desc.mip_levels {
            return Err(TiledError::MipOutOfRange(self.mip));
        }
        let (columns, rows) = desc.tile_grid();
        if self.x >= columns || self.y >= rows {
            return Err(TiledError::TileOutOfRange {
                coord: self,
                columns,
                rows,
            });
        }
        Ok(())
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, mip {})", self.x, self.y, self.mip)
    }
}

/// Texel-space box, half-open on `right`, `bottom` and `back`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TexelBox {
    pub left: u32,
    pub top: u32,
    pub front: u32,
    pub right: u32,
    pub bottom: u32,
    pub back: u32,
}

impl TexelBox {
    /// Single-slice box of `width`x`height` texels at `(left, top)`.
    pub const fn rect(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            front: 0,
            right: left + width,
            bottom: top + height,
            back: 1,
        }
    }

    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub const fn depth(&self) -> u32 {
        self.back.saturating_sub(self.front)
    }

    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Rejects empty boxes, boxes spanning more than one slice and boxes
    /// reaching past the texture extent.
    pub fn validate(&self, desc: &TextureDesc) -> Result<(), TiledError> {
        let well_formed = self.width() > 0 && self.height() > 0 && self.depth() == 1;
        let in_bounds = self.right <= desc.width && self.bottom <= desc.height && self.front == 0;
        if well_formed && in_bounds {
            Ok(())
        } else {
            Err(TiledError::BoxOutOfBounds(*self))
        }
    }

    /// Tiles intersected by this box, row-major.
    pub fn tiles(&self, shape: TileShape) -> impl Iterator<Item = TileCoord> + use<> {
        let x0 = self.left / shape.width;
        let y0 = self.top / shape.height;
        let x1 = self.right.div_ceil(shape.width);
        let y1 = self.bottom.div_ceil(shape.height);
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| TileCoord::new(x, y)))
    }

    /// Texel box covered by `coord`.
    pub const fn of_tile(coord: TileCoord, shape: TileShape) -> Self {
        Self::rect(
            coord.x * shape.width,
            coord.y * shape.height,
            shape.width,
            shape.height,
        )
    }
}

impl fmt::Display for TexelBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}, {}..{}]",
            self.left, self.right, self.top, self.bottom, self.front, self.back
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiled::TexelFormat;

    fn desc() -> TextureDesc {
        TextureDesc::tiled(TexelFormat::Bgra8Unorm, 256, 256)
    }

    #[test]
    fn box_inside_first_tile_touches_only_that_tile() {
        let tiles: Vec<_> = TexelBox::rect(12, 12, 32, 32)
            .tiles(desc().tile_shape())
            .collect();
        assert_eq!(tiles, vec![TileCoord::new(0, 0)]);
    }

    #[test]
    fn box_straddling_tile_edges_touches_all_four() {
        let tiles: Vec<_> = TexelBox::rect(120, 100, 16, 40)
            .tiles(desc().tile_shape())
            .collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(0, 1),
                TileCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn box_validation() {
        let d = desc();
        assert!(TexelBox::rect(0, 0, 256, 256).validate(&d).is_ok());
        assert!(TexelBox::rect(250, 0, 8, 8).validate(&d).is_err());
        assert!(TexelBox::rect(4, 4, 0, 8).validate(&d).is_err());

        let mut deep = TexelBox::rect(0, 0, 8, 8);
        deep.back = 2;
        assert!(matches!(deep.validate(&d), Err(TiledError::BoxOutOfBounds(_))));
    }

    #[test]
    fn coord_validation() {
        let d = desc();
        assert!(TileCoord::new(1, 1).validate(&d).is_ok());
        assert!(matches!(
            TileCoord::new(2, 0).validate(&d),
            Err(TiledError::TileOutOfRange { columns: 2, rows: 2, .. })
        ));
        let coord = TileCoord { x: 0, y: 0, mip: 1 };
        assert!(matches!(coord.validate(&d), Err(TiledError::MipOutOfRange(1))));
    }
}
