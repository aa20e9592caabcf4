use std::fmt;

use super::{TILE_SIZE_IN_BYTES, TextureDesc, TileCoord, TiledError};

/// Page-table word marking a tile without pool backing. Shared with the shader.
pub const UNMAPPED_SLOT: u32 = u32::MAX;

/// Index of a tile-sized slot inside a tile pool.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PoolSlot(pub u32);

impl PoolSlot {
    pub const fn byte_offset(self) -> u64 {
        self.0 as u64 * TILE_SIZE_IN_BYTES
    }
}

impl fmt::Display for PoolSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical tile → pool slot associations for one texture (mip 0 only).
#[derive(Debug, Clone)]
pub struct TileMappingTable {
    columns: u32,
    rows: u32,
    slots: Vec<Option<PoolSlot>>,
}

impl TileMappingTable {
    /// Table for `desc` with every tile unmapped.
    pub fn new(desc: &TextureDesc) -> Self {
        let (columns, rows) = desc.tile_grid();
        Self {
            columns,
            rows,
            slots: vec![None; (columns * rows) as usize],
        }
    }

    pub const fn grid(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Points `coord` at `slot`; returns the slot it was previously mapped to.
    ///
    /// The coordinate must already be validated against the texture.
    pub fn map(&mut self, coord: TileCoord, slot: PoolSlot) -> Result<Option<PoolSlot>, TiledError> {
        let index = self.index(coord)?;
        Ok(self.slots[index].replace(slot))
    }

    pub fn slot(&self, coord: TileCoord) -> Option<PoolSlot> {
        self.index(coord).ok().and_then(|i| self.slots[i])
    }

    /// Slot for `coord`, or `TileNotMapped`.
    pub fn require(&self, coord: TileCoord) -> Result<PoolSlot, TiledError> {
        self.slot(coord).ok_or(TiledError::TileNotMapped(coord))
    }

    pub fn mapped_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterates `(coord, slot)` for every mapped tile, row-major.
    pub fn iter_mapped(&self) -> impl Iterator<Item = (TileCoord, PoolSlot)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let i = i as u32;
            slot.map(|s| (TileCoord::new(i % self.columns, i / self.columns), s))
        })
    }

    /// GPU page table: one word per tile, row-major, `UNMAPPED_SLOT` where unmapped.
    pub fn page_table(&self) -> Vec<u32> {
        self.slots
            .iter()
            .map(|s| s.map_or(UNMAPPED_SLOT, |slot| slot.0))
            .collect()
    }

    fn index(&self, coord: TileCoord) -> Result<usize, TiledError> {
        if coord.mip != 0 {
            return Err(TiledError::MipOutOfRange(coord.mip));
        }
        if coord.x >= self.columns || coord.y >= self.rows {
            return Err(TiledError::TileOutOfRange {
                coord,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(coord.linear_index(self.columns) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiled::TexelFormat;

    fn table() -> TileMappingTable {
        TileMappingTable::new(&TextureDesc::tiled(TexelFormat::Bgra8Unorm, 256, 256))
    }

    #[test]
    fn starts_unmapped() {
        let t = table();
        assert_eq!(t.mapped_count(), 0);
        assert_eq!(t.page_table(), vec![UNMAPPED_SLOT; 4]);
        assert!(matches!(
            t.require(TileCoord::new(0, 0)),
            Err(TiledError::TileNotMapped(_))
        ));
    }

    #[test]
    fn remapping_repoints_last_write_wins() {
        let mut t = table();
        assert_eq!(t.map(TileCoord::new(1, 0), PoolSlot(0)).unwrap(), None);
        assert_eq!(
            t.map(TileCoord::new(1, 0), PoolSlot(3)).unwrap(),
            Some(PoolSlot(0))
        );
        assert_eq!(t.slot(TileCoord::new(1, 0)), Some(PoolSlot(3)));
        assert_eq!(t.mapped_count(), 1);
        assert_eq!(t.page_table(), vec![UNMAPPED_SLOT, 3, UNMAPPED_SLOT, UNMAPPED_SLOT]);
    }

    #[test]
    fn iter_mapped_reports_coordinates() {
        let mut t = table();
        t.map(TileCoord::new(0, 1), PoolSlot(2)).unwrap();
        let mapped: Vec<_> = t.iter_mapped().collect();
        assert_eq!(mapped, vec![(TileCoord::new(0, 1), PoolSlot(2))]);
    }

    #[test]
    fn slot_offsets_are_tile_sized() {
        assert_eq!(PoolSlot(0).byte_offset(), 0);
        assert_eq!(PoolSlot(2).byte_offset(), 2 * 65536);
    }
}
