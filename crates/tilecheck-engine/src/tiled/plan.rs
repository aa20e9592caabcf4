//! Translation of tile and subregion writes into pool byte ranges.
//!
//! Pool slots store their tile row-major and tightly packed: texel `(x, y)`
//! of a tile lives at `slot_offset + (y * tile_width + x) * bytes_per_texel`.
//! Everything here is CPU-only; the GPU path executes the same plans with
//! `Queue::write_buffer`.

use std::ops::Range;

use super::{TexelBox, TextureDesc, TileCoord, TileMappingTable, TiledError};

/// One contiguous copy from caller data into the tile pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PoolWrite {
    pub pool_offset: u64,
    pub src: Range<usize>,
}

impl PoolWrite {
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }
}

/// Plans a whole-tile overwrite of `coord`.
///
/// `row_pitch == 0` means `data` is tightly packed and must hold exactly one
/// tile.
pub fn plan_tile_write(
    desc: &TextureDesc,
    mapping: &TileMappingTable,
    coord: TileCoord,
    data_len: usize,
    row_pitch: u32,
) -> Result<Vec<PoolWrite>, TiledError> {
    coord.validate(desc)?;
    let slot = mapping.require(coord)?;

    let shape = desc.tile_shape();
    let bpp = desc.format.bytes_per_texel();
    let tile_row = shape.width * bpp;
    let tile_bytes = desc.tile_bytes() as usize;

    if row_pitch == 0 || row_pitch == tile_row {
        if data_len != tile_bytes {
            return Err(TiledError::PixelDataSize {
                expected: tile_bytes,
                actual: data_len,
            });
        }
        return Ok(vec![PoolWrite {
            pool_offset: slot.byte_offset(),
            src: 0..tile_bytes,
        }]);
    }

    if row_pitch < tile_row {
        return Err(TiledError::RowPitch {
            row_pitch,
            row_bytes: tile_row,
        });
    }
    let required = pitched_len(shape.height, row_pitch, tile_row);
    if data_len < required {
        return Err(TiledError::PixelDataSize {
            expected: required,
            actual: data_len,
        });
    }

    Ok((0..shape.height)
        .map(|row| {
            let src_start = row as usize * row_pitch as usize;
            PoolWrite {
                pool_offset: slot.byte_offset() + u64::from(row * tile_row),
                src: src_start..src_start + tile_row as usize,
            }
        })
        .collect())
}

/// Plans an overwrite of `region` on `mip`.
///
/// `depth_pitch` is the total size of the source slice; `0` skips that check.
/// Every tile the region touches must be mapped; nothing is planned otherwise.
pub fn plan_subregion_write(
    desc: &TextureDesc,
    mapping: &TileMappingTable,
    mip: u32,
    region: TexelBox,
    data_len: usize,
    row_pitch: u32,
    depth_pitch: u32,
) -> Result<Vec<PoolWrite>, TiledError> {
    if mip >= desc.mip_levels {
        return Err(TiledError::MipOutOfRange(mip));
    }
    region.validate(desc)?;

    let shape = desc.tile_shape();
    let bpp = desc.format.bytes_per_texel();
    let row_bytes = region.width() * bpp;
    if row_pitch < row_bytes {
        return Err(TiledError::RowPitch {
            row_pitch,
            row_bytes,
        });
    }

    let required = pitched_len(region.height(), row_pitch, row_bytes);
    if data_len < required || (depth_pitch != 0 && (depth_pitch as usize) < required) {
        return Err(TiledError::PixelDataSize {
            expected: required,
            actual: if depth_pitch != 0 {
                data_len.min(depth_pitch as usize)
            } else {
                data_len
            },
        });
    }

    // Resolve every touched tile up front so a failure leaves the pool untouched.
    let mut slots = Vec::new();
    for coord in region.tiles(shape) {
        slots.push((coord, mapping.require(coord)?));
    }

    let mut writes = Vec::new();
    for y in region.top..region.bottom {
        let tile_y = y / shape.height;
        let local_y = y % shape.height;
        for &(coord, slot) in slots.iter().filter(|(c, _)| c.y == tile_y) {
            let tile_left = coord.x * shape.width;
            let x0 = region.left.max(tile_left);
            let x1 = region.right.min(tile_left + shape.width);
            let local_x = x0 - tile_left;

            let pool_offset = slot.byte_offset()
                + u64::from((local_y * shape.width + local_x) * bpp);
            let src_start =
                (y - region.top) as usize * row_pitch as usize + ((x0 - region.left) * bpp) as usize;
            writes.push(PoolWrite {
                pool_offset,
                src: src_start..src_start + ((x1 - x0) * bpp) as usize,
            });
        }
    }

    Ok(writes)
}

/// Executes `plan` against host-side pool memory.
pub fn apply_plan(pool: &mut [u8], plan: &[PoolWrite], data: &[u8]) {
    for write in plan {
        let dst = write.pool_offset as usize;
        pool[dst..dst + write.len()].copy_from_slice(&data[write.src.clone()]);
    }
}

/// Rebuilds the row-major image of `desc` from pool memory.
///
/// Texels of unmapped tiles read as zero.
pub fn compose_logical(desc: &TextureDesc, mapping: &TileMappingTable, pool: &[u8]) -> Vec<u8> {
    let shape = desc.tile_shape();
    let bpp = desc.format.bytes_per_texel() as usize;
    let row_bytes = desc.row_bytes() as usize;
    let tile_row = shape.width as usize * bpp;

    let mut image = vec![0u8; row_bytes * desc.height as usize];
    for (coord, slot) in mapping.iter_mapped() {
        let base = slot.byte_offset() as usize;
        let left = coord.x as usize * tile_row;
        for row in 0..shape.height as usize {
            let y = coord.y as usize * shape.height as usize + row;
            if y >= desc.height as usize {
                break;
            }
            let src = base + row * tile_row;
            let dst = y * row_bytes + left;
            let width = tile_row.min(row_bytes - left);
            image[dst..dst + width].copy_from_slice(&pool[src..src + width]);
        }
    }
    image
}

fn pitched_len(rows: u32, row_pitch: u32, row_bytes: u32) -> usize {
    if rows == 0 {
        return 0;
    }
    (rows as usize - 1) * row_pitch as usize + row_bytes as usize
}
