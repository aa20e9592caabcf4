use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::mapping::UNMAPPED_SLOT;
use super::plan::{self, PoolWrite};
use super::{
    PoolId, PoolSlot, ResourceFlags, TexelBox, TextureDesc, TileCoord, TileMappingTable, TilePool,
    TiledError,
};

/// Storage buffers the sampling shader binds in the fragment stage (pool + page table).
const FRAGMENT_STORAGE_BUFFERS: u32 = 2;

/// Shader-visible layout of a tiled texture. Mirrors `TiledParams` in `tiled_quad.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct TiledParams {
    pub extent: [u32; 2],
    pub tile: [u32; 2],
    pub grid: [u32; 2],
    pub unmapped: u32,
    pub _pad: u32,
}

struct PoolBinding {
    id: PoolId,
    buffer: wgpu::Buffer,
}

/// A 2D texture whose storage lives in tile-sized slots of a [`TilePool`].
///
/// The texture owns no texel memory. Each logical tile is either mapped to a
/// pool slot or unmapped; unmapped tiles sample as zero and cannot be written.
pub struct TiledTexture {
    desc: TextureDesc,
    mapping: TileMappingTable,
    page_table: wgpu::Buffer,
    params: wgpu::Buffer,
    pool: Option<PoolBinding>,
}

impl TiledTexture {
    /// Creates the texture. No tile is mapped afterwards.
    pub fn new(device: &wgpu::Device, desc: TextureDesc) -> Result<Self, TiledError> {
        validate_desc(&desc)?;

        let limits = device.limits();
        if limits.max_storage_buffers_per_shader_stage < FRAGMENT_STORAGE_BUFFERS {
            return Err(TiledError::TilingUnsupported(format!(
                "{} storage buffers per stage, {} required",
                limits.max_storage_buffers_per_shader_stage, FRAGMENT_STORAGE_BUFFERS
            )));
        }

        let mapping = TileMappingTable::new(&desc);
        let shape = desc.tile_shape();
        let (columns, rows) = desc.tile_grid();

        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let page_table = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilecheck page table"),
            contents: bytemuck::cast_slice(&mapping.page_table()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilecheck tiled params"),
            contents: bytemuck::bytes_of(&TiledParams {
                extent: [desc.width, desc.height],
                tile: [shape.width, shape.height],
                grid: [columns, rows],
                unmapped: UNMAPPED_SLOT,
                _pad: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(TiledError::Device {
                what: "tiled texture",
                message: err.to_string(),
            });
        }

        log::info!(
            "created tiled texture: {}x{} {} ({}x{} tiles of {}x{})",
            desc.width,
            desc.height,
            desc.format,
            columns,
            rows,
            shape.width,
            shape.height
        );

        Ok(Self {
            desc,
            mapping,
            page_table,
            params,
            pool: None,
        })
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    pub fn is_tiled(&self) -> bool {
        self.desc.flags.contains(ResourceFlags::TILED)
    }

    pub fn mapping(&self) -> &TileMappingTable {
        &self.mapping
    }

    /// Maps `coord` onto `slot` of `pool`. Re-mapping a tile re-points it.
    ///
    /// The first mapping binds the texture to `pool`; later mappings must use
    /// the same pool.
    pub fn map_tile(
        &mut self,
        queue: &wgpu::Queue,
        coord: TileCoord,
        pool: &TilePool,
        slot: PoolSlot,
    ) -> Result<Option<PoolSlot>, TiledError> {
        coord.validate(&self.desc)?;
        if slot.0 >= pool.capacity_tiles() {
            return Err(TiledError::PoolSlotOutOfRange {
                slot,
                capacity: pool.capacity_tiles(),
            });
        }
        match &self.pool {
            Some(bound) if bound.id != pool.id() => return Err(TiledError::PoolMismatch),
            Some(_) => {}
            None => {
                self.pool = Some(PoolBinding {
                    id: pool.id(),
                    buffer: pool.buffer().clone(),
                });
            }
        }

        let previous = self.mapping.map(coord, slot)?;
        queue.write_buffer(
            &self.page_table,
            0,
            bytemuck::cast_slice(&self.mapping.page_table()),
        );

        match previous {
            Some(old) => log::debug!("remapped tile {coord}: slot {old} -> {slot}"),
            None => log::debug!("mapped tile {coord} to slot {slot}"),
        }
        Ok(previous)
    }

    /// Overwrites the whole of tile `coord`.
    ///
    /// `row_pitch == 0` means `data` is tightly packed and holds exactly one tile.
    pub fn write_tile(
        &self,
        queue: &wgpu::Queue,
        coord: TileCoord,
        data: &[u8],
        row_pitch: u32,
    ) -> Result<(), TiledError> {
        let writes = plan::plan_tile_write(&self.desc, &self.mapping, coord, data.len(), row_pitch)?;
        self.submit(queue, &writes, data, TiledError::TileNotMapped(coord))?;
        log::debug!("wrote tile {coord} ({} bytes)", data.len());
        Ok(())
    }

    /// Overwrites the texels inside `region` of `mip`.
    ///
    /// `data` holds `region.height()` rows `row_pitch` bytes apart; `depth_pitch`
    /// is the total slice size, `0` when unknown.
    pub fn write_subregion(
        &self,
        queue: &wgpu::Queue,
        mip: u32,
        region: TexelBox,
        data: &[u8],
        row_pitch: u32,
        depth_pitch: u32,
    ) -> Result<(), TiledError> {
        let writes = plan::plan_subregion_write(
            &self.desc,
            &self.mapping,
            mip,
            region,
            data.len(),
            row_pitch,
            depth_pitch,
        )?;
        let shape = self.desc.tile_shape();
        let origin = TileCoord::new(region.left / shape.width, region.top / shape.height);
        self.submit(queue, &writes, data, TiledError::TileNotMapped(origin))?;
        log::debug!("wrote subregion {region} in {} copies", writes.len());
        Ok(())
    }

    /// Blocking debug copy of the whole texture, row-major and tightly packed.
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<u8>, TiledError> {
        let Some(pool) = &self.pool else {
            return Ok(plan::compose_logical(&self.desc, &self.mapping, &[]));
        };

        let size = pool.buffer.size();
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tilecheck pool readback"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tilecheck pool readback"),
        });
        encoder.copy_buffer_to_buffer(&pool.buffer, 0, &staging, 0, size);
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| TiledError::ReadBack(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| TiledError::ReadBack(e.to_string()))?
            .map_err(|e| TiledError::ReadBack(e.to_string()))?;

        let image = {
            let bytes = slice.get_mapped_range();
            plan::compose_logical(&self.desc, &self.mapping, &bytes)
        };
        staging.unmap();
        Ok(image)
    }

    pub(crate) fn page_table_buffer(&self) -> &wgpu::Buffer {
        &self.page_table
    }

    pub(crate) fn params_buffer(&self) -> &wgpu::Buffer {
        &self.params
    }

    /// Pool buffer backing this texture, once any tile has been mapped.
    pub(crate) fn pool_buffer(&self) -> Option<&wgpu::Buffer> {
        self.pool.as_ref().map(|p| &p.buffer)
    }

    fn submit(
        &self,
        queue: &wgpu::Queue,
        writes: &[PoolWrite],
        data: &[u8],
        unbacked: TiledError,
    ) -> Result<(), TiledError> {
        let Some(pool) = &self.pool else {
            return Err(unbacked);
        };
        for write in writes {
            queue.write_buffer(&pool.buffer, write.pool_offset, &data[write.src.clone()]);
        }
        Ok(())
    }
}

fn validate_desc(desc: &TextureDesc) -> Result<(), TiledError> {
    if !desc.flags.contains(ResourceFlags::TILED) {
        return Err(TiledError::NotTiled);
    }
    if desc.mip_levels != 1 {
        return Err(TiledError::MipLevels(desc.mip_levels));
    }
    let shape = desc.tile_shape();
    let aligned = desc.width > 0
        && desc.height > 0
        && desc.width % shape.width == 0
        && desc.height % shape.height == 0;
    if !aligned {
        return Err(TiledError::UnalignedExtent {
            width: desc.width,
            height: desc.height,
            tile_width: shape.width,
            tile_height: shape.height,
        });
    }
    Ok(())
}
