use std::sync::atomic::{AtomicU64, Ordering};

use super::{ResourceFlags, TILE_SIZE_IN_BYTES, TiledError};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a tile pool, used to keep a texture on one backing store.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PoolId(u64);

/// GPU buffer providing physical memory for mapped tiles.
///
/// The buffer is divided into `capacity_tiles()` slots of
/// [`TILE_SIZE_IN_BYTES`] each.
pub struct TilePool {
    id: PoolId,
    buffer: wgpu::Buffer,
    size: u64,
}

impl TilePool {
    /// Allocates a pool of `size_in_bytes`, which must be a non-zero multiple
    /// of the tile size.
    pub fn new(device: &wgpu::Device, size_in_bytes: u64) -> Result<Self, TiledError> {
        if size_in_bytes == 0 || size_in_bytes % TILE_SIZE_IN_BYTES != 0 {
            return Err(TiledError::InvalidPoolSize {
                size: size_in_bytes,
                tile_bytes: TILE_SIZE_IN_BYTES,
            });
        }

        let limit = u64::from(device.limits().max_storage_buffer_binding_size);
        if size_in_bytes > limit {
            return Err(TiledError::PoolTooLarge {
                size: size_in_bytes,
                limit,
            });
        }

        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tilecheck tile pool"),
            size: size_in_bytes,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(TiledError::Device {
                what: "tile pool buffer",
                message: err.to_string(),
            });
        }

        let pool = Self {
            id: PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)),
            buffer,
            size: size_in_bytes,
        };
        log::info!(
            "created tile pool: {} bytes, {} tile(s)",
            pool.size,
            pool.capacity_tiles()
        );
        Ok(pool)
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn flags(&self) -> ResourceFlags {
        ResourceFlags::TILE_POOL
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn capacity_tiles(&self) -> u32 {
        (self.size / TILE_SIZE_IN_BYTES) as u32
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
