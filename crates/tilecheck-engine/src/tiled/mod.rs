//! Tiled (sparse) texture management.
//!
//! A [`TiledTexture`] is a logical 2D resource split into fixed-size tiles.
//! Physical memory comes from a [`TilePool`]; each tile must be mapped to a
//! pool slot before it can be written. Sampling resolves texels through the
//! page table in the fragment shader, so unmapped tiles read as zero.
//!
//! Address computation and write planning live in [`plan`] and are GPU-free.

mod error;
mod format;
mod geometry;
mod mapping;
pub mod plan;
mod pool;
mod texture;

#[cfg(test)]
mod gpu_tests;

pub use error::TiledError;
pub use format::{ResourceFlags, TILE_SIZE_IN_BYTES, TexelFormat, TextureDesc, TileShape};
pub use geometry::{TexelBox, TileCoord};
pub use mapping::{PoolSlot, TileMappingTable, UNMAPPED_SLOT};
pub use plan::PoolWrite;
pub use pool::{PoolId, TilePool};
pub use texture::TiledTexture;
pub(crate) use texture::TiledParams;
