//! GPU rendering subsystem.
//!
//! One fixed pipeline: a textured quad whose fragment stage samples a
//! [`TiledTexture`](crate::tiled::TiledTexture) through its page table.
//!
//! Convention:
//! - CPU geometry is in physical client pixels (top-left origin, +Y down).
//! - The vertex shader converts to clip space with the camera uniform.

mod camera;
mod quad;

pub(crate) use camera::CameraUniform;
pub use quad::{Filter, QuadRenderer, SamplerState};
