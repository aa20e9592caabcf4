//! GPU device + surface management.
//!
//! One [`Gpu`] per window: adapter and device selection, the swapchain
//! configuration, and per-paint frame acquisition.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
