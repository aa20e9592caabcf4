use winit::window::Window;

use crate::device::Gpu;

/// Platform handles passed to every [`App`](super::App) callback.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct HarnessCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
}

impl<'a, 'w> HarnessCtx<'a, 'w> {
    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    /// Schedules a redraw of the window.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
