use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::input::PointerButtonEvent;

use super::ctx::HarnessCtx;

/// Control directive returned by input callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Window contents changed; paint on the next redraw.
    Invalidate,
    Exit,
}

/// Application contract implemented by the harness.
///
/// Every callback may fail; the runtime treats any error as fatal.
pub trait App {
    /// Called once after the window and GPU context exist.
    fn on_start(&mut self, ctx: &mut HarnessCtx<'_, '_>) -> Result<()>;

    /// Called when the client area changes size. `size` may be zero.
    fn on_resize(&mut self, ctx: &mut HarnessCtx<'_, '_>, size: PhysicalSize<u32>) -> Result<()>;

    /// Called for mouse button presses and releases.
    fn on_pointer_button(
        &mut self,
        ctx: &mut HarnessCtx<'_, '_>,
        event: PointerButtonEvent,
    ) -> Result<AppControl> {
        let _ = (ctx, event);
        Ok(AppControl::Continue)
    }

    /// Called on every redraw request. `invalid` is set when something
    /// changed since the last paint.
    fn on_paint(&mut self, ctx: &mut HarnessCtx<'_, '_>, invalid: bool) -> Result<()>;
}
