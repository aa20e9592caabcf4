use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::fatal::{GraphicsError, Status};
use crate::paint::Color;
use crate::render::QuadRenderer;

use super::target::{TargetExtent, TargetState, resolve_resize};

/// Result of a paint request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PaintOutcome {
    /// A frame was drawn and presented at this extent.
    Presented(TargetExtent),
    /// Nothing was drawn: no invalidation, or a transient surface error.
    Skipped,
    /// The surface was lost or outdated and has been reconfigured.
    Reconfigured,
}

/// Draws the quad into the window backbuffer on invalidation.
pub struct FramePresenter {
    target: TargetState,
    clear: Color,
}

impl FramePresenter {
    pub fn new(clear: Color) -> Self {
        Self {
            target: TargetState::Stale,
            clear,
        }
    }

    pub fn target(&self) -> TargetState {
        self.target
    }

    /// Releases the target binding and reconfigures the surface for `size`.
    ///
    /// Returns the size actually configured, or `None` when the client area is
    /// empty and configuration was deferred.
    pub fn on_resize(
        &mut self,
        gpu: &mut Gpu<'_>,
        window: &Window,
        size: PhysicalSize<u32>,
    ) -> Option<PhysicalSize<u32>> {
        let size = self.prepare_resize(size, window.inner_size())?;
        gpu.resize(size).then(|| {
            log::debug!("surface configured at {}x{}", size.width, size.height);
            size
        })
    }

    /// Marks the target stale and picks the size the surface is configured with.
    fn prepare_resize(
        &mut self,
        requested: PhysicalSize<u32>,
        window: PhysicalSize<u32>,
    ) -> Option<PhysicalSize<u32>> {
        self.target.release();
        let size = resolve_resize(requested, window);
        if size.is_none() {
            log::debug!("client area is empty; surface configuration deferred");
        }
        size
    }

    /// Presents one frame if `invalid` is set.
    pub fn paint(
        &mut self,
        gpu: &mut Gpu<'_>,
        window: &Window,
        renderer: &QuadRenderer,
        invalid: bool,
    ) -> Result<PaintOutcome> {
        if !self.should_draw(invalid) {
            return Ok(PaintOutcome::Skipped);
        }

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let message = err.to_string();
                self.target.release();
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured => Ok(PaintOutcome::Reconfigured),
                    SurfaceErrorAction::SkipFrame => {
                        log::debug!("frame skipped: {message}");
                        Ok(PaintOutcome::Skipped)
                    }
                    SurfaceErrorAction::Fatal => Err(GraphicsError {
                        what: "surface acquire",
                        message,
                        status: Status::E_OUTOFMEMORY,
                    }
                    .into()),
                };
            }
        };

        let extent = self
            .target
            .bind(frame.extent().into(), gpu.configured_extent().into())
            .context("failed to bind the render target")?;

        renderer.draw(
            &mut frame.encoder,
            &frame.view,
            (extent.width, extent.height),
            self.clear,
        );

        window.pre_present_notify();
        gpu.submit(frame);

        log::trace!("presented {extent}");
        Ok(PaintOutcome::Presented(extent))
    }

    /// A paint without an invalid region does no GPU work.
    fn should_draw(&self, invalid: bool) -> bool {
        if !invalid {
            log::trace!("paint skipped: nothing invalidated ({:?})", self.target);
        }
        invalid
    }
}
