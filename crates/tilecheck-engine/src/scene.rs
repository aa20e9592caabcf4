//! Tiled-texture scene owned by the harness.

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::config::HarnessConfig;
use crate::device::Gpu;
use crate::pixels::PixelBuffer;
use crate::present::{FramePresenter, PaintOutcome};
use crate::render::{CameraUniform, QuadRenderer};
use crate::tiled::{PoolSlot, TILE_SIZE_IN_BYTES, TilePool, TiledTexture};

/// GPU resources of the harness: one tiled texture backed by one tile pool,
/// the quad that samples it and the presenter that draws the quad.
///
/// Created once after the device exists and passed by reference to the
/// paint, resize and click paths.
pub struct TiledScene {
    texture: TiledTexture,
    _pool: TilePool,
    renderer: QuadRenderer,
    presenter: FramePresenter,
}

impl TiledScene {
    /// Creates the texture and pool, maps the configured tile to slot 0,
    /// fills it with the initial color and builds the quad pipeline.
    pub fn bootstrap(gpu: &Gpu<'_>, config: &HarnessConfig) -> Result<Self> {
        let device = gpu.device();
        let queue = gpu.queue();

        let desc = config.texture_desc();
        let mut texture =
            TiledTexture::new(device, desc).context("failed to create the tiled texture")?;

        let pool = TilePool::new(device, u64::from(config.pool_tiles) * TILE_SIZE_IN_BYTES)
            .context("failed to create the tile pool")?;

        texture
            .map_tile(queue, config.mapped_tile, &pool, PoolSlot(0))
            .context("failed to map the tile")?;

        let shape = desc.tile_shape();
        let fill = PixelBuffer::uniform(shape.width, shape.height, config.initial_fill);
        texture
            .write_tile(queue, config.mapped_tile, fill.as_bytes(), 0)
            .context("failed to write the initial tile contents")?;

        let size = gpu.size();
        let renderer = QuadRenderer::new(
            device,
            gpu.surface_format(),
            &texture,
            config.sampler,
            (size.width as f32, size.height as f32),
        )?;

        log::info!("tile {} mapped to slot 0 and filled", config.mapped_tile);

        Ok(Self {
            texture,
            _pool: pool,
            renderer,
            presenter: FramePresenter::new(config.background),
        })
    }

    pub fn texture(&self) -> &TiledTexture {
        &self.texture
    }

    /// Reconfigures the surface and, once it has a size, the camera.
    pub fn on_resize(&mut self, gpu: &mut Gpu<'_>, window: &Window, size: PhysicalSize<u32>) {
        let configured = self.presenter.on_resize(gpu, window, size);
        if let Some(camera) = camera_after_resize(configured) {
            self.renderer.update_camera(gpu.queue(), &camera);
        }
    }

    pub fn paint(&mut self, gpu: &mut Gpu<'_>, window: &Window, invalid: bool) -> Result<PaintOutcome> {
        self.presenter.paint(gpu, window, &self.renderer, invalid)
    }
}

/// Camera matching the surface size a resize configured. A deferred resize
/// keeps the current camera.
fn camera_after_resize(configured: Option<PhysicalSize<u32>>) -> Option<CameraUniform> {
    configured.map(|size| CameraUniform::for_client_area(size.width as f32, size.height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(camera: &CameraUniform, x: f32, y: f32) -> (f32, f32) {
        let m = &camera.view_proj;
        (
            x * m[0][0] + y * m[1][0] + m[3][0],
            x * m[0][1] + y * m[1][1] + m[3][1],
        )
    }

    #[test]
    fn resize_recomputes_camera_for_new_client_area() {
        let camera = camera_after_resize(Some(PhysicalSize::new(800, 450))).unwrap();
        let (x, y) = project(&camera, 800.0, 450.0);
        assert!((x - 1.0).abs() < 1e-5 && (y + 1.0).abs() < 1e-5);

        // the quad keeps its pixel placement from the initial 600x600 layout
        let (x, y) = project(&camera, 60.0, 60.0);
        assert!((x - (60.0 / 400.0 - 1.0)).abs() < 1e-5);
        assert!((y - (1.0 - 60.0 / 225.0)).abs() < 1e-5);
    }

    #[test]
    fn deferred_resize_keeps_camera() {
        assert!(camera_after_resize(None).is_none());
    }
}
