//! Mouse input → tiled texture operations.

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use tilecheck_engine::config::HarnessConfig;
use tilecheck_engine::core::{App, AppControl, HarnessCtx};
use tilecheck_engine::fatal::Assertion;
use tilecheck_engine::image_loader;
use tilecheck_engine::input::{MouseButton, PointerButtonEvent};
use tilecheck_engine::pixels::PixelBuffer;
use tilecheck_engine::scene::TiledScene;
use tilecheck_engine::tiled::TiledTexture;

/// What a mouse press does to the mapped tile.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClickAction {
    /// Load the image at tile resolution and overwrite the whole tile.
    LoadTile,
    /// Clear the tile, then write a small copy of the image into a subregion.
    ClearAndPatch,
}

impl ClickAction {
    pub fn for_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(ClickAction::LoadTile),
            MouseButton::Right => Some(ClickAction::ClearAndPatch),
            _ => None,
        }
    }

    pub fn perform(
        self,
        queue: &wgpu::Queue,
        texture: &TiledTexture,
        config: &HarnessConfig,
    ) -> Result<()> {
        match self {
            ClickAction::LoadTile => load_tile(queue, texture, config),
            ClickAction::ClearAndPatch => clear_and_patch(queue, texture, config),
        }
    }
}

fn load_tile(queue: &wgpu::Queue, texture: &TiledTexture, config: &HarnessConfig) -> Result<()> {
    let size = config.tile_image_size;
    let image = image_loader::load_bgra8(&config.image_path, size, size)
        .context("failed to load the tile image")?;
    texture
        .write_tile(queue, config.mapped_tile, image.as_bytes(), 0)
        .context("failed to write the tile")?;
    log::info!("tile {} <- {}", config.mapped_tile, config.image_path.display());
    Ok(())
}

fn clear_and_patch(queue: &wgpu::Queue, texture: &TiledTexture, config: &HarnessConfig) -> Result<()> {
    let shape = texture.desc().tile_shape();
    let clear = PixelBuffer::uniform(shape.width, shape.height, config.clear_fill);
    texture
        .write_tile(queue, config.mapped_tile, clear.as_bytes(), 0)
        .context("failed to clear the tile")?;

    let size = config.patch_size;
    let patch = image_loader::load_bgra8(&config.image_path, size, size)
        .context("failed to load the patch image")?;
    let region = config.patch_region();
    texture
        .write_subregion(
            queue,
            0,
            region,
            patch.as_bytes(),
            patch.row_pitch(),
            patch.depth_pitch(),
        )
        .context("failed to write the patch")?;
    log::info!(
        "tile {} cleared, patch {region} <- {}",
        config.mapped_tile,
        config.image_path.display()
    );
    Ok(())
}

/// The harness application: owns the tiled scene and routes clicks into it.
pub struct HarnessApp {
    config: HarnessConfig,
    scene: Option<TiledScene>,
}

impl HarnessApp {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            scene: None,
        }
    }

    fn scene_mut(&mut self) -> Result<&mut TiledScene> {
        Ok(self.scene.as_mut().ok_or_else(missing_scene)?)
    }
}

fn missing_scene() -> Assertion {
    Assertion("scene used before startup".into())
}

impl App for HarnessApp {
    fn on_start(&mut self, ctx: &mut HarnessCtx<'_, '_>) -> Result<()> {
        self.scene = Some(TiledScene::bootstrap(ctx.gpu, &self.config)?);
        log::info!("bootstrap complete; left click loads the tile, right click patches it");
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut HarnessCtx<'_, '_>, size: PhysicalSize<u32>) -> Result<()> {
        self.scene_mut()?.on_resize(ctx.gpu, ctx.window, size);
        Ok(())
    }

    fn on_pointer_button(
        &mut self,
        ctx: &mut HarnessCtx<'_, '_>,
        event: PointerButtonEvent,
    ) -> Result<AppControl> {
        if !event.is_press() {
            return Ok(AppControl::Continue);
        }
        let Some(action) = ClickAction::for_button(event.button) else {
            return Ok(AppControl::Continue);
        };

        let scene = self.scene.as_ref().ok_or_else(missing_scene)?;
        action
            .perform(ctx.gpu.queue(), scene.texture(), &self.config)
            .with_context(|| format!("{action:?} failed"))?;
        Ok(AppControl::Invalidate)
    }

    fn on_paint(&mut self, ctx: &mut HarnessCtx<'_, '_>, invalid: bool) -> Result<()> {
        self.scene_mut()?.paint(ctx.gpu, ctx.window, invalid)?;
        Ok(())
    }
}
