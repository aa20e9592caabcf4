use super::*;
use crate::fatal::{HasStatus, Status};

const RED: [u8; 4] = [0x00, 0x00, 0x80, 0xFF];
const GREEN: [u8; 4] = [0x00, 0x80, 0x00, 0xFF];

/// Headless device, or `None` on machines without any adapter.
fn create_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tiled tests"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .ok()
    })
}

macro_rules! device_or_skip {
    () => {
        match create_device_queue() {
            Some(pair) => pair,
            None => {
                eprintln!("no wgpu adapter available; skipping");
                return;
            }
        }
    };
}

fn harness_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> (TiledTexture, TilePool) {
    let mut texture = TiledTexture::new(
        device,
        TextureDesc::tiled(TexelFormat::Bgra8Unorm, 256, 256),
    )
    .expect("create tiled texture");
    let pool = TilePool::new(device, TILE_SIZE_IN_BYTES).expect("create tile pool");
    texture
        .map_tile(queue, TileCoord::new(0, 0), &pool, PoolSlot(0))
        .expect("map tile (0, 0)");
    (texture, pool)
}

fn uniform(texels: usize, color: [u8; 4]) -> Vec<u8> {
    color.iter().copied().cycle().take(texels * 4).collect()
}

fn texel(image: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * 256 + x) * 4) as usize;
    [image[i], image[i + 1], image[i + 2], image[i + 3]]
}

#[test]
fn created_texture_reports_tiled_flag() {
    let (device, _queue) = device_or_skip!();
    for (w, h) in [(128, 128), (256, 256), (512, 256)] {
        let texture = TiledTexture::new(&device, TextureDesc::tiled(TexelFormat::Bgra8Unorm, w, h))
            .expect("aligned extent");
        assert!(texture.is_tiled());
        assert!(texture.desc().flags.contains(ResourceFlags::TILED));
        assert_eq!(texture.mapping().mapped_count(), 0);
    }
}

#[test]
fn pool_size_must_be_whole_tiles() {
    let (device, _queue) = device_or_skip!();
    assert!(matches!(
        TilePool::new(&device, 1000),
        Err(TiledError::InvalidPoolSize { .. })
    ));
    assert!(matches!(
        TilePool::new(&device, 0),
        Err(TiledError::InvalidPoolSize { .. })
    ));
    let pool = TilePool::new(&device, 2 * TILE_SIZE_IN_BYTES).expect("two-tile pool");
    assert_eq!(pool.capacity_tiles(), 2);
    assert!(pool.flags().contains(ResourceFlags::TILE_POOL));
}

#[test]
fn mapping_checks_slot_and_pool() {
    let (device, queue) = device_or_skip!();
    let (mut texture, pool) = harness_texture(&device, &queue);

    assert!(matches!(
        texture.map_tile(&queue, TileCoord::new(1, 0), &pool, PoolSlot(1)),
        Err(TiledError::PoolSlotOutOfRange { capacity: 1, .. })
    ));
    let other = TilePool::new(&device, TILE_SIZE_IN_BYTES).expect("second pool");
    assert!(matches!(
        texture.map_tile(&queue, TileCoord::new(1, 0), &other, PoolSlot(0)),
        Err(TiledError::PoolMismatch)
    ));
    assert_eq!(
        texture
            .map_tile(&queue, TileCoord::new(0, 0), &pool, PoolSlot(0))
            .expect("remap"),
        Some(PoolSlot(0))
    );
}

#[test]
fn uniform_tile_write_reads_back_uniform() {
    let (device, queue) = device_or_skip!();
    let (texture, _pool) = harness_texture(&device, &queue);

    texture
        .write_tile(&queue, TileCoord::new(0, 0), &uniform(128 * 128, RED), 0)
        .expect("write tile");
    let image = texture.read_back(&device, &queue).expect("read back");

    for y in 0..128 {
        for x in 0..128 {
            assert_eq!(texel(&image, x, y), RED, "texel ({x}, {y})");
        }
    }
    assert_eq!(texel(&image, 128, 0), [0; 4]);
    assert_eq!(texel(&image, 255, 255), [0; 4]);
}

#[test]
fn subregion_write_only_changes_its_box() {
    let (device, queue) = device_or_skip!();
    let (texture, _pool) = harness_texture(&device, &queue);

    texture
        .write_tile(&queue, TileCoord::new(0, 0), &uniform(128 * 128, GREEN), 0)
        .expect("clear tile");

    let mut patch = Vec::with_capacity(32 * 32 * 4);
    for y in 0..32u8 {
        for x in 0..32u8 {
            patch.extend_from_slice(&[x, y, 0x55, 0xFF]);
        }
    }
    let region = TexelBox::rect(12, 12, 32, 32);
    texture
        .write_subregion(&queue, 0, region, &patch, 32 * 4, 32 * 32 * 4)
        .expect("write subregion");

    let image = texture.read_back(&device, &queue).expect("read back");
    for y in 0..128 {
        for x in 0..128 {
            let expected = if region.contains(x, y) {
                [(x - 12) as u8, (y - 12) as u8, 0x55, 0xFF]
            } else {
                GREEN
            };
            assert_eq!(texel(&image, x, y), expected, "texel ({x}, {y})");
        }
    }
}

#[test]
fn writing_unmapped_tile_fails_with_error_status() {
    let (device, queue) = device_or_skip!();
    let texture = TiledTexture::new(&device, TextureDesc::tiled(TexelFormat::Bgra8Unorm, 256, 256))
        .expect("create tiled texture");

    let err = texture
        .write_tile(&queue, TileCoord::new(0, 0), &uniform(128 * 128, RED), 0)
        .unwrap_err();
    assert!(matches!(err, TiledError::TileNotMapped(_)));
    assert_ne!(err.status(), Status::OK);
    assert!(err.status().is_failure());

    let (texture, _pool) = harness_texture(&device, &queue);
    let err = texture
        .write_tile(&queue, TileCoord::new(1, 1), &uniform(128 * 128, RED), 0)
        .unwrap_err();
    assert!(matches!(err, TiledError::TileNotMapped(c) if c == TileCoord::new(1, 1)));
}
