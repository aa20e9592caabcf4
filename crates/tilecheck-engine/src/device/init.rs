/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backbuffer format to use when the surface supports it.
    ///
    /// The harness renders into a non-sRGB BGRA8 backbuffer, matching the
    /// tiled texture's format.
    pub preferred_format: wgpu::TextureFormat,

    /// Present mode (swap behavior).
    ///
    /// `AutoNoVsync` presents immediately where the platform allows it.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// Tiled textures bind two storage buffers in the fragment stage, which
    /// the default limits allow.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (two buffers in flight).
    pub desired_maximum_frame_latency: u32,

    /// Use the software fallback adapter instead of a hardware one.
    pub force_fallback_adapter: bool,

    /// Enable backend validation and debug labels.
    pub debug_layers: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            preferred_format: wgpu::TextureFormat::Bgra8Unorm,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: Some(wgpu::CompositeAlphaMode::Opaque),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            force_fallback_adapter: false,
            debug_layers: cfg!(debug_assertions),
        }
    }
}
