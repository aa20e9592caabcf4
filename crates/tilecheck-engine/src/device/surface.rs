use winit::dpi::PhysicalSize;

/// What the presenter does after a failed surface acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated: the surface was configured again and the next
    /// invalidated paint acquires a fresh backbuffer.
    Reconfigured,
    /// Timeout or an unspecified backend error; this paint draws nothing.
    SkipFrame,
    /// Out of memory.
    Fatal,
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    preferred: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if caps.formats.contains(&preferred) {
        return Some(preferred);
    }

    // Fall back to any non-sRGB 8-bit format before taking whatever comes first.
    let fallback = [
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
    ];
    fallback
        .into_iter()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Applies `new_size` to the surface configuration.
///
/// Returns `false` when the size is zero; configuration is deferred in that case.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: &[wgpu::TextureFormat],
        alpha: &[wgpu::CompositeAlphaMode],
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: alpha.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn preferred_format_wins_when_supported() {
        use wgpu::TextureFormat::*;
        let c = caps(&[Bgra8UnormSrgb, Bgra8Unorm], &[]);
        assert_eq!(choose_surface_format(&c, Bgra8Unorm), Some(Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_non_srgb_before_first_format() {
        use wgpu::TextureFormat::*;
        let c = caps(&[Rgba8UnormSrgb, Rgba8Unorm], &[]);
        assert_eq!(choose_surface_format(&c, Bgra8Unorm), Some(Rgba8Unorm));

        let c = caps(&[Rgba16Float], &[]);
        assert_eq!(choose_surface_format(&c, Bgra8Unorm), Some(Rgba16Float));
        assert_eq!(choose_surface_format(&caps(&[], &[]), Bgra8Unorm), None);
    }

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        use wgpu::CompositeAlphaMode::*;
        let c = caps(&[], &[PreMultiplied, Inherit]);
        assert_eq!(choose_alpha_mode(&c, Some(Opaque)), PreMultiplied);
        assert_eq!(choose_alpha_mode(&c, Some(Inherit)), Inherit);
        assert_eq!(choose_alpha_mode(&caps(&[], &[]), None), Auto);
    }
}
