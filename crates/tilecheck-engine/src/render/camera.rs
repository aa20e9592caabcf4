use bytemuck::{Pod, Zeroable};

/// Camera transform uniform: one 4x4 matrix, 64 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Pixel-space camera for a client area of `width`x`height`: origin top-left, +Y down.
    pub fn for_client_area(width: f32, height: f32) -> Self {
        Self {
            view_proj: ortho_off_center_lh(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0),
        }
    }
}

/// Left-handed off-center orthographic projection mapping depth to `[0, 1]`.
///
/// Rows are stored in the order the shader reads them as columns, so the
/// vertex stage multiplies `matrix * position`.
pub(crate) fn ortho_off_center_lh(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> [[f32; 4]; 4] {
    let rw = 1.0 / (right - left);
    let rh = 1.0 / (top - bottom);
    let range = 1.0 / (far - near);
    [
        [2.0 * rw, 0.0, 0.0, 0.0],
        [0.0, 2.0 * rh, 0.0, 0.0],
        [0.0, 0.0, range, 0.0],
        [-(left + right) * rw, -(top + bottom) * rh, -near * range, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &[[f32; 4]; 4], p: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = p[0] * m[0][i] + p[1] * m[1][i] + p[2] * m[2][i] + m[3][i];
        }
        out
    }

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn client_corners_map_to_ndc_corners() {
        let cam = CameraUniform::for_client_area(600.0, 600.0);
        assert!(approx(project(&cam.view_proj, [0.0, 0.0, 0.0]), [-1.0, 1.0, 0.5]));
        assert!(approx(project(&cam.view_proj, [600.0, 600.0, 0.0]), [1.0, -1.0, 0.5]));
        assert!(approx(project(&cam.view_proj, [300.0, 150.0, 0.0]), [0.0, 0.5, 0.5]));
    }

    #[test]
    fn recomputed_camera_tracks_new_aspect() {
        let cam = CameraUniform::for_client_area(800.0, 450.0);
        assert!(approx(project(&cam.view_proj, [800.0, 450.0, 0.0]), [1.0, -1.0, 0.5]));
    }

    #[test]
    fn uniform_is_one_matrix() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }
}
