/// Tightly packed BGRA8 pixel data, row-major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const BYTES_PER_PIXEL: u32 = 4;

    /// Wraps `data`; returns `None` unless it holds exactly `width * height` pixels.
    pub fn from_bgra8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == Self::byte_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with one color, given as a little-endian `0xAARRGGBB` word.
    pub fn uniform(width: u32, height: u32, argb: u32) -> Self {
        let texel = argb.to_le_bytes();
        let data = texel
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_pitch(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL
    }

    /// Size of the whole image in bytes.
    pub fn depth_pitch(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// `[b, g, r, a]` at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * Self::BYTES_PER_PIXEL) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::BYTES_PER_PIXEL as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_words_are_stored_bgra() {
        let red = PixelBuffer::uniform(2, 2, 0xFF80_0000);
        assert_eq!(red.as_bytes().len(), 16);
        assert_eq!(red.pixel(1, 1), [0x00, 0x00, 0x80, 0xFF]);
        assert_eq!(red.row_pitch(), 8);
        assert_eq!(red.depth_pitch(), 16);
    }

    #[test]
    fn from_bgra8_checks_length() {
        assert!(PixelBuffer::from_bgra8(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_bgra8(2, 2, vec![0; 15]).is_none());
    }
}
