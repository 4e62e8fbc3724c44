use crate::foundation::error::{ImgverbError, ImgverbResult};

/// A decoded frame as straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, origin top-left.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Wrap an RGBA8 buffer, checking that its length matches `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ImgverbResult<Self> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(ImgverbError::config(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} RGBA8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

pub(crate) fn rgba_len(width: u32, height: u32) -> ImgverbResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ImgverbError::config("frame buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
