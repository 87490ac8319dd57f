//! Owned 3-channel 8-bit image in row-major, channel-interleaved layout.
use super::traits::{ImageView, ImageViewMut};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImageU8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Bytes between consecutive rows (equals `3 * w`)
    pub stride: usize,
    /// Backing storage, `[r, g, b]` per pixel
    pub data: Vec<u8>,
}

impl RgbImageU8 {
    /// Zero-initialized `w × h` image.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w * CHANNELS,
            data: vec![0; w * h * CHANNELS],
        }
    }

    /// Wrap raw interleaved bytes; returns `None` when the length does not match.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == w * h * CHANNELS).then_some(Self {
            w,
            h,
            stride: w * CHANNELS,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * CHANNELS
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = self.idx(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: [u8; 3]) {
        let i = self.idx(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
    }
}

impl ImageView for RgbImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn channels(&self) -> usize {
        CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * CHANNELS]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        self.is_contiguous()
            .then_some(&self.data[..self.w * self.h * CHANNELS])
    }
}

impl ImageViewMut for RgbImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.w * CHANNELS;
        &mut self.data[start..end]
    }
}
