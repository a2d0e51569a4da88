use crate::*;
use ::image::Pixel;

pub const LUMINANCE_THRESHOLD: f32 = 128.0;

/// Perceptual brightness (Rec. 709 weights) of an RGB triple.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32
}

pub fn is_lit(r: u8, g: u8, b: u8) -> bool {
    luminance(r, g, b) > LUMINANCE_THRESHOLD
}

/// Pixel coordinates picked by the resolution mod, in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    stride: u32,
}

impl SampleGrid {
    pub fn new(params: &Params) -> Self {
        Self {
            width: params.source_width,
            height: params.source_height,
            stride: params.resolution_mod,
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let stride = self.stride as usize;

        (0..self.height)
            .step_by(stride)
            .flat_map(move |y| (0..self.width).step_by(stride).map(move |x| (x, y)))
    }

    pub fn len(&self) -> usize {
        self.width.div_ceil(self.stride) as usize * self.height.div_ceil(self.stride) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Thresholds every sampled pixel of `img` into a fresh pixel vector.
    pub fn sample(&self, img: &RgbImage) -> Result<Vec<bool>, SampleError> {
        if img.width() < self.width || img.height() < self.height {
            return Err(SampleError {
                expected: (self.width, self.height),
                actual: img.dimensions(),
            });
        }

        Ok(self
            .positions()
            .map(|(x, y)| {
                let p = img.get_pixel(x, y).channels();

                is_lit(p[0], p[1], p[2])
            })
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("image is {actual:?}, expected at least {expected:?}")]
pub struct SampleError {
    pub expected: (u32, u32),
    pub actual: (u32, u32),
}
