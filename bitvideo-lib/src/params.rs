use crate::*;
use std::time::Duration;

/// Frame geometry, rate and length shared by the encoder and the player.
///
/// Nothing about these is stored in a BitVideo file, so both sides have to be
/// built from the same values. The frame count is what tells padding bits in
/// the last byte apart from real black pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub(crate) source_width: u32,
    pub(crate) source_height: u32,
    pub(crate) resolution_mod: u32,
    pub(crate) frame_rate: f64,
    pub(crate) frame_count: Option<usize>,
}

impl Params {
    pub fn new(source_width: u32, source_height: u32, resolution_mod: u32) -> Result<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(Error::InvalidParams(format!(
                "frame size must be positive, got {}x{}",
                source_width, source_height
            )));
        }

        if resolution_mod == 0 {
            return Err(Error::InvalidParams(
                "resolution mod must be at least 1".into(),
            ));
        }

        Ok(Self {
            source_width,
            source_height,
            resolution_mod,
            ..Default::default()
        })
    }

    /// Only the player cares about this; the file doesn't record it.
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Result<Self> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(Error::InvalidParams(format!(
                "frame rate must be positive, got {}",
                frame_rate
            )));
        }

        if Duration::try_from_secs_f64(1.0 / frame_rate).is_err() {
            return Err(Error::InvalidParams(format!(
                "frame rate {} is too low to time",
                frame_rate
            )));
        }

        self.frame_rate = frame_rate;

        Ok(self)
    }

    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = Some(frame_count);
        self
    }

    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    pub fn source_height(&self) -> u32 {
        self.source_height
    }

    pub fn resolution_mod(&self) -> u32 {
        self.resolution_mod
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn frame_count(&self) -> Option<usize> {
        self.frame_count
    }

    /// Width of a stored frame, i.e. the number of sampled columns.
    pub fn frame_width(&self) -> usize {
        self.source_width.div_ceil(self.resolution_mod) as usize
    }

    pub fn frame_height(&self) -> usize {
        self.source_height.div_ceil(self.resolution_mod) as usize
    }

    pub fn frame_resolution(&self) -> usize {
        self.frame_width() * self.frame_height()
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            source_width: 480,
            source_height: 360,
            resolution_mod: 2,
            frame_rate: 24.0,
            frame_count: None,
        }
    }
}
