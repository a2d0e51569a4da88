pub mod bits;
mod error;
mod frame;
mod params;
mod render;
mod sample;
mod scheduler;
mod source;
mod stats;
mod video;

pub use ::image::RgbImage;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

pub use self::{
    bits::{BitPacker, BitWriter},
    error::*,
    frame::*,
    params::*,
    render::*,
    sample::*,
    scheduler::*,
    source::*,
    stats::*,
    video::*,
};

/// Turns frame images into a BitVideo stream.
///
/// Every frame goes through the one [`BitWriter`] this holds, in the order
/// they are added; frames must not be written to the same output any other
/// way.
#[derive(Debug)]
pub struct Encoder<W: Write> {
    grid: SampleGrid,
    writer: BitWriter<W>,
    stats: Stats,
}

impl Encoder<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>, params: &Params) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => Error::NotFound(path.to_owned()),
                _ => Error::Io(err),
            })?;

        Ok(Self::new(params, BufWriter::new(file)))
    }
}

impl<W: Write> Encoder<W> {
    pub fn new(params: &Params, sink: W) -> Self {
        Self {
            grid: SampleGrid::new(params),
            writer: BitWriter::new(sink),
            stats: Default::default(),
        }
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Appends the next frame; errors carry its 1-based number.
    pub fn add(&mut self, image: &RgbImage) -> Result<()> {
        let pixels = self
            .grid
            .sample(image)
            .map_err(|err| Error::encode(self.stats.frames + 1, err))?;

        self.add_pixels(&pixels)
    }

    /// Appends an already thresholded frame, as produced by
    /// [`SampleGrid::sample`].
    pub fn add_pixels(&mut self, pixels: &[bool]) -> Result<()> {
        let frame = self.stats.frames + 1;

        if pixels.len() != self.grid.len() {
            return Err(Error::encode(
                frame,
                anyhow::anyhow!(
                    "frame has {} pixels, expected {}",
                    pixels.len(),
                    self.grid.len()
                ),
            ));
        }

        self.writer
            .write(pixels.iter().copied())
            .map_err(|err| Error::encode(frame, err))?;

        self.stats.frames += 1;
        self.stats.pixels += pixels.len();

        log::trace!("Wrote frame {}", frame);

        Ok(())
    }

    pub fn finish(self) -> Result<(Stats, W)> {
        let mut stats = self.stats;

        stats.bytes = (stats.pixels as u64 + 7) / 8;

        let sink = self.writer.finish()?;

        log::info!(
            "Encoded {} frames into {} bytes",
            stats.frames,
            stats.bytes
        );

        Ok((stats, sink))
    }
}

/// Encodes every frame of `source`, one at a time, aborting on the first
/// missing or broken frame.
pub fn encode<W: Write>(source: &Source, params: &Params, sink: W) -> Result<(Stats, W)> {
    let mut encoder = Encoder::new(params, sink);
    let grid = encoder.grid().clone();

    for idx in 0..source.len() {
        let pixels = source.load_sampled(idx, &grid)?;

        encoder.add_pixels(&pixels)?;
    }

    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Rgb;
    use pretty_assertions::assert_eq;

    fn image(width: u32, height: u32, lit: &[(u32, u32)]) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if lit.contains(&(x, y)) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn frames_are_packed_back_to_back() {
        let params = Params::new(3, 1, 1).unwrap();
        let mut encoder = Encoder::new(&params, Vec::new());

        encoder.add(&image(3, 1, &[(0, 0)])).unwrap();
        encoder.add(&image(3, 1, &[(2, 0)])).unwrap();
        encoder.add(&image(3, 1, &[(1, 0)])).unwrap();

        let (stats, bytes) = encoder.finish().unwrap();

        assert_eq!(bytes, vec![0b1000_0101, 0b0000_0000]);
        assert_eq!(
            stats,
            Stats {
                bytes: 2,
                frames: 3,
                pixels: 9,
            }
        );
    }

    #[test]
    fn small_frame_fails_with_its_index() {
        let params = Params::new(4, 4, 1).unwrap();
        let mut encoder = Encoder::new(&params, Vec::new());

        encoder.add(&image(4, 4, &[])).unwrap();

        assert!(matches!(
            encoder.add(&image(2, 2, &[])),
            Err(Error::EncodeFailure { frame: 2, .. })
        ));
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        let params = Params::new(2, 2, 1).unwrap();
        let mut encoder = Encoder::new(&params, Vec::new());

        assert!(matches!(
            encoder.add_pixels(&[true; 3]),
            Err(Error::EncodeFailure { frame: 1, .. })
        ));
    }

    #[test]
    fn append_keeps_existing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.BadApple");
        std::fs::write(&path, [0xab]).unwrap();

        let params = Params::new(8, 1, 1).unwrap();
        let mut encoder = Encoder::append(&path, &params).unwrap();
        encoder.add_pixels(&[true; 8]).unwrap();
        encoder.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0xab, 0xff]);
    }
}
