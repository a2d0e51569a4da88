use crate::*;
use std::{fs, io, path::Path};

/// Splits `bits` into `width`x`height` frames.
///
/// A trailing chunk shorter than a whole frame is dropped; the caller sees it
/// only through the returned frame count.
pub fn to_frames(bits: &[bool], width: usize, height: usize) -> Result<Vec<Frame>> {
    let frame_resolution = width * height;

    if frame_resolution == 0 {
        return Err(Error::InvalidParams(format!(
            "frame resolution must be positive, got {}x{}",
            width, height
        )));
    }

    let frames: Vec<_> = bits
        .chunks_exact(frame_resolution)
        .map(|chunk| Frame::new(width, height, chunk.to_vec()))
        .collect();

    if frames.is_empty() {
        return Err(Error::EmptyResult {
            bits: bits.len(),
            frame_resolution,
        });
    }

    Ok(frames)
}

#[derive(Debug)]
pub struct Video {
    frames: Vec<Frame>,
    leftover_bits: usize,
}

impl Video {
    pub fn open(path: impl AsRef<Path>, params: &Params) -> Result<Self> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_owned()),
            _ => Error::Io(err),
        })?;

        log::info!("Read {} bytes from {}", bytes.len(), path.display());

        Self::decode(&bytes, params)
    }

    /// Decodes `bytes` into frames.
    ///
    /// With [`Params::frame_count`] set, exactly that many frames are kept and
    /// the rest of the stream is treated as padding. Without it every full
    /// frame is kept, which can include frames made of padding when a frame
    /// holds fewer than 8 pixels.
    pub fn decode(bytes: &[u8], params: &Params) -> Result<Self> {
        let bits = bits::unpack(bytes);
        let frame_resolution = params.frame_resolution();

        let usable = match params.frame_count() {
            Some(expected) => {
                let needed = expected * frame_resolution;

                if bits.len() < needed {
                    return Err(Error::FrameCountMismatch {
                        expected,
                        actual: bits.len() / frame_resolution,
                    });
                }

                if bits.len() - needed >= 8 {
                    log::warn!(
                        "{} bits left after {} frames; the file is longer than expected",
                        bits.len() - needed,
                        expected
                    );
                }

                &bits[..needed]
            }

            None => &bits[..],
        };

        let frames = to_frames(usable, params.frame_width(), params.frame_height())?;
        let leftover_bits = bits.len() - frames.len() * frame_resolution;

        log::info!(
            "Decoded {} frames of {}x{}",
            frames.len(),
            params.frame_width(),
            params.frame_height()
        );

        if params.frame_count().is_none() && leftover_bits >= 8 {
            log::warn!(
                "Dropped {} trailing bits that don't fill a frame; check the frame size",
                leftover_bits
            );
        }

        Ok(Self {
            frames,
            leftover_bits,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Bits after the last kept frame: the padding, plus any partial frame
    /// when the frame count wasn't known.
    pub fn leftover_bits(&self) -> usize {
        self.leftover_bits
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}
