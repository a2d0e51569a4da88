use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't find {}", .0.display())]
    NotFound(PathBuf),

    /// Not even one full frame could be decoded; usually the configured
    /// width/height don't match the file.
    #[error("no full frames in {bits} bits (frame resolution {frame_resolution})")]
    EmptyResult { bits: usize, frame_resolution: usize },

    /// `frame` is 1-based, matching `frame1.png ..`.
    #[error("couldn't encode frame {frame}")]
    EncodeFailure {
        frame: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("expected {expected} frames, decoded {actual}")]
    FrameCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn encode(frame: usize, source: impl Into<anyhow::Error>) -> Self {
        Self::EncodeFailure {
            frame,
            source: source.into(),
        }
    }
}
