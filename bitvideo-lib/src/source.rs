use crate::*;
use ::image::io::Reader as ImageReader;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Ordered list of frame images on disk.
///
/// Images are loaded one at a time so memory stays bounded by the caller.
#[derive(Clone, Debug)]
pub struct Source {
    paths: Vec<PathBuf>,
}

impl Source {
    /// `frame1.png ..= frame{count}.png`, zero-padded to the width of `count`
    /// (ffmpeg's `frame%04d.png` for a 4-digit count).
    pub fn numbered(dir: impl AsRef<Path>, count: usize) -> Self {
        let dir = dir.as_ref();
        let digits = count.to_string().len();

        let paths = (1..=count)
            .map(|i| dir.join(format!("frame{:0width$}.png", i, width = digits)))
            .collect();

        Self { paths }
    }

    /// Every `*.png` in `dir`, in lexical order.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(Error::NotFound(dir.to_owned()));
        }

        let pattern = dir.join("*.png");

        let mut paths = glob::glob(&pattern.to_string_lossy())
            .map_err(|err| Error::InvalidParams(err.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| Error::Io(err.into_error()))?;

        paths.sort();

        log::debug!("Found {} frames in {}", paths.len(), dir.display());

        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Loads the frame at `idx` (0-based); failures name it by its 1-based
    /// number, like the files do.
    pub fn load(&self, idx: usize) -> Result<RgbImage> {
        let path = self.path(idx)?;

        if !path.is_file() {
            return Err(Error::NotFound(path.to_owned()));
        }

        let decode = || -> anyhow::Result<_> { Ok(ImageReader::open(path)?.decode()?) };

        let image = decode()
            .with_context(|| format!("Couldn't decode {}", path.display()))
            .map_err(|err| Error::encode(idx + 1, err))?;

        Ok(image.to_rgb8())
    }

    /// Loads frame `idx` and thresholds it through `grid`.
    pub fn load_sampled(&self, idx: usize, grid: &SampleGrid) -> Result<Vec<bool>> {
        let image = self.load(idx)?;
        let path = self.path(idx)?;

        grid.sample(&image)
            .with_context(|| format!("Couldn't sample {}", path.display()))
            .map_err(|err| Error::encode(idx + 1, err))
    }

    fn path(&self, idx: usize) -> Result<&Path> {
        self.paths
            .get(idx)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::InvalidParams(format!("no frame #{}", idx + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbered_paths_are_zero_padded() {
        let source = Source::numbered("video", 5255);

        assert_eq!(source.len(), 5255);
        assert_eq!(source.paths()[0], Path::new("video/frame0001.png"));
        assert_eq!(source.paths()[5254], Path::new("video/frame5255.png"));
    }

    #[test]
    fn missing_frame_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::numbered(dir.path(), 3);

        match source.load(1) {
            Err(Error::NotFound(path)) => assert_eq!(path, dir.path().join("frame2.png")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn undecodable_frame_is_an_encode_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frame1.png"), b"not a png").unwrap();

        let source = Source::numbered(dir.path(), 1);

        match source.load(0) {
            Err(err @ Error::EncodeFailure { frame: 1, .. }) => {
                let chain = format!("{:#}", anyhow::Error::new(err));
                assert!(chain.contains("frame1.png"), "{}", chain);
            }
            other => panic!("expected EncodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn load_sampled_tags_small_frames() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(2, 2)
            .save(dir.path().join("frame1.png"))
            .unwrap();

        let source = Source::numbered(dir.path(), 1);
        let grid = SampleGrid::new(&Params::new(2, 2, 1).unwrap());

        assert_eq!(source.load_sampled(0, &grid).unwrap(), vec![false; 4]);

        let grid = SampleGrid::new(&Params::new(3, 3, 1).unwrap());

        assert!(matches!(
            source.load_sampled(0, &grid),
            Err(Error::EncodeFailure { frame: 1, .. })
        ));
    }

    #[test]
    fn from_dir_sorts_pngs() {
        let dir = tempfile::tempdir().unwrap();

        for name in &["frame3.png", "frame1.png", "notes.txt", "frame2.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let source = Source::from_dir(dir.path()).unwrap();
        let names: Vec<_> = source
            .paths()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["frame1.png", "frame2.png", "frame3.png"]);
    }

    #[test]
    fn from_missing_dir_is_not_found() {
        assert!(matches!(
            Source::from_dir("/definitely/not/here"),
            Err(Error::NotFound(_))
        ));
    }
}
