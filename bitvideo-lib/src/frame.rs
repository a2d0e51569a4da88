#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Frame {
    /// Builds a frame from row-major pixels; `pixels.len()` must equal
    /// `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<bool>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "frame is {}x{} but got {} pixels",
            width,
            height,
            pixels.len()
        );

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: AsRef<[bool]>,
    {
        let mut width = None;
        let mut height = 0;
        let mut pixels = Vec::new();

        for row in rows {
            let row = row.as_ref();

            assert_eq!(*width.get_or_insert(row.len()), row.len(), "ragged rows");

            pixels.extend_from_slice(row);
            height += 1;
        }

        Self::new(width.unwrap_or(0), height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        // chunks_exact() panics on 0
        self.pixels.chunks_exact(self.width.max(1)).take(self.height)
    }

    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        self.pixels.iter().copied()
    }
}
