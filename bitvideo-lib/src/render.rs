use crate::*;
use std::io::Write;

pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

/// Text drawn for lit and unlit pixels; both should be the same width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub on: String,
    pub off: String,
}

impl Glyphs {
    pub fn new(on: impl Into<String>, off: impl Into<String>) -> Self {
        Self {
            on: on.into(),
            off: off.into(),
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::new("██", "  ")
    }
}

const CURSOR_HOME: &str = "\x1b[H";
const RESET: &str = "\x1bc";

/// Draws frames over each other by homing the cursor instead of clearing.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    glyphs: Glyphs,
    buffer: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, glyphs: Glyphs) -> Self {
        Self {
            out,
            glyphs,
            buffer: String::new(),
        }
    }

    /// Wipes the terminal; call once before the first frame.
    pub fn reset(&mut self) -> Result<()> {
        self.out.write_all(RESET.as_bytes())?;
        self.out.flush()?;

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&mut self, frame: &Frame) {
        let glyphs = &self.glyphs;

        self.buffer.clear();
        self.buffer.push_str(CURSOR_HOME);

        for row in frame.rows() {
            for &pixel in row {
                self.buffer
                    .push_str(if pixel { &glyphs.on } else { &glyphs.off });
            }

            self.buffer.push('\n');
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.compose(frame);

        // One write per frame, so the terminal never shows half of one
        self.out.write_all(self.buffer.as_bytes())?;
        self.out.flush()?;

        Ok(())
    }
}
