use anyhow::{Context, Result};
use bitvideo_lib::{Glyphs, Pacing, Params, Scheduler, SystemClock, TerminalRenderer, Video};
use clap::Parser;
use std::{io, path::PathBuf};

#[derive(Parser, Debug)]
struct Opts {
    /// BitVideo file produced by the encoder
    #[arg(value_name = "FILE", default_value = "BadApple.BadApple")]
    file: PathBuf,

    /// Width of the source frames, before the resolution mod
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Height of the source frames, before the resolution mod
    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Must match the value given to the encoder
    #[arg(long, default_value_t = 2)]
    resolution_mod: u32,

    #[arg(long, default_value_t = 24.0)]
    frame_rate: f64,

    /// Number of frames the encoder wrote. Padding bits in the last byte are
    /// only dropped reliably when this is given; too few bits is an error
    #[arg(long)]
    expected_frames: Option<usize>,

    /// `catch-up` makes up for slow frames; `compat` keeps the historical
    /// time-debt behaviour
    #[arg(long, default_value_t = Pacing::CatchUp)]
    pacing: Pacing,

    /// Drawn twice for every lit pixel
    #[arg(long, default_value = "█")]
    glyph: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    let mut params = Params::new(opts.width, opts.height, opts.resolution_mod)?
        .with_frame_rate(opts.frame_rate)?;

    if let Some(expected) = opts.expected_frames {
        params = params.with_frame_count(expected);
    }

    let video = Video::open(&opts.file, &params)
        .with_context(|| format!("Couldn't get any frames from {}", opts.file.display()))?;

    let on = opts.glyph.repeat(2);
    let off = " ".repeat(on.chars().count());

    let mut renderer = TerminalRenderer::new(io::stdout().lock(), Glyphs::new(on, off));
    let mut scheduler = Scheduler::new(&params, opts.pacing);

    renderer.reset()?;

    let stats = scheduler.play(video.frames(), &mut renderer, &mut SystemClock::new())?;

    log::info!(
        "Played {} frames ({} late), slept {:?}",
        stats.frames,
        stats.overruns,
        stats.slept
    );

    Ok(())
}
