use anyhow::{ensure, Context, Result};
use bitvideo_lib::{Encoder, Params, Source};
use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
struct Opts {
    /// Folder with the frames extracted by ffmpeg (e.g. "frame0001.png")
    #[arg(value_name = "DIR", default_value = "video")]
    frames_dir: PathBuf,

    /// BitVideo file to append to
    #[arg(short, long, default_value = "test.BadApple")]
    output: PathBuf,

    #[arg(long, default_value_t = 480)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Sample every Nth pixel horizontally and vertically; the player has to
    /// be given the same value
    #[arg(long, default_value_t = 1)]
    resolution_mod: u32,

    /// Expect exactly N frames named `frame1.png ..= frameN.png` (zero-padded);
    /// without it every PNG in DIR is used, in name order
    #[arg(long)]
    frames: Option<usize>,

    /// How many frames to decode in parallel before writing them out
    #[arg(long, default_value_t = 64)]
    batch: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    ensure!(opts.batch > 0, "--batch must be at least 1");

    let params = Params::new(opts.width, opts.height, opts.resolution_mod)?;

    let source = match opts.frames {
        Some(count) => Source::numbered(&opts.frames_dir, count),
        None => Source::from_dir(&opts.frames_dir)
            .with_context(|| format!("Couldn't list {}", opts.frames_dir.display()))?,
    };

    ensure!(
        !source.is_empty(),
        "No frames found in {}",
        opts.frames_dir.display()
    );

    if fs::metadata(&opts.output).map_or(false, |meta| meta.len() > 0) {
        log::warn!(
            "{} isn't empty; new frames will be appended after its contents",
            opts.output.display()
        );
    }

    log::info!(
        "Encoding {} frames at {}x{}",
        source.len(),
        params.frame_width(),
        params.frame_height()
    );

    let mut encoder = Encoder::append(&opts.output, &params)
        .with_context(|| format!("Couldn't open {}", opts.output.display()))?;

    let grid = encoder.grid().clone();
    let progress = ProgressBar::new(source.len() as u64);
    let indices: Vec<usize> = (0..source.len()).collect();

    // Frames are decoded in parallel but written strictly in order, by the
    // one encoder that owns the output file.
    for batch in indices.chunks(opts.batch) {
        let frames = batch
            .par_iter()
            .progress_with(progress.clone())
            .map(|&idx| source.load_sampled(idx, &grid))
            .collect::<Result<Vec<_>, _>>()?;

        for pixels in frames {
            encoder.add_pixels(&pixels)?;
        }
    }

    progress.finish();

    let (stats, _) = encoder.finish()?;

    eprintln!("{:#?}", stats);
    eprintln!(
        "(encoded {} frames into {}; play with --expected-frames {})",
        stats.frames,
        opts.output.display(),
        stats.frames
    );

    Ok(())
}
