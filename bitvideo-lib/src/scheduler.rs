//! Fixed-rate playback with time-debt drift correction.

use crate::*;
use std::{
    fmt,
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

pub trait Clock {
    /// Time since some fixed origin.
    fn now(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// How time debt carries over between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Slack left after a fast frame is banked as negative debt and added to
    /// the next frame's elapsed time; any overrun clears it. Under steadily
    /// fast renders the sleeps grow frame after frame.
    Compat,

    /// Debt is how far behind schedule we are. It shortens the following
    /// sleeps until paid off, and is forgiven once it exceeds a whole frame.
    CatchUp,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::CatchUp
    }
}

impl FromStr for Pacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compat" => Ok(Pacing::Compat),
            "catch-up" | "catchup" => Ok(Pacing::CatchUp),
            _ => Err(Error::InvalidParams(format!(
                "unknown pacing `{}` (expected `compat` or `catch-up`)",
                s
            ))),
        }
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pacing::Compat => write!(f, "compat"),
            Pacing::CatchUp => write!(f, "catch-up"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackStats {
    pub frames: usize,
    pub overruns: usize,
    pub slept: Duration,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: f64,
    pacing: Pacing,
    debt: f64,
}

impl Scheduler {
    pub fn new(params: &Params, pacing: Pacing) -> Self {
        Self::with_interval(params.frame_interval(), pacing)
    }

    pub fn with_interval(interval: Duration, pacing: Pacing) -> Self {
        Self {
            interval: interval.as_secs_f64(),
            pacing,
            debt: 0.0,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Current time debt in seconds; its sign depends on the pacing.
    pub fn debt(&self) -> f64 {
        self.debt
    }

    /// Accounts for one rendered frame and returns how long to sleep before
    /// the next one.
    pub fn advance(&mut self, render_time: Duration) -> Duration {
        let interval = self.interval;
        let elapsed = render_time.as_secs_f64() + self.debt;

        self.debt = match self.pacing {
            Pacing::Compat => {
                if elapsed > interval {
                    0.0
                } else {
                    elapsed - interval
                }
            }

            Pacing::CatchUp => {
                let behind = elapsed - interval;

                if behind > 0.0 && behind <= interval {
                    behind
                } else {
                    0.0
                }
            }
        };

        Duration::from_secs_f64((interval - elapsed).max(0.0))
    }

    /// Renders `frames` in order, pacing them against `clock`.
    ///
    /// A failed render aborts playback.
    pub fn play<'a, R, C>(
        &mut self,
        frames: impl IntoIterator<Item = &'a Frame>,
        renderer: &mut R,
        clock: &mut C,
    ) -> Result<PlaybackStats>
    where
        R: Renderer + ?Sized,
        C: Clock + ?Sized,
    {
        let mut stats = PlaybackStats::default();

        for frame in frames {
            let start = clock.now();

            renderer.render(frame)?;

            let render_time = clock.now().saturating_sub(start);
            let sleep = self.advance(render_time);

            if sleep.is_zero() {
                log::trace!(
                    "Frame {} overran: rendered in {:?}, debt {:.4}s",
                    stats.frames,
                    render_time,
                    self.debt
                );

                stats.overruns += 1;
            }

            clock.sleep(sleep);

            stats.frames += 1;
            stats.slept += sleep;
        }

        Ok(stats)
    }
}
