//! Local clock driver for widgets that display the time.
//!
//! A [`ClockTick`] samples the wall clock on a fixed period and advances a
//! rotation counter used to pick the banner font for the time display. It
//! never touches external data.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Default tick period.
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Banner fonts the time display rotates through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Straight,
    AnsiShadow,
    Shimrod,
    Doom,
    Big,
    Ogre,
    Small,
    Standard,
    Bigfig,
    Mini,
    SmallScript,
    SmallShadow,
}

impl FontStyle {
    pub const ALL: [FontStyle; 12] = [
        FontStyle::Straight,
        FontStyle::AnsiShadow,
        FontStyle::Shimrod,
        FontStyle::Doom,
        FontStyle::Big,
        FontStyle::Ogre,
        FontStyle::Small,
        FontStyle::Standard,
        FontStyle::Bigfig,
        FontStyle::Mini,
        FontStyle::SmallScript,
        FontStyle::SmallShadow,
    ];

    /// Style selected by rotation counter `n`.
    pub fn from_rotation(n: u64) -> FontStyle {
        Self::ALL[(n % Self::ALL.len() as u64) as usize]
    }

    /// FIGlet font name; the font file is `<name>.flf`.
    pub fn name(&self) -> &'static str {
        match self {
            FontStyle::Straight => "Straight",
            FontStyle::AnsiShadow => "ANSI Shadow",
            FontStyle::Shimrod => "Shimrod",
            FontStyle::Doom => "doom",
            FontStyle::Big => "Big",
            FontStyle::Ogre => "Ogre",
            FontStyle::Small => "Small",
            FontStyle::Standard => "Standard",
            FontStyle::Bigfig => "Bigfig",
            FontStyle::Mini => "Mini",
            FontStyle::SmallScript => "Small Script",
            FontStyle::SmallShadow => "Small Shadow",
        }
    }
}

/// Periodic wall-clock sample plus rotation counter.
#[derive(Debug, Clone)]
pub struct ClockTick {
    now: DateTime<Local>,
    rotation: u64,
    period: Duration,
    next_due: Instant,
}

impl ClockTick {
    /// Starts a clock at the current local time.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Local::now(), period)
    }

    /// A zero `period` falls back to [`DEFAULT_TICK`].
    pub fn starting_at(now: DateTime<Local>, period: Duration) -> Self {
        let period = if period.is_zero() { DEFAULT_TICK } else { period };
        Self {
            now,
            rotation: 0,
            period,
            next_due: Instant::now() + period,
        }
    }

    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    pub fn rotation(&self) -> u64 {
        self.rotation
    }

    pub fn style(&self) -> FontStyle {
        FontStyle::from_rotation(self.rotation)
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Records a new time sample and advances the rotation.
    ///
    /// The stored time never moves backwards, even if the wall clock does.
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.now = self.now.max(now);
        self.rotation = self.rotation.wrapping_add(1);
    }

    /// Ticks once if the period has elapsed at `at`, sampling `wall` as the
    /// new time. Returns `true` if a tick happened.
    pub fn poll(&mut self, at: Instant, wall: DateTime<Local>) -> bool {
        if at < self.next_due {
            return false;
        }
        self.next_due = next_after(self.next_due, self.period, at);
        self.tick(wall);
        true
    }
}

/// First deadline on the `due + k * period` grid that is strictly after `now`.
///
/// Missed periods are skipped in one step. `period` must be non-zero.
pub(crate) fn next_after(due: Instant, period: Duration, now: Instant) -> Instant {
    if now < due {
        return due;
    }
    let missed = now.duration_since(due).as_nanos() / period.as_nanos();
    let steps = u32::try_from(missed + 1).unwrap_or(u32::MAX);
    due + period.saturating_mul(steps)
}

impl Default for ClockTick {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}
