//! Panel geometry.
//!
//! Panels are placed directly by absolute cell counts or percentages of the
//! parent area, optionally with an additive offset (`"50%-3"`). There is no
//! constraint solving: every coordinate resolves independently against the
//! parent rectangle and is clamped to stay inside it.

use std::fmt;
use std::str::FromStr;

use ratatui::layout::Rect;

/// One coordinate or extent of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Absolute number of cells.
    Cells(u16),
    /// Percentage of the parent extent plus a signed cell offset.
    Percent { pct: u16, offset: i32 },
}

impl Dimension {
    /// `pct` percent of the parent with no offset.
    pub const fn pct(pct: u16) -> Self {
        Dimension::Percent { pct, offset: 0 }
    }

    /// Resolves against a parent extent of `parent` cells.
    ///
    /// Percentages floor, then the offset is applied. The result is clamped to
    /// `0..=parent`.
    pub fn resolve(&self, parent: u16) -> u16 {
        let raw = match *self {
            Dimension::Cells(n) => i64::from(n),
            Dimension::Percent { pct, offset } => {
                i64::from(parent) * i64::from(pct) / 100 + i64::from(offset)
            }
        };
        raw.clamp(0, i64::from(parent)) as u16
    }
}

impl From<u16> for Dimension {
    fn from(n: u16) -> Self {
        Dimension::Cells(n)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Dimension::Cells(n) => write!(f, "{}", n),
            Dimension::Percent { pct, offset: 0 } => write!(f, "{}%", pct),
            Dimension::Percent { pct, offset } if offset > 0 => write!(f, "{}%+{}", pct, offset),
            Dimension::Percent { pct, offset } => write!(f, "{}%{}", pct, offset),
        }
    }
}

/// Error returned when a dimension string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionParseError(String);

impl fmt::Display for DimensionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid dimension '{}'", self.0)
    }
}

impl std::error::Error for DimensionParseError {}

impl FromStr for Dimension {
    type Err = DimensionParseError;

    /// Accepts `"12"`, `"50%"`, `"50%+2"` and `"100%-3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || DimensionParseError(s.to_string());

        let Some((pct, rest)) = s.split_once('%') else {
            return s.parse::<u16>().map(Dimension::Cells).map_err(|_| err());
        };
        let pct = pct.trim().parse::<u16>().map_err(|_| err())?;
        let rest = rest.trim();
        let (sign, magnitude) = if rest.is_empty() {
            return Ok(Dimension::pct(pct));
        } else if let Some(n) = rest.strip_prefix('+') {
            (1, n)
        } else if let Some(n) = rest.strip_prefix('-') {
            (-1, n)
        } else {
            return Err(err());
        };
        // The magnitude is unsigned so "50%--3" and "50%+-3" are rejected.
        let magnitude = magnitude.trim().parse::<u16>().map_err(|_| err())?;
        Ok(Dimension::Percent {
            pct,
            offset: sign * i32::from(magnitude),
        })
    }
}

/// A labeled rectangular region. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSpec {
    pub label: String,
    pub top: Dimension,
    pub left: Dimension,
    pub width: Dimension,
    pub height: Dimension,
}

impl PanelSpec {
    pub fn new(
        label: impl Into<String>,
        top: Dimension,
        left: Dimension,
        width: Dimension,
        height: Dimension,
    ) -> Self {
        Self {
            label: label.into(),
            top,
            left,
            width,
            height,
        }
    }

    /// Resolves the panel rectangle inside `parent`.
    ///
    /// Width and height are shrunk so the panel never spills past the parent's
    /// right or bottom edge.
    pub fn resolve(&self, parent: Rect) -> Rect {
        let x = self.left.resolve(parent.width);
        let y = self.top.resolve(parent.height);
        let width = self.width.resolve(parent.width).min(parent.width - x);
        let height = self.height.resolve(parent.height).min(parent.height - y);
        Rect::new(parent.x + x, parent.y + y, width, height)
    }
}

/// Placement of a block of text inside a panel's inner area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// First row, flush right.
    TopRight,
    /// Centered on both axes.
    Center,
    /// Explicit offsets from the inner top-left corner.
    At { top: Dimension, left: Dimension },
}

impl Slot {
    /// Computes where a `width`×`height` text block lands inside `inner`.
    ///
    /// The returned rectangle is always contained in `inner`; text that does
    /// not fit is clipped on the right and bottom.
    pub fn place(&self, inner: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(inner.width);
        let height = height.min(inner.height);
        let (dx, dy) = match *self {
            Slot::TopRight => (inner.width - width, 0),
            Slot::Center => ((inner.width - width) / 2, (inner.height - height) / 2),
            Slot::At { top, left } => (left.resolve(inner.width), top.resolve(inner.height)),
        };
        let width = width.min(inner.width - dx);
        let height = height.min(inner.height - dy);
        Rect::new(inner.x + dx, inner.y + dy, width, height)
    }
}
