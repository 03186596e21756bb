//! Dashboard widgets.
//!
//! Widgets never draw to the terminal themselves. Each one produces a
//! [`PanelView`] (panel geometry plus positioned text) that the compositor's
//! render pass turns into screen cells.

mod placeholder;
mod today;

pub use placeholder::Placeholder;
pub use today::{Today, TodayConfig, status_line};

use ratatui::text::Line;
use tokio::time::Instant;

use crate::layout::{PanelSpec, Slot};

/// A positioned block of text inside a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub slot: Slot,
    pub lines: Vec<Line<'static>>,
}

impl TextNode {
    pub fn new(slot: Slot, lines: Vec<Line<'static>>) -> Self {
        Self { slot, lines }
    }

    /// Widest line in cells.
    pub fn width(&self) -> u16 {
        self.lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16
    }

    pub fn height(&self) -> u16 {
        self.lines.len().min(u16::MAX as usize) as u16
    }
}

/// Render tree for one panel: a bordered, labeled box with text nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub spec: PanelSpec,
    pub nodes: Vec<TextNode>,
}

/// A self-contained dashboard unit rendered inside one panel.
///
/// Timer and data callbacks mutate only the widget's own state. All methods
/// are called from the compositor loop.
pub trait Widget {
    fn panel(&self) -> &PanelSpec;

    /// Builds the current render tree.
    fn view(&self) -> PanelView;

    /// Applies settled fetches. Returns `true` if the view changed.
    fn sync(&mut self) -> bool {
        false
    }

    /// Fires every timer due at `now`. Returns `true` if the view changed.
    fn on_timer(&mut self, _now: Instant) -> bool {
        false
    }

    /// Earliest pending timer deadline.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    /// Starts an out-of-schedule refresh of external data.
    fn refresh(&mut self) {}
}
