//! Render pass: turns widget render trees into screen cells.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget as _};

use super::style::Styles;
use super::widgets::PanelView;

/// Draws every panel onto the frame, in declaration order.
pub fn render(frame: &mut Frame, views: &[PanelView]) {
    let area = frame.area();
    render_views(area, frame.buffer_mut(), views);
}

/// Buffer-level variant of [`render`].
pub fn render_views(area: Rect, buf: &mut Buffer, views: &[PanelView]) {
    for view in views {
        render_panel(area, buf, view);
    }
}

fn render_panel(screen: Rect, buf: &mut Buffer, view: &PanelView) {
    let rect = view.spec.resolve(screen);
    if rect.is_empty() {
        return;
    }

    let block = Block::bordered()
        .border_style(Styles::border())
        .title(Line::styled(format!(" {} ", view.spec.label), Styles::label()));
    let inner = block.inner(rect);
    block.render(rect, buf);

    for node in &view.nodes {
        let target = node.slot.place(inner, node.width(), node.height());
        if target.is_empty() {
            continue;
        }
        Paragraph::new(node.lines.clone())
            .style(Styles::default())
            .render(target, buf);
    }
}
