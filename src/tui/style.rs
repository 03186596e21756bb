//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Dashboard palette.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const BORDER: Color = Color::Gray;
    pub const LABEL: Color = Color::Cyan;

    // Weather accents
    pub const TEMPERATURE: Color = Color::Yellow;
    pub const CONDITIONS: Color = Color::Green;
    pub const LOW: Color = Color::Blue;
    pub const HIGH: Color = Color::Red;

    pub const DATE: Color = Color::Blue;
    pub const ERROR: Color = Color::Red;

    /// Stops of the "atlas" gradient used for the big clock.
    pub const ATLAS: [(u8, u8, u8); 3] = [
        (0xfe, 0xac, 0x5e),
        (0xc7, 0x79, 0xd0),
        (0x4b, 0xc0, 0xc8),
    ];
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Theme::FG)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::BORDER)
    }

    /// Panel title style.
    pub fn label() -> Style {
        Style::default()
            .fg(Theme::LABEL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn date() -> Style {
        Style::default().fg(Theme::DATE)
    }

    pub fn temperature() -> Style {
        Style::default().fg(Theme::TEMPERATURE)
    }

    pub fn conditions() -> Style {
        Style::default().fg(Theme::CONDITIONS)
    }

    pub fn low() -> Style {
        Style::default().fg(Theme::LOW)
    }

    pub fn high() -> Style {
        Style::default().fg(Theme::HIGH)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::ERROR)
    }
}

/// Color at position `t` (0.0..=1.0) along a multi-stop gradient.
fn gradient_at(stops: &[(u8, u8, u8)], t: f64) -> Color {
    match stops {
        [] => Theme::FG,
        [(r, g, b)] => Color::Rgb(*r, *g, *b),
        _ => {
            let t = t.clamp(0.0, 1.0);
            let segments = (stops.len() - 1) as f64;
            let pos = t * segments;
            let i = (pos.floor() as usize).min(stops.len() - 2);
            let local = pos - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            let mix = |x: u8, y: u8| {
                (f64::from(x) + (f64::from(y) - f64::from(x)) * local).round() as u8
            };
            Color::Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

/// Colors a block of text with a horizontal gradient.
///
/// Columns share the same color on every line, so vertical strokes of
/// ASCII art stay uniform.
pub fn gradient_lines(lines: &[String], stops: &[(u8, u8, u8)]) -> Vec<Line<'static>> {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let span = width.saturating_sub(1).max(1) as f64;
    lines
        .iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    let color = gradient_at(stops, col as f64 / span);
                    Span::styled(ch.to_string(), Style::default().fg(color))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_at(&Theme::ATLAS, 0.0), Color::Rgb(0xfe, 0xac, 0x5e));
        assert_eq!(gradient_at(&Theme::ATLAS, 0.5), Color::Rgb(0xc7, 0x79, 0xd0));
        assert_eq!(gradient_at(&Theme::ATLAS, 1.0), Color::Rgb(0x4b, 0xc0, 0xc8));
        assert_eq!(gradient_at(&[], 0.3), Theme::FG);
    }

    #[test]
    fn test_gradient_lines_keep_text_and_align_columns() {
        let lines = vec!["ab c".to_string(), "xy".to_string()];
        let colored = gradient_lines(&lines, &Theme::ATLAS);
        assert_eq!(colored.len(), 2);
        assert_eq!(colored[0].to_string(), "ab c");
        assert_eq!(colored[1].to_string(), "xy");
        assert_eq!(colored[0].spans[1].style.fg, colored[1].spans[1].style.fg);
    }
}
