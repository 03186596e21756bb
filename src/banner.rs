//! Large ASCII-art text rendering.
//!
//! The time display goes through the [`Banner`] trait so the widget does not
//! depend on how fonts are loaded. [`FigletBanner`] renders with FIGlet
//! fonts: one `.flf` file per [`FontStyle`] when a font directory is given,
//! and the bundled standard font for any style that is missing.

use std::collections::HashMap;
use std::path::Path;

use figlet_rs::FIGfont;
use tracing::{debug, warn};

use crate::clock::FontStyle;

/// Renders text as multi-line ASCII art.
pub trait Banner: Send + Sync {
    fn render(&self, text: &str, style: FontStyle) -> Vec<String>;
}

/// FIGlet-backed banner renderer.
pub struct FigletBanner {
    fonts: HashMap<FontStyle, FIGfont>,
    fallback: Option<FIGfont>,
}

impl FigletBanner {
    /// Uses the bundled standard font for every style.
    pub fn standard() -> Self {
        let fallback = match FIGfont::standard() {
            Ok(font) => Some(font),
            Err(e) => {
                warn!(error = %e, "bundled FIGlet font unavailable; rendering plain text");
                None
            }
        };
        Self {
            fonts: HashMap::new(),
            fallback,
        }
    }

    /// Loads `<dir>/<style name>.flf` for every style that has one.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut banner = Self::standard();
        for style in FontStyle::ALL {
            let path = dir.join(format!("{}.flf", style.name()));
            let Some(path_str) = path.to_str() else {
                continue;
            };
            match FIGfont::from_file(path_str) {
                Ok(font) => {
                    debug!(font = style.name(), "loaded FIGlet font");
                    banner.fonts.insert(style, font);
                }
                Err(e) => {
                    debug!(font = style.name(), error = %e, "font missing, using standard");
                }
            }
        }
        banner
    }

    /// Number of styles with a dedicated font loaded.
    pub fn loaded_fonts(&self) -> usize {
        self.fonts.len()
    }
}

impl Banner for FigletBanner {
    fn render(&self, text: &str, style: FontStyle) -> Vec<String> {
        let figure = self
            .fonts
            .get(&style)
            .or(self.fallback.as_ref())
            .and_then(|font| font.convert(text));
        match figure {
            Some(figure) => {
                let mut lines: Vec<String> = figure
                    .to_string()
                    .lines()
                    .map(|l| l.trim_end().to_string())
                    .collect();
                while lines.last().is_some_and(|l| l.is_empty()) {
                    lines.pop();
                }
                lines
            }
            None => vec![text.to_string()],
        }
    }
}

/// Renders text unchanged, one line.
pub struct PlainBanner;

impl Banner for PlainBanner {
    fn render(&self, text: &str, _style: FontStyle) -> Vec<String> {
        vec![text.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_banner_is_multiline() {
        let banner = FigletBanner::standard();
        let lines = banner.render("12:30 PM", FontStyle::Doom);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l == l.trim_end()));
        assert!(!lines.last().unwrap().is_empty());
    }

    #[test]
    fn test_missing_font_dir_falls_back_to_standard() {
        let banner = FigletBanner::from_dir("/nonexistent/devboard/fonts");
        assert_eq!(banner.loaded_fonts(), 0);
        assert_eq!(
            banner.render("9", FontStyle::Ogre),
            FigletBanner::standard().render("9", FontStyle::Standard)
        );
    }

    #[test]
    fn test_plain_banner() {
        assert_eq!(PlainBanner.render("10:00 AM", FontStyle::Big), vec!["10:00 AM"]);
    }
}
