//! Terminal User Interface for the dashboard.
//!
//! The compositor ([`App`]) declares a fixed grid of panels, runs the event
//! loop and owns the terminal. Widgets produce render trees that the render
//! pass draws with ratatui.

mod app;
mod event;
mod input;
mod render;
pub mod style;
pub mod widgets;

pub use app::{App, AppEvent, Phase};
pub use input::{KeyAction, handle_key};
pub use render::{render, render_views};
