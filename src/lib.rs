//! devboard - terminal developer dashboard.
//!
//! The library provides:
//! - `layout` - panel geometry (absolute / percentage-with-offset placement)
//! - `provider` - fetch collaborator abstraction, weather source, mock data
//! - `store` - polling data store turning async fetches into request state
//! - `clock` - periodic clock tick and banner font rotation
//! - `runtime` - current-thread runtime setup and detached shutdown
//! - `banner` - ASCII-art text rendering
//! - `fmt` - pure text formatting for widgets
//! - `tui` - compositor, widgets, rendering (ratatui/crossterm)

pub mod banner;
pub mod clock;
pub mod fmt;
pub mod layout;
pub mod provider;
pub mod runtime;
pub mod store;
pub mod tui;
