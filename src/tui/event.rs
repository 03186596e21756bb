//! Terminal event forwarding.
//!
//! Uses a separate thread to poll the terminal and forwards events into the
//! async loop over a channel.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::warn;

/// How long the reader thread blocks before re-checking the channel.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Terminal events relevant to the dashboard.
#[derive(Debug)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize.
    Resize,
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            loop {
                if tx.is_closed() {
                    break;
                }
                match event::poll(POLL_TIMEOUT) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!(error = %e, "terminal poll failed");
                        break;
                    }
                }
                let event = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(error = %e, "terminal read failed");
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Handler fed by `rx` instead of the terminal.
    #[cfg(test)]
    pub(crate) fn from_channel(rx: UnboundedReceiver<Event>) -> Self {
        Self { rx }
    }

    /// Receives the next event; `None` once the reader thread has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
