//! Dashboard compositor.
//!
//! Owns the fixed set of widgets and their placement, the terminal, and the
//! event loop. The loop waits on terminal input, fetch completions and the
//! earliest widget timer, applies the event to the widgets, and redraws when
//! anything changed. Quitting is a transition to [`Phase::Terminated`]; the
//! loop then exits and the terminal is restored.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::banner::Banner;
use crate::layout::{Dimension, PanelSpec};
use crate::provider::Fetcher;
use crate::provider::weather::{WeatherQuery, WeatherReport};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::widgets::{PanelView, Placeholder, Today, TodayConfig, Widget};

/// Upper bound on how long the loop sleeps when no widget has a timer.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

/// Compositor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Terminated,
}

/// Everything the loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// At least one fetch settled.
    Settled,
    /// A widget timer may be due.
    Timer(Instant),
    /// Shutdown requested outside the key bindings (signal, input closed).
    Shutdown,
}

/// Placeholder panels, `{top, left, width, height}` in percent.
const PLACEHOLDERS: [(&str, u16, u16, u16, u16); 4] = [
    ("Recent Commits", 0, 50, 50, 50),
    ("Time Log", 35, 0, 25, 65),
    ("Pomodoro", 35, 25, 25, 65),
    ("GitHub", 50, 50, 50, 50),
];

fn placeholder_panel(&(label, top, left, width, height): &(&str, u16, u16, u16, u16)) -> PanelSpec {
    PanelSpec::new(
        label,
        Dimension::pct(top),
        Dimension::pct(left),
        Dimension::pct(width),
        Dimension::pct(height),
    )
}

/// Main TUI application.
pub struct App {
    widgets: Vec<Box<dyn Widget>>,
    phase: Phase,
    waker: Arc<Notify>,
    dirty: bool,
}

impl App {
    /// Declares the dashboard: the weather widget plus four placeholder panels.
    ///
    /// Starts the first weather fetch, so it must be called inside a tokio
    /// runtime.
    pub fn new(
        today: TodayConfig,
        weather: Arc<dyn Fetcher<WeatherQuery, WeatherReport>>,
        banner: Arc<dyn Banner>,
    ) -> Self {
        let waker = Arc::new(Notify::new());
        let mut widgets: Vec<Box<dyn Widget>> = vec![Box::new(Today::new(
            today,
            weather,
            banner,
            Arc::clone(&waker),
        ))];
        widgets.extend(
            PLACEHOLDERS
                .iter()
                .map(|p| Box::new(Placeholder::new(placeholder_panel(p))) as Box<dyn Widget>),
        );
        Self {
            widgets,
            phase: Phase::Initializing,
            waker,
            dirty: true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Render trees of all widgets, in declaration order.
    pub fn views(&self) -> Vec<PanelView> {
        self.widgets.iter().map(|w| w.view()).collect()
    }

    /// Earliest timer deadline across widgets.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.widgets.iter().filter_map(|w| w.next_deadline()).min()
    }

    /// Handle that is notified whenever a fetch settles.
    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.waker)
    }

    /// Returns `true` (and clears the flag) if a redraw is needed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn start(&mut self) {
        if self.phase == Phase::Initializing {
            self.phase = Phase::Running;
            info!(widgets = self.widgets.len(), "dashboard running");
        }
    }

    fn terminate(&mut self) {
        if self.phase != Phase::Terminated {
            self.phase = Phase::Terminated;
            info!("dashboard terminated");
        }
    }

    /// Applies one event to the widgets.
    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => match handle_key(key) {
                KeyAction::Quit => self.terminate(),
                KeyAction::Refresh => {
                    debug!("manual refresh");
                    self.widgets.iter_mut().for_each(|w| w.refresh());
                    self.dirty = true;
                }
                KeyAction::None => {}
            },
            AppEvent::Resize => self.dirty = true,
            AppEvent::Settled => {
                for widget in &mut self.widgets {
                    self.dirty |= widget.sync();
                }
            }
            AppEvent::Timer(now) => {
                for widget in &mut self.widgets {
                    self.dirty |= widget.on_timer(now);
                }
            }
            AppEvent::Shutdown => self.terminate(),
        }
    }

    /// Runs the dashboard until a quit key or shutdown signal.
    pub async fn run(mut self) -> io::Result<()> {
        let mut terminal = match setup_terminal() {
            Ok(t) => t,
            Err(e) => {
                let _ = restore_terminal();
                return Err(e);
            }
        };

        let result = match interrupt() {
            Ok(sigint) => {
                let mut events = EventHandler::new();
                self.event_loop(&mut terminal, &mut events, sigint).await
            }
            Err(e) => Err(e),
        };

        restore_terminal()?;
        terminal.show_cursor()?;
        result
    }

    /// Runs until `Terminated`. `shutdown` lives across iterations, so a
    /// request that lands while the loop is drawing or dispatching is still
    /// seen on the next wait.
    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
        shutdown: impl Future<Output = ()>,
    ) -> io::Result<()> {
        tokio::pin!(shutdown);
        let waker = self.waker();
        self.start();

        while self.phase != Phase::Terminated {
            if self.take_dirty() {
                let views = self.views();
                terminal.draw(|frame| render(frame, &views))?;
            }

            let deadline = self
                .next_deadline()
                .unwrap_or_else(|| Instant::now() + IDLE_WAKE);

            let event = tokio::select! {
                ev = events.next() => match ev {
                    Some(Event::Key(key)) => AppEvent::Key(key),
                    Some(Event::Resize) => AppEvent::Resize,
                    None => AppEvent::Shutdown,
                },
                _ = waker.notified() => AppEvent::Settled,
                _ = tokio::time::sleep_until(deadline) => AppEvent::Timer(Instant::now()),
                _ = &mut shutdown => AppEvent::Shutdown,
            };
            self.dispatch(event);
        }

        Ok(())
    }
}

/// Registers the SIGINT listener now; the returned future resolves on the
/// first interrupt after that.
#[cfg(unix)]
fn interrupt() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        sigint.recv().await;
    })
}

#[cfg(not(unix))]
fn interrupt() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::PlainBanner;
    use crate::provider::mock::{ScriptedFetcher, weather_report};
    use crate::tui::render::render_views;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use tokio::sync::{mpsc, oneshot};

    fn app_with(fetcher: &ScriptedFetcher<WeatherQuery, WeatherReport>) -> App {
        App::new(
            TodayConfig::default(),
            Arc::new(fetcher.clone()),
            Arc::new(PlainBanner),
        )
    }

    fn sunny() -> ScriptedFetcher<WeatherQuery, WeatherReport> {
        ScriptedFetcher::always(Ok(weather_report("F", 72, "Sunny", 60, 80)))
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test(start_paused = true)]
    async fn test_declares_five_panels_in_order() {
        let app = app_with(&sunny());
        let labels: Vec<String> = app.views().into_iter().map(|v| v.spec.label).collect();
        assert_eq!(
            labels,
            vec!["Today", "Recent Commits", "Time Log", "Pomodoro", "GitHub"]
        );
        assert_eq!(app.phase(), Phase::Initializing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_keys_terminate() {
        for event in [
            key(KeyCode::Esc),
            key(KeyCode::Char('q')),
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppEvent::Shutdown,
        ] {
            let mut app = app_with(&sunny());
            app.start();
            assert_eq!(app.phase(), Phase::Running);
            app.dispatch(event);
            assert_eq!(app.phase(), Phase::Terminated);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_keys_keep_running() {
        let mut app = app_with(&sunny());
        app.start();
        app.dispatch(key(KeyCode::Char('x')));
        app.dispatch(AppEvent::Resize);
        assert_eq!(app.phase(), Phase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_fetch_marks_dirty_and_updates_view() {
        let mut app = app_with(&sunny());
        assert!(app.take_dirty());

        app.waker().notified().await;
        app.dispatch(AppEvent::Settled);
        assert!(app.take_dirty());
        assert!(!app.take_dirty());

        let status = app.views()[0].nodes[2].lines[0].to_string();
        assert_eq!(status, "72°F and Sunny (60°F -> 80°F)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_key_and_timer_refetch() {
        let fetcher = sunny();
        let mut app = app_with(&fetcher);
        assert_eq!(fetcher.calls(), 1);

        app.dispatch(key(KeyCode::Char('r')));
        assert_eq!(fetcher.calls(), 2);

        let deadline = app.next_deadline().unwrap();
        app.dispatch(AppEvent::Timer(deadline - Duration::from_millis(1)));
        assert_eq!(fetcher.calls(), 2);

        let due = Instant::now() + TodayConfig::default().refresh.unwrap();
        app.dispatch(AppEvent::Timer(due));
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_does_not_terminate() {
        let fetcher = ScriptedFetcher::always(Err(crate::provider::FetchError::Timeout));
        let mut app = app_with(&fetcher);
        app.start();
        app.waker().notified().await;
        app.dispatch(AppEvent::Settled);

        assert_eq!(app.phase(), Phase::Running);
        assert_eq!(app.views()[0].nodes[2].lines[0].to_string(), "Error timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_pass_draws_every_panel() {
        let mut app = app_with(&sunny());
        app.waker().notified().await;
        app.dispatch(AppEvent::Settled);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let views = app.views();
        terminal.draw(|frame| render(frame, &views)).unwrap();
        let text = screen_text(terminal.backend().buffer());

        for label in ["Today", "Recent Commits", "Time Log", "Pomodoro", "GitHub"] {
            assert!(text.contains(&format!(" {} ", label)), "missing {}", label);
        }
        assert!(text.contains("72°F and Sunny (60°F -> 80°F)"));

        // Same views through the buffer-level entry point give the same screen.
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        render_views(area, &mut buf, &views);
        assert_eq!(&buf, terminal.backend().buffer());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_raised_before_wait_stops_loop() {
        let mut app = app_with(&sunny());
        let (_input, rx) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_channel(rx);
        let (interrupt, interrupted) = oneshot::channel::<()>();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        // Raised while nothing is waiting on it yet.
        interrupt.send(()).unwrap();
        app.event_loop(&mut terminal, &mut events, async {
            let _ = interrupted.await;
        })
        .await
        .unwrap();

        assert_eq!(app.phase(), Phase::Terminated);
        assert!(screen_text(terminal.backend().buffer()).contains(" Today "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_during_run_stops_loop() {
        let mut app = app_with(&sunny());
        let (input, rx) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_channel(rx);
        let (interrupt, interrupted) = oneshot::channel::<()>();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        tokio::spawn(async move {
            input.send(Event::Resize).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            interrupt.send(()).unwrap();
            // Keep the input side open until the loop has stopped.
            tokio::time::sleep(Duration::from_secs(3600)).await;
            drop(input);
        });
        app.event_loop(&mut terminal, &mut events, async {
            let _ = interrupted.await;
        })
        .await
        .unwrap();

        assert_eq!(app.phase(), Phase::Terminated);
    }
}
