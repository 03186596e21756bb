//! "Today" widget: date, big rotating-font clock, and current weather.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use ratatui::text::{Line, Span};
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::banner::Banner;
use crate::clock::{ClockTick, DEFAULT_TICK};
use crate::fmt::{WeatherSummary, format_clock, format_date};
use crate::layout::{Dimension, PanelSpec, Slot};
use crate::provider::Fetcher;
use crate::provider::weather::{WeatherQuery, WeatherReport};
use crate::store::{OverlapPolicy, PollingStore, RequestState};
use crate::tui::style::{Styles, Theme, gradient_lines};

use super::{PanelView, TextNode, Widget};

/// Default weather refresh interval (15 minutes).
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(900);

/// Configuration of a [`Today`] widget. Every field has a default.
#[derive(Debug, Clone)]
pub struct TodayConfig {
    /// Weather refresh interval; `None` refreshes only on query changes.
    pub refresh: Option<Duration>,
    pub query: WeatherQuery,
    pub panel: PanelSpec,
    /// Clock period; zero falls back to one minute.
    pub tick: Duration,
    pub overlap: OverlapPolicy,
}

impl Default for TodayConfig {
    fn default() -> Self {
        Self {
            refresh: Some(DEFAULT_REFRESH),
            query: WeatherQuery::default(),
            panel: PanelSpec::new(
                "Today",
                Dimension::Cells(0),
                Dimension::Cells(0),
                Dimension::pct(50),
                Dimension::pct(35),
            ),
            tick: DEFAULT_TICK,
            overlap: OverlapPolicy::default(),
        }
    }
}

/// One-line weather status for the given request state.
pub fn status_line(state: &RequestState<WeatherReport>) -> Line<'static> {
    match state {
        RequestState::Loading => Line::from(Span::styled("loading...", Styles::dim())),
        RequestState::Failed(e) => {
            Line::from(Span::styled(format!("Error {}", e), Styles::error()))
        }
        RequestState::Complete(report) => match WeatherSummary::from_report(report) {
            Some(summary) => summary_line(summary),
            None => Line::from(Span::styled("no weather data", Styles::dim())),
        },
    }
}

fn summary_line(summary: WeatherSummary) -> Line<'static> {
    let mut spans = vec![
        Span::styled(summary.temperature, Styles::temperature()),
        Span::raw(" and "),
        Span::styled(summary.conditions, Styles::conditions()),
    ];
    if let Some((low, high)) = summary.range {
        spans.extend([
            Span::raw(" ("),
            Span::styled(low, Styles::low()),
            Span::raw(" -> "),
            Span::styled(high, Styles::high()),
            Span::raw(")"),
        ]);
    }
    Line::from(spans)
}

/// Date, clock and weather in one panel.
pub struct Today {
    panel: PanelSpec,
    weather: PollingStore<WeatherQuery, WeatherReport>,
    clock: ClockTick,
    banner: Arc<dyn Banner>,
}

impl Today {
    /// Creates the widget and starts the first weather fetch.
    pub fn new(
        config: TodayConfig,
        fetcher: Arc<dyn Fetcher<WeatherQuery, WeatherReport>>,
        banner: Arc<dyn Banner>,
        waker: Arc<Notify>,
    ) -> Self {
        let weather =
            PollingStore::with_policy(fetcher, config.query, config.refresh, waker, config.overlap);
        Self {
            panel: config.panel,
            weather,
            clock: ClockTick::new(config.tick),
            banner,
        }
    }

    pub fn weather(&self) -> &RequestState<WeatherReport> {
        self.weather.state()
    }

    pub fn clock(&self) -> &ClockTick {
        &self.clock
    }

    /// Changes the weather query; refetches only if it differs.
    pub fn set_query(&mut self, query: WeatherQuery) -> bool {
        self.weather.set_params(query)
    }
}

impl Widget for Today {
    fn panel(&self) -> &PanelSpec {
        &self.panel
    }

    fn view(&self) -> PanelView {
        let now = self.clock.now();
        let date = TextNode::new(
            Slot::TopRight,
            vec![Line::from(Span::styled(format_date(&now), Styles::date()))],
        );
        let art = self.banner.render(&format_clock(&now), self.clock.style());
        let time = TextNode::new(Slot::Center, gradient_lines(&art, &Theme::ATLAS));
        let status = TextNode::new(
            Slot::At {
                top: Dimension::Percent {
                    pct: 100,
                    offset: -3,
                },
                left: Dimension::Cells(1),
            },
            vec![status_line(self.weather.state())],
        );
        PanelView {
            spec: self.panel.clone(),
            nodes: vec![date, time, status],
        }
    }

    fn sync(&mut self) -> bool {
        self.weather.sync()
    }

    fn on_timer(&mut self, now: Instant) -> bool {
        let fetched = self.weather.poll_timer(now);
        let ticked = self.clock.poll(now, Local::now());
        fetched || ticked
    }

    fn next_deadline(&self) -> Option<Instant> {
        let clock = self.clock.next_due();
        Some(match self.weather.next_due() {
            Some(due) => due.min(clock),
            None => clock,
        })
    }

    fn refresh(&mut self) {
        self.weather.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FontStyle;
    use crate::provider::FetchError;
    use crate::provider::mock::{ScriptedFetcher, weather_report};
    use crate::provider::weather::DegreeType;

    /// Renders the style name so tests can see which font was chosen.
    struct StyleNameBanner;

    impl Banner for StyleNameBanner {
        fn render(&self, _text: &str, style: FontStyle) -> Vec<String> {
            vec![style.name().to_string()]
        }
    }

    fn today_with(
        fetcher: &ScriptedFetcher<WeatherQuery, WeatherReport>,
        config: TodayConfig,
    ) -> (Today, Arc<Notify>) {
        let waker = Arc::new(Notify::new());
        let today = Today::new(
            config,
            Arc::new(fetcher.clone()),
            Arc::new(StyleNameBanner),
            Arc::clone(&waker),
        );
        (today, waker)
    }

    fn status_text(today: &Today) -> String {
        today.view().nodes[2].lines[0].to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_then_complete_summary_order() {
        let fetcher = ScriptedFetcher::always(Ok(weather_report("F", 72, "Sunny", 60, 80)));
        let (mut today, waker) = today_with(&fetcher, TodayConfig::default());
        assert_eq!(status_text(&today), "loading...");

        waker.notified().await;
        assert!(today.sync());

        let text = status_text(&today);
        let positions: Vec<usize> = ["72°F", "Sunny", "60°F", "80°F"]
            .iter()
            .map(|needle| text.find(needle).expect(needle))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_rendered_in_panel() {
        let fetcher = ScriptedFetcher::always(Err(FetchError::message("timeout")));
        let (mut today, waker) = today_with(&fetcher, TodayConfig::default());

        waker.notified().await;
        today.sync();
        assert!(matches!(today.weather(), RequestState::Failed(_)));
        assert!(status_text(&today).contains("timeout"));
    }

    #[test]
    fn test_summary_accents_are_distinct() {
        let line = status_line(&RequestState::Complete(weather_report("F", 72, "Sunny", 60, 80)));
        let colors: Vec<_> = line
            .spans
            .iter()
            .filter(|s| s.content.contains('°') || s.content.as_ref() == "Sunny")
            .map(|s| s.style.fg)
            .collect();
        assert_eq!(
            colors,
            vec![
                Some(Theme::TEMPERATURE),
                Some(Theme::CONDITIONS),
                Some(Theme::LOW),
                Some(Theme::HIGH)
            ]
        );
    }

    #[test]
    fn test_empty_payload_status() {
        assert_eq!(
            status_line(&RequestState::Complete(Vec::new())).to_string(),
            "no weather data"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_layout_and_font_rotation() {
        let fetcher = ScriptedFetcher::always(Ok(weather_report("F", 72, "Sunny", 60, 80)));
        let config = TodayConfig {
            tick: Duration::from_secs(60),
            ..TodayConfig::default()
        };
        let (mut today, _waker) = today_with(&fetcher, config);

        let view = today.view();
        assert_eq!(view.spec.label, "Today");
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.nodes[0].slot, Slot::TopRight);
        assert_eq!(view.nodes[1].slot, Slot::Center);
        assert_eq!(view.nodes[1].lines[0].to_string(), FontStyle::Straight.name());

        let start = Instant::now();
        for n in 1..=13u32 {
            assert!(today.on_timer(start + Duration::from_secs(60) * n));
        }
        assert_eq!(today.clock().rotation(), 13);
        assert_eq!(
            today.view().nodes[1].lines[0].to_string(),
            FontStyle::AnsiShadow.name()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_refetches_once() {
        let fetcher = ScriptedFetcher::always(Ok(weather_report("C", 20, "Clear", 10, 22)));
        let (mut today, _waker) = today_with(&fetcher, TodayConfig::default());

        assert!(!today.set_query(WeatherQuery::default()));
        let berlin = WeatherQuery {
            search: "Berlin, DE".to_string(),
            degree_type: DegreeType::C,
        };
        assert!(today.set_query(berlin.clone()));
        assert!(!today.set_query(berlin));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_deadline_is_earliest_timer() {
        let fetcher = ScriptedFetcher::always(Ok(weather_report("F", 72, "Sunny", 60, 80)));
        let config = TodayConfig {
            refresh: Some(Duration::from_secs(5)),
            ..TodayConfig::default()
        };
        let (today, _waker) = today_with(&fetcher, config);
        assert_eq!(
            today.next_deadline(),
            Some(Instant::now() + Duration::from_secs(5))
        );
    }
}
