//! Scripted fetchers for tests and offline runs.
//!
//! A [`ScriptedFetcher`] replays a queue of canned outcomes, each after a
//! configurable delay, and records every parameter value it was called with.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::weather::{
    Current, DegreeType, Forecast, Location, WeatherQuery, WeatherRecord, WeatherReport,
};
use super::{FetchError, FetchFuture, Fetcher};

/// One canned response.
#[derive(Debug, Clone)]
pub struct Scripted<T> {
    pub delay: Duration,
    pub outcome: Result<T, FetchError>,
}

struct Script<P, T> {
    queue: VecDeque<Scripted<T>>,
    /// Replayed once the queue is empty.
    fallback: Scripted<T>,
    seen: Vec<P>,
}

/// Fetcher that replays scripted outcomes in call order.
pub struct ScriptedFetcher<P, T> {
    script: Arc<Mutex<Script<P, T>>>,
    calls: Arc<AtomicUsize>,
}

impl<P, T> Clone for ScriptedFetcher<P, T> {
    fn clone(&self) -> Self {
        Self {
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<P, T: Clone> ScriptedFetcher<P, T> {
    /// Every call resolves immediately with `outcome`.
    pub fn always(outcome: Result<T, FetchError>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                queue: VecDeque::new(),
                fallback: Scripted {
                    delay: Duration::ZERO,
                    outcome,
                },
                seen: Vec::new(),
            })),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queues `outcome` to be returned by the next unscripted call, after `delay`.
    pub fn then(self, delay: Duration, outcome: Result<T, FetchError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.queue.push_back(Scripted { delay, outcome });
        }
        self
    }

    /// Number of `fetch` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: Clone, T> ScriptedFetcher<P, T> {
    /// Parameter values passed to `fetch`, in call order.
    pub fn seen(&self) -> Vec<P> {
        self.script
            .lock()
            .map(|s| s.seen.clone())
            .unwrap_or_default()
    }
}

impl<P, T> Fetcher<P, T> for ScriptedFetcher<P, T>
where
    P: Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    fn fetch(&self, params: &P) -> FetchFuture<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = match self.script.lock() {
            Ok(mut script) => {
                script.seen.push(params.clone());
                script
                    .queue
                    .pop_front()
                    .unwrap_or_else(|| script.fallback.clone())
            }
            Err(_) => Scripted {
                delay: Duration::ZERO,
                outcome: Err(FetchError::message("mock script poisoned")),
            },
        };
        Box::pin(async move {
            if !next.delay.is_zero() {
                tokio::time::sleep(next.delay).await;
            }
            next.outcome
        })
    }
}

/// A report with the given temperature, sky text and next-day range.
pub fn weather_report(
    unit: &str,
    temperature: i32,
    sky: &str,
    low: i32,
    high: i32,
) -> WeatherReport {
    vec![WeatherRecord {
        location: Location {
            degreetype: unit.to_string(),
            name: "Mockville".to_string(),
        },
        current: Current {
            temperature: temperature.into(),
            skytext: sky.to_string(),
        },
        forecast: vec![
            Forecast {
                low: (low - 2).into(),
                high: (high - 2).into(),
            },
            Forecast {
                low: low.into(),
                high: high.into(),
            },
        ],
    }]
}

/// Canned weather source for running without network access.
///
/// Every fetch succeeds with the same mild day, in the requested unit.
pub fn offline_weather(unit: DegreeType) -> ScriptedFetcher<WeatherQuery, WeatherReport> {
    let report = match unit {
        DegreeType::F => weather_report("F", 72, "Partly Sunny", 61, 79),
        DegreeType::C => weather_report("C", 22, "Partly Sunny", 16, 26),
    };
    ScriptedFetcher::always(Ok(report))
}
