//! Polling data store.
//!
//! A [`PollingStore`] turns an asynchronous [`Fetcher`] into a continuously
//! refreshed [`RequestState`]. Fetches run as tasks on the current runtime;
//! their outcomes come back over a channel and are applied only when the
//! owner calls [`PollingStore::sync`], so the state is never mutated from
//! anywhere but the owner's loop.
//!
//! Every refresh re-enters `Loading` before settling. Overlapping fetches
//! are never cancelled; which outcome wins is decided by [`OverlapPolicy`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::clock::next_after;
use crate::provider::{FetchError, Fetcher};

/// Lifecycle of the most recent fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Loading,
    Complete(T),
    Failed(FetchError),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Complete(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            RequestState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// How completions of overlapping fetches are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Only the most recently started fetch may settle the state; earlier
    /// completions that arrive late are discarded.
    #[default]
    LatestStarted,
    /// Every completion replaces the state, so whichever fetch settles last
    /// in wall-clock time wins.
    LatestCompleted,
}

/// Outcome of one fetch, tagged with its start sequence number.
struct Settled<T> {
    seq: u64,
    outcome: Result<T, FetchError>,
}

/// State container that keeps a [`RequestState`] in step with a fetcher.
pub struct PollingStore<P, T> {
    fetcher: Arc<dyn Fetcher<P, T>>,
    params: P,
    interval: Option<Duration>,
    policy: OverlapPolicy,
    state: RequestState<T>,
    /// Sequence number of the latest started fetch.
    started: u64,
    next_due: Option<Instant>,
    tx: mpsc::UnboundedSender<Settled<T>>,
    rx: mpsc::UnboundedReceiver<Settled<T>>,
    waker: Arc<Notify>,
}

impl<P, T> PollingStore<P, T>
where
    P: Clone + PartialEq + Send + 'static,
    T: Send + 'static,
{
    /// Creates the store and immediately starts the first fetch.
    ///
    /// The state is `Loading` when this returns. `waker` is notified every
    /// time a fetch settles. Must be called from within a tokio runtime.
    pub fn start(
        fetcher: Arc<dyn Fetcher<P, T>>,
        params: P,
        interval: Option<Duration>,
        waker: Arc<Notify>,
    ) -> Self {
        Self::with_policy(fetcher, params, interval, waker, OverlapPolicy::default())
    }

    /// Same as [`PollingStore::start`] with an explicit overlap policy.
    pub fn with_policy(
        fetcher: Arc<dyn Fetcher<P, T>>,
        params: P,
        interval: Option<Duration>,
        waker: Arc<Notify>,
        policy: OverlapPolicy,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut store = Self {
            fetcher,
            params,
            interval: interval.filter(|i| !i.is_zero()),
            policy,
            state: RequestState::Loading,
            started: 0,
            next_due: None,
            tx,
            rx,
            waker,
        };
        store.next_due = store.interval.map(|i| Instant::now() + i);
        store.refresh();
        store
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// When the interval timer fires next, if there is one.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Starts a new fetch with the current params.
    ///
    /// The state moves to `Loading` synchronously. A fetch that is still in
    /// flight keeps running.
    pub fn refresh(&mut self) {
        self.started += 1;
        let seq = self.started;
        self.state = RequestState::Loading;

        let fut = self.fetcher.fetch(&self.params);
        let tx = self.tx.clone();
        let waker = Arc::clone(&self.waker);
        debug!(seq, "fetch started");
        tokio::spawn(async move {
            let outcome = fut.await;
            // The receiver is gone once the store is dropped; nothing to report to.
            if tx.send(Settled { seq, outcome }).is_ok() {
                waker.notify_one();
            }
        });
    }

    /// Replaces the params, refetching once if they differ structurally.
    ///
    /// Returns `true` when a fetch was started.
    pub fn set_params(&mut self, params: P) -> bool {
        if params == self.params {
            return false;
        }
        self.params = params;
        self.refresh();
        true
    }

    /// Fires the interval timer if it is due at `now`.
    ///
    /// Missed periods are skipped rather than replayed. Returns `true` when a
    /// fetch was started.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        let (Some(interval), Some(due)) = (self.interval, self.next_due) else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_due = Some(next_after(due, interval, now));
        self.refresh();
        true
    }

    /// Applies every completion that has arrived since the last call.
    ///
    /// Returns `true` if the state changed.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Ok(settled) = self.rx.try_recv() {
            changed |= self.apply(settled);
        }
        changed
    }

    fn apply(&mut self, settled: Settled<T>) -> bool {
        if self.policy == OverlapPolicy::LatestStarted && settled.seq != self.started {
            trace!(
                seq = settled.seq,
                latest = self.started,
                "discarding stale completion"
            );
            return false;
        }
        self.state = match settled.outcome {
            Ok(data) => {
                debug!(seq = settled.seq, "fetch complete");
                RequestState::Complete(data)
            }
            Err(e) => {
                warn!(seq = settled.seq, error = %e, "fetch failed");
                RequestState::Failed(e)
            }
        };
        true
    }
}
