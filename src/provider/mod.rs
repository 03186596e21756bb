//! Fetch collaborator abstraction.
//!
//! This module defines the `Fetcher` trait that lets a polling store work with
//! any asynchronous data source (HTTP weather lookup, scripted mock data)
//! through one narrow interface.

pub mod mock;
pub mod weather;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Failure of an external data source.
///
/// This is the only error kind that crosses the store boundary. The variants
/// describe the cause; callers treat all of them the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete in time.
    Timeout,
    /// Transport-level failure (DNS, connection reset, TLS).
    Request(String),
    /// The source answered with a non-success HTTP status.
    Status(u16),
    /// The response body did not have the expected shape.
    Decode(String),
    /// Free-form failure reported by the source.
    Message(String),
}

impl FetchError {
    pub fn message(msg: impl Into<String>) -> Self {
        FetchError::Message(msg.into())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "timeout"),
            FetchError::Request(msg) => write!(f, "request failed: {}", msg),
            FetchError::Status(code) => write!(f, "HTTP status {}", code),
            FetchError::Decode(msg) => write!(f, "malformed response: {}", msg),
            FetchError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Boxed future returned by [`Fetcher::fetch`].
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'static>>;

/// Asynchronous data source consumed by a polling store.
///
/// `fetch` must not borrow `self` or `params` in the returned future; the
/// future is spawned onto the runtime and may outlive the call.
pub trait Fetcher<P, T>: Send + Sync {
    fn fetch(&self, params: &P) -> FetchFuture<T>;
}

/// Adapts a closure returning a future into a [`Fetcher`].
pub struct FnFetcher<F>(F);

/// Wraps `f` so it can be used wherever a [`Fetcher`] is expected.
pub fn from_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher(f)
}

impl<P, T, F, Fut> Fetcher<P, T> for FnFetcher<F>
where
    P: Clone,
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    fn fetch(&self, params: &P) -> FetchFuture<T> {
        Box::pin((self.0)(params.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "timeout");
        assert_eq!(FetchError::message("boom").to_string(), "boom");
        assert_eq!(FetchError::Status(503).to_string(), "HTTP status 503");
        assert!(
            FetchError::Decode("missing field".into())
                .to_string()
                .contains("missing field")
        );
    }

    #[tokio::test]
    async fn test_from_fn_forwards_params() {
        let fetcher = from_fn(|n: u32| async move { Ok::<_, FetchError>(n * 2) });
        let doubled = Fetcher::<u32, u32>::fetch(&fetcher, &21).await;
        assert_eq!(doubled, Ok(42));
    }
}
