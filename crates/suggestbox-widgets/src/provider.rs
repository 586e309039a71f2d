//! Where suggestions come from, and the request lifecycle around them.
//!
//! A [`Provider`] answers a query either immediately ([`Lookup::Ready`]) or
//! with a future ([`Lookup::Pending`]).  [`Suggestions`] wraps a provider and
//! owns everything the widget needs to know about lookups: the current result
//! set, the loading flag, and the [`RequestTracker`] that keeps late answers
//! from overwriting fresher ones.
//!
//! Both static and dynamic answers go through the same token path, so the
//! ordering rules are identical whichever provider is configured.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::filter::filter_items;
use crate::item::Item;
use crate::request::{RequestToken, RequestTracker};

/// Failure of a caller-supplied suggestion function.
///
/// Never surfaced to the user: the widget logs it and shows an empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SupplierError {
    /// The supplier returned an error.
    #[error("suggestion supplier failed: {0}")]
    Failed(String),
    /// The supplier panicked.
    #[error("suggestion supplier panicked")]
    Panicked,
}

/// Outcome of a single lookup.
pub type LookupResult<I> = Result<Vec<I>, SupplierError>;

/// A provider's answer to one query.
pub enum Lookup<I> {
    /// The answer is available now.
    Ready(LookupResult<I>),
    /// The answer arrives when the future completes.
    Pending(BoxFuture<'static, LookupResult<I>>),
}

impl<I> fmt::Debug for Lookup<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Ready(Ok(items)) => write!(f, "Ready({} items)", items.len()),
            Lookup::Ready(Err(e)) => write!(f, "Ready(Err({e}))"),
            Lookup::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Maps query text to candidate items.
pub trait Provider<I: Item>: Send + Sync {
    fn query(&self, text: &str) -> Lookup<I>;
}

/// A fixed item list searched with the default filter.
pub struct StaticProvider<I> {
    items: Vec<I>,
}

impl<I: Item> StaticProvider<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }
}

impl<I: Item> Provider<I> for StaticProvider<I> {
    fn query(&self, text: &str) -> Lookup<I> {
        Lookup::Ready(Ok(filter_items(&self.items, text)))
    }
}

/// A synchronous caller-supplied function.  A panic counts as a failure.
pub struct FnProvider<F> {
    f: F,
}

impl<F> FnProvider<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<I, F> Provider<I> for FnProvider<F>
where
    I: Item,
    F: Fn(&str) -> Vec<I> + Send + Sync,
{
    fn query(&self, text: &str) -> Lookup<I> {
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| (self.f)(text)))
            .map_err(|_| SupplierError::Panicked);
        Lookup::Ready(result)
    }
}

/// An asynchronous caller-supplied function.
///
/// Errors are converted with [`Display`](fmt::Display); a panic while
/// building or polling the future counts as a failure.
pub struct AsyncProvider<F> {
    f: F,
}

impl<F> AsyncProvider<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<I, F, Fut, E> Provider<I> for AsyncProvider<F>
where
    I: Item,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<I>, E>> + Send + 'static,
    E: fmt::Display,
{
    fn query(&self, text: &str) -> Lookup<I> {
        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| (self.f)(text.to_owned()))) {
            Ok(fut) => fut,
            Err(_) => return Lookup::Ready(Err(SupplierError::Panicked)),
        };
        Lookup::Pending(
            AssertUnwindSafe(fut)
                .catch_unwind()
                .map(|outcome| match outcome {
                    Ok(Ok(items)) => Ok(items),
                    Ok(Err(e)) => Err(SupplierError::Failed(e.to_string())),
                    Err(_) => Err(SupplierError::Panicked),
                })
                .boxed(),
        )
    }
}

/// What [`Suggestions::request`] did with a query.
pub enum Request<I> {
    /// The text matches the last issued query; nothing was issued.
    Unchanged,
    /// The answer was available immediately and is already applied.
    Applied,
    /// The answer is on its way; feed it back through
    /// [`Suggestions::resolve`] with this token.
    Pending(RequestToken, BoxFuture<'static, LookupResult<I>>),
}

/// What [`Suggestions::resolve`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The token was superseded; results and loading state are untouched.
    Stale,
    /// The results were replaced with this many items.
    Applied(usize),
}

/// Request lifecycle over a [`Provider`]: issue, supersede, resolve.
pub struct Suggestions<I: Item> {
    provider: Box<dyn Provider<I>>,
    call_delay: Option<Duration>,
    tracker: RequestTracker,
    results: Vec<I>,
    loading: bool,
    searched: bool,
    last_text: Option<String>,
}

impl<I: Item> Suggestions<I> {
    pub fn new(provider: impl Provider<I> + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            call_delay: None,
            tracker: RequestTracker::new(),
            results: Vec::new(),
            loading: false,
            searched: false,
            last_text: None,
        }
    }

    /// Replace the provider.  Outstanding requests become stale.
    pub fn set_provider(&mut self, provider: impl Provider<I> + 'static) {
        self.provider = Box::new(provider);
        self.invalidate();
    }

    /// Delay every answer by `delay`, surfacing the loading state meanwhile.
    pub fn set_call_delay(&mut self, delay: Option<Duration>) {
        self.call_delay = delay.filter(|d| !d.is_zero());
    }

    pub fn call_delay(&self) -> Option<Duration> {
        self.call_delay
    }

    /// The current result set.
    pub fn results(&self) -> &[I] {
        &self.results
    }

    /// Whether the latest issued request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a result has been applied since the last invalidation.
    pub fn has_searched(&self) -> bool {
        self.searched
    }

    /// Issue a lookup for `text` unless it is the query already issued.
    pub fn request(&mut self, text: &str) -> Request<I> {
        if self.last_text.as_deref() == Some(text) {
            return Request::Unchanged;
        }
        self.last_text = Some(text.to_owned());

        let token = self.tracker.issue();
        let lookup = self.provider.query(text);
        tracing::debug!(
            target: "suggestbox::provider",
            token = token.get(),
            query = text,
            ?lookup,
            "issued lookup"
        );

        let fut = match (lookup, self.call_delay) {
            (Lookup::Ready(result), None) => {
                self.resolve(token, result);
                return Request::Applied;
            }
            (Lookup::Ready(result), Some(delay)) => async move {
                tokio::time::sleep(delay).await;
                result
            }
            .boxed(),
            (Lookup::Pending(fut), None) => fut,
            (Lookup::Pending(fut), Some(delay)) => async move {
                tokio::time::sleep(delay).await;
                fut.await
            }
            .boxed(),
        };
        self.loading = true;
        Request::Pending(token, fut)
    }

    /// Apply a completion if `token` is still current.
    pub fn resolve(&mut self, token: RequestToken, result: LookupResult<I>) -> Resolution {
        if !self.tracker.is_current(token) {
            tracing::debug!(
                target: "suggestbox::provider",
                token = token.get(),
                "discarding stale lookup"
            );
            return Resolution::Stale;
        }
        self.loading = false;
        self.searched = true;
        self.results = result.unwrap_or_else(|e| {
            tracing::warn!(
                target: "suggestbox::provider",
                token = token.get(),
                error = %e,
                "suggestion supplier failed"
            );
            Vec::new()
        });
        Resolution::Applied(self.results.len())
    }

    /// Forget the current lookup cycle: outstanding requests become stale,
    /// loading stops, results are cleared and the next request always issues.
    pub fn invalidate(&mut self) {
        self.tracker.invalidate();
        self.loading = false;
        self.searched = false;
        self.results.clear();
        self.last_text = None;
    }
}
