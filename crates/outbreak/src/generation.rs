//! Stale-response discarding for asynchronous data loads.
//!
//! Every time a view asks for fresh data (the organism filter changed, the
//! user pressed refresh) a new request *generation* begins. Requests are never
//! aborted; instead, when one resolves, its result is committed only if its
//! generation is still the latest one. A slow response to an old filter can
//! therefore never overwrite the data of a newer one.
//!
//! - [`RequestGenerations`] - the bare monotonically increasing counter.
//! - [`Latest`] - the counter paired with the committed [`AsyncState`].
//!
//! ```
//! # use outbreak::generation::Latest;
//! let latest: Latest<&str> = Latest::new();
//!
//! let first = latest.begin();
//! let second = latest.begin();
//!
//! // The newer request resolves first, then the stale one
//! assert!(latest.commit(second, Ok::<_, String>("C. difficile")));
//! assert!(!latest.commit(first, Ok::<_, String>("MRSA")));
//!
//! assert_eq!(latest.state().data().map(|d| **d), Some("C. difficile"));
//! ```

use std::{
    fmt,
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{debug, trace};

/// Token identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonically increasing request counter.
///
/// Safe to share between tasks; each [`RequestGenerations::begin`] returns a
/// generation strictly greater than every earlier one.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    current: AtomicU64,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding all earlier ones.
    pub fn begin(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns the most recently started generation.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Returns true if no request was started after `generation`.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

/// Loading state of a view's data.
///
/// Starting a request keeps the previous data visible while `loading` is
/// set; a failed request clears the data and records the error message.
#[derive(Debug)]
pub struct AsyncState<T> {
    data: Option<Arc<T>>,
    loading: bool,
    error: Option<String>,
}

impl<T> AsyncState<T> {
    /// The most recently committed data, if the last request succeeded
    pub fn data(&self) -> Option<&Arc<T>> {
        self.data.as_ref()
    }

    /// True while the latest request has not resolved
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error message of the last request, if it failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<T> Default for AsyncState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Clone for AsyncState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// The latest committed result of a sequence of superseding requests.
#[derive(Debug)]
pub struct Latest<T> {
    generations: RequestGenerations,
    state: Mutex<AsyncState<T>>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            generations: RequestGenerations::new(),
            state: Mutex::new(AsyncState::default()),
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AsyncState<T>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a new request and marks the state as loading.
    pub fn begin(&self) -> Generation {
        let mut state = self.lock();
        let generation = self.generations.begin();
        state.loading = true;
        state.error = None;
        trace!(generation:% = generation; "Request started");
        generation
    }

    /// Returns true if `generation` is still the latest request.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generations.is_current(generation)
    }

    /// Commits the result of `generation` if it is still current.
    ///
    /// Returns `false`, leaving the state untouched, when a newer request
    /// was started in the meantime.
    pub fn commit<E: fmt::Display>(&self, generation: Generation, result: Result<T, E>) -> bool {
        let mut state = self.lock();
        if !self.generations.is_current(generation) {
            debug!(
                generation:% = generation,
                latest:% = self.generations.current();
                "Discarding stale response"
            );
            return false;
        }

        match result {
            Ok(data) => {
                state.data = Some(Arc::new(data));
                state.error = None;
            }
            Err(err) => {
                debug!(generation:% = generation, err:% = err; "Request failed");
                state.data = None;
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;
        true
    }

    /// Starts a request, awaits `request`, and commits its result.
    ///
    /// Returns whether the result was committed.
    pub async fn run<F, E>(&self, request: F) -> bool
    where
        F: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let generation = self.begin();
        let result = request.await;
        self.commit(generation, result)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AsyncState<T> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn test_generations_increase() {
        let generations = RequestGenerations::new();
        assert_eq!(generations.current().value(), 0);

        let first = generations.begin();
        let second = generations.begin();
        assert!(second > first);
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_initial_state() {
        let latest: Latest<u32> = Latest::new();
        let state = latest.state();
        assert!(state.data().is_none());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_keeps_previous_data_while_loading() {
        let latest = Latest::new();
        let first = latest.begin();
        assert!(latest.commit(first, Ok::<_, String>(7)));

        let _second = latest.begin();
        let state = latest.state();
        assert!(state.is_loading());
        assert_eq!(state.data().map(|d| **d), Some(7));
    }

    #[test]
    fn test_error_clears_data() {
        let latest = Latest::new();
        let first = latest.begin();
        assert!(latest.commit(first, Ok::<_, String>(1)));

        let second = latest.begin();
        assert!(latest.commit(second, Err::<u32, _>("HTTP 503")));

        let state = latest.state();
        assert!(state.data().is_none());
        assert_eq!(state.error(), Some("HTTP 503"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_new_request_clears_error() {
        let latest: Latest<u32> = Latest::new();
        let first = latest.begin();
        latest.commit(first, Err::<u32, _>("timeout"));

        latest.begin();
        assert!(latest.state().error().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let latest = Latest::new();
        let stale = latest.begin();
        let fresh = latest.begin();

        assert!(!latest.commit(stale, Ok::<_, String>("old")));
        assert!(latest.state().is_loading());
        assert!(latest.state().data().is_none());

        assert!(latest.commit(fresh, Ok::<_, String>("new")));
        assert!(!latest.commit(stale, Ok::<_, String>("old")));
        assert_eq!(latest.state().data().map(|d| **d), Some("new"));
    }

    #[test]
    fn test_stale_error_is_discarded() {
        let latest = Latest::new();
        let stale = latest.begin();
        let fresh = latest.begin();
        assert!(latest.commit(fresh, Ok::<_, String>(2)));
        assert!(!latest.commit(stale, Err::<u32, _>("late failure")));

        let state = latest.state();
        assert!(state.error().is_none());
        assert_eq!(state.data().map(|d| **d), Some(2));
    }

    #[tokio::test]
    async fn test_out_of_order_resolution() {
        let latest = Arc::new(Latest::new());
        let (slow_tx, slow_rx) = oneshot::channel::<&'static str>();
        let (fast_tx, fast_rx) = oneshot::channel::<&'static str>();

        let slow_generation = latest.begin();
        let slow = {
            let latest = Arc::clone(&latest);
            tokio::spawn(async move {
                let result = slow_rx.await.map_err(|err| err.to_string());
                latest.commit(slow_generation, result)
            })
        };

        let fast_generation = latest.begin();
        let fast = {
            let latest = Arc::clone(&latest);
            tokio::spawn(async move {
                let result = fast_rx.await.map_err(|err| err.to_string());
                latest.commit(fast_generation, result)
            })
        };

        fast_tx.send("C. difficile").unwrap();
        assert!(fast.await.unwrap());

        slow_tx.send("MRSA").unwrap();
        assert!(!slow.await.unwrap());

        assert_eq!(latest.state().data().map(|d| **d), Some("C. difficile"));
    }

    #[tokio::test]
    async fn test_run_commits_when_uncontested() {
        let latest = Latest::new();
        let committed = latest.run(async { Ok::<_, String>(42) }).await;
        assert!(committed);
        assert_eq!(latest.state().data().map(|d| **d), Some(42));
    }

    #[tokio::test]
    async fn test_concurrent_runs_latest_wins() {
        let latest = Arc::new(Latest::new());
        let (tx, rx) = oneshot::channel::<()>();

        let first = {
            let latest = Arc::clone(&latest);
            tokio::spawn(async move {
                latest
                    .run(async move {
                        rx.await.ok();
                        Ok::<_, String>("first")
                    })
                    .await
            })
        };

        // Let the first request begin before the second one
        tokio::task::yield_now().await;
        while latest.generations.current().value() == 0 {
            tokio::task::yield_now().await;
        }

        let second = latest.run(async { Ok::<_, String>("second") }).await;
        assert!(second);

        tx.send(()).unwrap();
        assert!(!first.await.unwrap());
        assert_eq!(latest.state().data().map(|d| **d), Some("second"));
    }
}
