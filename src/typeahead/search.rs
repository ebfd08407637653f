//! Search orchestration: debounced terms in, generation-tagged results out.
//!
//! The orchestrator loop runs as one tokio task per typeahead. It awaits one settled
//! term at a time, asks the data source for suggestions and publishes
//! [`SearchEvent`]s on an unbounded channel that the owning controller drains on
//! its own thread. Every dispatch gets a fresh generation from [`Generations`];
//! the controller applies only events whose generation is still current, so slow
//! or out-of-order answers can never overwrite newer ones. Terms are stamped with
//! the cancellation epoch they were queued in, and a term that was cancelled while
//! still in the debounce pipeline is never dispatched.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::typeahead::debounce::{debounce, Debounced, Debouncer};

/// `(search term, suggestions)` as returned by a data source.
pub type SearchResult<S> = (String, Vec<S>);

type SyncSearch<S> = dyn Fn(&str) -> SearchResult<S> + Send + Sync;
type CallbackSearch<S> = dyn Fn(String, Completion<S>) + Send + Sync;
type FutureSearch<S> = dyn Fn(String) -> BoxFuture<'static, SearchResult<S>> + Send + Sync;

/// Hook invoked from background tasks when events are waiting to be drained.
pub type RenderRequester = Arc<dyn Fn() + Send + Sync>;

/// Caller-supplied suggestion provider.
///
/// All three calling conventions feed the same results stream.
pub enum DataSource<S> {
    /// Answers immediately.
    Sync(Arc<SyncSearch<S>>),
    /// Answers later through the [`Completion`] handed to it.
    Callback(Arc<CallbackSearch<S>>),
    /// Answers when the returned future resolves. Superseded futures are dropped.
    Future(Arc<FutureSearch<S>>),
}

impl<S> Clone for DataSource<S> {
    fn clone(&self) -> Self {
        match self {
            DataSource::Sync(search) => DataSource::Sync(Arc::clone(search)),
            DataSource::Callback(search) => DataSource::Callback(Arc::clone(search)),
            DataSource::Future(search) => DataSource::Future(Arc::clone(search)),
        }
    }
}

impl<S: Send + 'static> DataSource<S> {
    pub fn sync<F>(search: F) -> Self
    where
        F: Fn(&str) -> SearchResult<S> + Send + Sync + 'static,
    {
        DataSource::Sync(Arc::new(search))
    }

    pub fn callback<F>(search: F) -> Self
    where
        F: Fn(String, Completion<S>) + Send + Sync + 'static,
    {
        DataSource::Callback(Arc::new(search))
    }

    pub fn future<F, Fut>(search: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SearchResult<S>> + Send + 'static,
    {
        DataSource::Future(Arc::new(move |term: String| search(term).boxed()))
    }

    fn kind(&self) -> &'static str {
        match self {
            DataSource::Sync(_) => "sync",
            DataSource::Callback(_) => "callback",
            DataSource::Future(_) => "future",
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    current: u64,
    epoch: u64,
}

/// Monotonic search generation shared by an orchestrator and its controller.
///
/// `epoch` moves only on [`invalidate`](Self::invalidate), so a term queued before a
/// cancellation can be recognised when it reaches the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    counters: Arc<Mutex<Counters>>,
}

impl Generations {
    /// Allocates the generation for a new dispatch.
    pub fn advance(&self) -> u64 {
        let mut counters = lock_unpoisoned(&self.counters);
        counters.current += 1;
        counters.current
    }

    /// Allocates a generation for a term queued during `epoch`, or `None` when the
    /// searches were cancelled since.
    pub fn advance_from(&self, epoch: u64) -> Option<u64> {
        let mut counters = lock_unpoisoned(&self.counters);
        if counters.epoch != epoch {
            return None;
        }
        counters.current += 1;
        Some(counters.current)
    }

    /// Makes every generation handed out so far stale and cancels queued terms.
    pub fn invalidate(&self) {
        let mut counters = lock_unpoisoned(&self.counters);
        counters.current += 1;
        counters.epoch += 1;
    }

    /// Makes outstanding generations stale; queued terms stay valid.
    fn retire(&self) {
        lock_unpoisoned(&self.counters).current += 1;
    }

    pub fn epoch(&self) -> u64 {
        lock_unpoisoned(&self.counters).epoch
    }

    pub fn current(&self) -> u64 {
        lock_unpoisoned(&self.counters).current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// A queued term with the cancellation epoch it was pushed in.
type StampedTerm = (u64, String);

/// Events published by the orchestrator, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent<S> {
    /// A search for `term` went out to the data source.
    Dispatched { generation: u64, term: String },
    /// The data source answered a dispatch.
    Results {
        generation: u64,
        term: String,
        suggestions: Vec<S>,
    },
    /// The settled term was empty; no search went out.
    Cleared,
}

#[derive(Clone, Default)]
struct WakeSlot {
    requester: Arc<Mutex<Option<RenderRequester>>>,
}

impl WakeSlot {
    fn set(&self, requester: Option<RenderRequester>) {
        *lock_unpoisoned(&self.requester) = requester;
    }

    fn notify(&self) {
        let requester = lock_unpoisoned(&self.requester).clone();
        if let Some(request) = requester {
            request();
        }
    }
}

struct EventSink<S> {
    tx: UnboundedSender<SearchEvent<S>>,
    wake: WakeSlot,
}

impl<S> Clone for EventSink<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            wake: self.wake.clone(),
        }
    }
}

impl<S> EventSink<S> {
    fn publish(&self, event: SearchEvent<S>) -> bool {
        let delivered = self.tx.send(event).is_ok();
        if delivered {
            self.wake.notify();
        }
        delivered
    }
}

/// One-shot answer handle given to [`DataSource::Callback`] searches.
///
/// `complete` consumes the handle, so a search can be answered at most once. A
/// handle that is dropped unanswered leaves the typeahead waiting.
pub struct Completion<S> {
    generation: u64,
    sink: EventSink<S>,
}

impl<S> Completion<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn complete(self, term: impl Into<String>, suggestions: Vec<S>) {
        let delivered = self.sink.publish(SearchEvent::Results {
            generation: self.generation,
            term: term.into(),
            suggestions,
        });
        if !delivered {
            tracing::debug!(generation = self.generation, "completion after teardown dropped");
        }
    }
}

/// Owns the debouncer and the orchestrator task for one typeahead.
pub struct SearchOrchestrator<S> {
    input: Option<Debouncer<StampedTerm>>,
    events: UnboundedReceiver<SearchEvent<S>>,
    source: Arc<Mutex<DataSource<S>>>,
    generations: Generations,
    wake: WakeSlot,
    task: Option<JoinHandle<()>>,
}

impl<S: Send + 'static> SearchOrchestrator<S> {
    pub fn spawn(handle: &Handle, quiet: Duration, source: DataSource<S>) -> Self {
        let (input, terms) = debounce(handle, quiet);
        let (tx, events) = mpsc::unbounded_channel();
        let source = Arc::new(Mutex::new(source));
        let generations = Generations::default();
        let wake = WakeSlot::default();

        let task = handle.spawn(run_searches(
            terms,
            Arc::clone(&source),
            generations.clone(),
            EventSink {
                tx,
                wake: wake.clone(),
            },
        ));

        Self {
            input: Some(input),
            events,
            source,
            generations,
            wake,
            task: Some(task),
        }
    }

    /// Queues `term` for a debounced search.
    pub fn push(&self, term: impl Into<String>) {
        if let Some(input) = self.input.as_ref() {
            input.push((self.generations.epoch(), term.into()));
        }
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    /// Routes future dispatches to `source`; answers for earlier dispatches go stale.
    pub fn replace_source(&self, source: DataSource<S>) {
        *lock_unpoisoned(&self.source) = source;
        self.generations.invalidate();
    }

    pub fn set_render_requester(&self, requester: Option<RenderRequester>) {
        self.wake.set(requester);
    }

    pub fn try_next_event(&mut self) -> Option<SearchEvent<S>> {
        self.events.try_recv().ok()
    }

    /// Waits for the next event; `None` once the orchestrator is shut down.
    pub async fn next_event(&mut self) -> Option<SearchEvent<S>> {
        if self.task.is_none() {
            return None;
        }
        self.events.recv().await
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the timer and search tasks and makes every outstanding answer stale.
    pub fn shutdown(&mut self) {
        self.generations.invalidate();
        self.input = None;
        self.wake.set(None);
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("search orchestrator stopped");
        }
        self.events.close();
    }
}

impl<S> Drop for SearchOrchestrator<S> {
    fn drop(&mut self) {
        self.generations.invalidate();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_searches<S: Send + 'static>(
    mut terms: Debounced<StampedTerm>,
    source: Arc<Mutex<DataSource<S>>>,
    generations: Generations,
    sink: EventSink<S>,
) {
    let mut in_flight: FuturesUnordered<BoxFuture<'static, (u64, SearchResult<S>)>> =
        FuturesUnordered::new();

    loop {
        tokio::select! {
            term = terms.recv() => {
                let Some((epoch, term)) = term else {
                    break;
                };
                if !dispatch(epoch, term, &source, &generations, &sink, &mut in_flight) {
                    break;
                }
            }
            Some((generation, (term, suggestions))) = in_flight.next(), if !in_flight.is_empty() => {
                if !sink.publish(SearchEvent::Results { generation, term, suggestions }) {
                    break;
                }
            }
        }
    }
}

fn dispatch<S: Send + 'static>(
    epoch: u64,
    term: String,
    source: &Arc<Mutex<DataSource<S>>>,
    generations: &Generations,
    sink: &EventSink<S>,
    in_flight: &mut FuturesUnordered<BoxFuture<'static, (u64, SearchResult<S>)>>,
) -> bool {
    if term.is_empty() {
        generations.retire();
        in_flight.clear();
        return sink.publish(SearchEvent::Cleared);
    }

    let Some(generation) = generations.advance_from(epoch) else {
        tracing::debug!(term = %term, "skipping term cancelled before dispatch");
        return true;
    };
    if !in_flight.is_empty() {
        tracing::debug!(superseded = in_flight.len(), "dropping superseded searches");
        in_flight.clear();
    }

    let source = lock_unpoisoned(source).clone();
    tracing::debug!(generation, term = %term, kind = source.kind(), "dispatching search");
    if !sink.publish(SearchEvent::Dispatched {
        generation,
        term: term.clone(),
    }) {
        return false;
    }

    match source {
        DataSource::Sync(search) => {
            let (term, suggestions) = search(&term);
            sink.publish(SearchEvent::Results {
                generation,
                term,
                suggestions,
            })
        }
        DataSource::Callback(search) => {
            search(
                term,
                Completion {
                    generation,
                    sink: sink.clone(),
                },
            );
            true
        }
        DataSource::Future(search) => {
            in_flight.push(search(term).map(move |result| (generation, result)).boxed());
            true
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
