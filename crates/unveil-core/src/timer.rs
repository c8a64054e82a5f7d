//! One-shot timer queues
//!
//! Components schedule events and drain them from the same loop that pumps
//! the reveal engine. [`ManualTimers`] runs on a virtual clock for tests and
//! timelines; [`TokioTimers`] sleeps on the tokio runtime for the live preview.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub trait TimerQueue<E> {
    /// Deliver `event` once `delay` has elapsed
    fn schedule(&mut self, delay: Duration, event: E) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Timers scheduled but neither fired nor cancelled
    fn pending(&self) -> usize;
}

/// Timer queue on a virtual clock advanced explicitly by the caller
#[derive(Debug)]
pub struct ManualTimers<E> {
    now: Duration,
    queue: BTreeMap<(Duration, u64), (TimerId, E)>,
    deadlines: HashMap<TimerId, (Duration, u64)>,
    next_id: u64,
}

impl<E> Default for ManualTimers<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<E> ManualTimers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return every event that came due, in
    /// deadline order (ties in scheduling order)
    pub fn advance(&mut self, by: Duration) -> Vec<E> {
        let target = self.now + by;
        self.advance_to(target)
    }

    /// Move the clock to `target`; moving backwards is a no-op
    pub fn advance_to(&mut self, target: Duration) -> Vec<E> {
        self.drain_until(target)
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Like [`advance_to`](Self::advance_to) but keeps each event's deadline
    pub fn drain_until(&mut self, target: Duration) -> Vec<(Duration, E)> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.first_entry() {
            let (deadline, _) = *entry.key();
            if deadline > target {
                break;
            }
            let (id, event) = entry.remove();
            self.deadlines.remove(&id);
            self.now = self.now.max(deadline);
            fired.push((deadline, event));
        }

        self.now = self.now.max(target);
        fired
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }
}

impl<E> TimerQueue<E> for ManualTimers<E> {
    fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let key = (self.now + delay, self.next_id);
        self.queue.insert(key, (id, event));
        self.deadlines.insert(id, key);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Timer queue backed by tokio sleeps
///
/// Every timer is a spawned task that sends its event into a channel once
/// the delay elapses; cancelling aborts the task. Scheduling must happen
/// inside a tokio runtime.
pub struct TokioTimers<E> {
    tx: mpsc::UnboundedSender<(TimerId, E)>,
    rx: mpsc::UnboundedReceiver<(TimerId, E)>,
    handles: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl<E: Send + 'static> Default for TokioTimers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> TokioTimers<E> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            handles: HashMap::new(),
            next_id: 0,
        }
    }

    /// Wait for the next event; `None` once nothing is pending
    pub async fn recv(&mut self) -> Option<E> {
        while !self.handles.is_empty() {
            let (id, event) = self.rx.recv().await?;
            if self.handles.remove(&id).is_some() {
                return Some(event);
            }
        }
        None
    }

    /// Non-blocking drain of every event that already fired
    pub fn try_recv_all(&mut self) -> Vec<E> {
        let mut fired = Vec::new();
        while let Ok((id, event)) = self.rx.try_recv() {
            // A cancelled timer may have sent just before it was aborted
            if self.handles.remove(&id).is_some() {
                fired.push(event);
            }
        }
        fired
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        count
    }
}

impl<E: Send + 'static> TimerQueue<E> for TokioTimers<E> {
    fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send((id, event)).is_err() {
                tracing::trace!("Timer {:?} fired after its queue was dropped", id);
            }
        });
        self.handles.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.handles.remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.handles.len()
    }
}

impl<E> Drop for TokioTimers<E> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}
