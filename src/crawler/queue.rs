//! Multi-consumer work queues and the outstanding-work tracker
//!
//! Both the frontier queue (crawl tasks) and the parse queue (fetched pages)
//! are [`WorkQueue`]s sharing one [`WorkTracker`]. A push counts as
//! outstanding work until the worker that received it calls
//! [`WorkTracker::done`], so the tracker reads zero only when no task is
//! queued and none is being processed.

use crate::crawler::task::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};

/// Counts tasks that have been queued but not fully processed
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    drained: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks one task as fully processed
    ///
    /// Must be called after any pushes the task produced, otherwise the count
    /// can touch zero while follow-up work is still being queued.
    pub fn done(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "WorkTracker::done called more than pushed");
        if previous == 1 {
            self.drained.notify_waiters();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Waits until the outstanding count reads zero
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a notify between the check and the
            // await is not lost.
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Unbounded queue whose receiving half is shared by a pool of workers
pub struct WorkQueue<T> {
    name: &'static str,
    sender: mpsc::UnboundedSender<Message<T>>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Message<T>>>>,
    tracker: Arc<WorkTracker>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

impl<T> WorkQueue<T> {
    pub fn new(name: &'static str, tracker: Arc<WorkTracker>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            name,
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            tracker,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Queues a task and counts it as outstanding
    ///
    /// Returns false if the queue can no longer deliver tasks.
    pub fn push(&self, task: T) -> bool {
        self.tracker.add();
        if self.sender.send(Message::Task(task)).is_err() {
            self.tracker.done();
            tracing::warn!("{} queue is closed, dropping task", self.name);
            return false;
        }
        true
    }

    /// Queues one poison marker per worker
    ///
    /// Markers are not counted as outstanding work.
    pub fn stop(&self, workers: usize) {
        for _ in 0..workers {
            if self.sender.send(Message::Stop).is_err() {
                break;
            }
        }
    }

    /// Waits for the next message
    ///
    /// Returns None only if every sender is gone, which workers treat like
    /// `Stop`.
    pub async fn recv(&self) -> Option<Message<T>> {
        self.receiver.lock().await.recv().await
    }
}
