//! # Task Management
//!
//! GPU-resident resources (mesh buffers) may only be created and destroyed on
//! the thread that owns the renderer. Work that originates elsewhere, such as a
//! chunk finishing its mesh during the parallel update pass, is posted to the
//! [`MainThreadQueue`] and executed when the owning thread drains it.
//!
//! ## Guarantees
//! - Tasks run in FIFO order, on the owning thread only
//! - `drain` runs only what was queued when it started, so a task that queues
//!   more work can't stall the tick
//! - Draining from any other thread is refused and logged
//!
//! ## Example Usage
//! ```rust
//! use voxel_sim::engine_state::task_management::{MainThreadQueue, TicketState};
//!
//! let queue = MainThreadQueue::new();
//! let ticket = queue.submit(|| 6 * 7);
//! assert_eq!(ticket.poll(), TicketState::Pending);
//!
//! queue.drain().unwrap();
//! assert_eq!(ticket.poll(), TicketState::Ready(42));
//! ```

pub mod task;

use std::thread::{self, ThreadId};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::error;

pub use task::{MainThreadTask, TaskTicket, TicketState};

use crate::error::{EngineError, EngineResult};

/// FIFO of closures that only the owning thread may execute.
///
/// Submitting is allowed from any thread; the queue is `Sync` so it can sit in
/// the shared `EngineContext` during the parallel update pass.
pub struct MainThreadQueue {
    owner: ThreadId,
    task_sender: Sender<MainThreadTask>,
    task_receiver: Receiver<MainThreadTask>,
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MainThreadQueue {
    /// Creates a queue owned by the calling thread.
    pub fn new() -> Self {
        let (task_sender, task_receiver) = unbounded();
        MainThreadQueue {
            owner: thread::current().id(),
            task_sender,
            task_receiver,
        }
    }

    /// Whether the calling thread is the one allowed to drain.
    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Queues `job` and returns a ticket for its result.
    pub fn submit<T, F>(&self, job: F) -> TaskTicket<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_sender, result_receiver) = bounded(1);
        self.post(move || {
            // The submitter may have given up on the ticket; that's fine.
            let _ = result_sender.send(job());
        });
        TaskTicket::new(result_receiver)
    }

    /// Queues `job` without a way to observe its completion.
    pub fn post<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.task_sender.send(Box::new(job)).is_err() {
            // Only possible once the receiving half is gone.
            error!("main-thread queue is closed; dropping task");
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.task_receiver.len()
    }

    /// Runs the tasks that were queued when the call began.
    ///
    /// Returns how many ran. Called from any thread but the owner it runs
    /// nothing and fails with [`EngineError::WrongThread`].
    pub fn drain(&self) -> EngineResult<usize> {
        if !self.is_main_thread() {
            error!(
                "thread {:?} tried to drain the main-thread queue owned by {:?}",
                thread::current().id(),
                self.owner
            );
            return Err(EngineError::WrongThread);
        }

        let queued = self.task_receiver.len();
        let mut executed = 0;
        for _ in 0..queued {
            match self.task_receiver.try_recv() {
                Ok(task) => {
                    task();
                    executed += 1;
                }
                Err(_) => break,
            }
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn runs_tasks_in_submission_order() {
        let queue = MainThreadQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            queue.post(move || log.lock().unwrap().push(i));
        }

        assert_eq!(queue.pending(), 3);
        assert_eq!(queue.drain().unwrap(), 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn tasks_queued_during_drain_wait_for_next_drain() {
        let queue = Arc::new(MainThreadQueue::new());
        let inner = queue.clone();
        let ticket_slot = Arc::new(Mutex::new(None));
        let slot = ticket_slot.clone();
        queue.post(move || {
            *slot.lock().unwrap() = Some(inner.submit(|| "second"));
        });

        assert_eq!(queue.drain().unwrap(), 1);
        let ticket = ticket_slot.lock().unwrap().take().unwrap();
        assert_eq!(ticket.poll(), TicketState::Pending);

        assert_eq!(queue.drain().unwrap(), 1);
        assert_eq!(ticket.poll(), TicketState::Ready("second"));
    }

    #[test]
    fn other_threads_can_submit_but_not_drain() {
        let queue = Arc::new(MainThreadQueue::new());
        let worker_queue = queue.clone();

        let (ticket, drained) = std::thread::spawn(move || {
            let ticket = worker_queue.submit(|| 5);
            let drained = worker_queue.drain();
            (ticket, drained)
        })
        .join()
        .unwrap();

        assert!(matches!(drained, Err(EngineError::WrongThread)));
        assert_eq!(ticket.poll(), TicketState::Pending);

        queue.drain().unwrap();
        assert_eq!(ticket.poll(), TicketState::Ready(5));
    }

    #[test]
    fn dropped_queue_abandons_tickets() {
        let queue = MainThreadQueue::new();
        let ticket = queue.submit(|| 1);
        drop(queue);
        assert_eq!(ticket.poll(), TicketState::Abandoned);
    }
}
