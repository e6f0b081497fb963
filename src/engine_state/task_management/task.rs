//! # Main-Thread Tasks
//!
//! The unit of work carried by the [`MainThreadQueue`](super::MainThreadQueue)
//! and the ticket a submitter keeps to pick up the result.
//!
//! ## Task Lifecycle
//! 1. Any thread submits a closure and receives a [`TaskTicket`]
//! 2. The owning thread drains the queue once per tick and runs the closure
//! 3. The submitter polls the ticket with a zero timeout on later ticks and
//!    simply tries again next tick while the result isn't there yet

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

/// A deferred closure that must run on the queue's owning thread.
pub type MainThreadTask = Box<dyn FnOnce() + Send + 'static>;

/// Outcome of polling a [`TaskTicket`].
#[derive(Debug, PartialEq, Eq)]
pub enum TicketState<T> {
    /// The task ran; here is its result.
    Ready(T),
    /// Not drained yet. Try again next tick.
    Pending,
    /// The queue was dropped before the task ran.
    Abandoned,
}

/// Receipt for a task submitted to the main thread.
#[derive(Debug)]
pub struct TaskTicket<T> {
    receiver: Receiver<T>,
}

impl<T> TaskTicket<T> {
    pub(super) fn new(receiver: Receiver<T>) -> Self {
        TaskTicket { receiver }
    }

    /// Checks for the result without waiting.
    pub fn poll(&self) -> TicketState<T> {
        match self.receiver.recv_timeout(Duration::ZERO) {
            Ok(value) => TicketState::Ready(value),
            Err(RecvTimeoutError::Timeout) => TicketState::Pending,
            Err(RecvTimeoutError::Disconnected) => TicketState::Abandoned,
        }
    }
}
