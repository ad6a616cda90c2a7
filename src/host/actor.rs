//! # Host Actor
//!
//! The host runs in its own Tokio task and owns the slot pool outright. Every
//! request arrives over one channel and is processed sequentially, so the
//! seat count needs no lock.
//!
//! When the table is full, requesters are parked in a FIFO queue along with
//! their reply channel. Releasing a slot hands it straight to the head of the
//! queue.
//!
//! Every [`Slot`] handed out carries a sender back to the host, so a seat
//! comes back even when the task holding it dies. The host itself only keeps
//! a weak sender: it still shuts down once every client is gone.

use super::client::HostClient;
use super::message::{HostRequest, HostStats, Response, Slot};
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The admission controller: at most `capacity` philosophers hold a slot.
pub struct HostActor {
    receiver: mpsc::Receiver<HostRequest>,
    /// Upgraded into each slot so it can return itself.
    returns: mpsc::WeakSender<HostRequest>,
    capacity: usize,
    /// ticket -> philosopher
    seated: HashMap<u64, usize>,
    waiting: VecDeque<(usize, Response<Slot>)>,
    next_ticket: u64,
    peak_seated: usize,
    granted: u64,
}

impl HostActor {
    /// Creates a host seating at most `capacity` philosophers, and its client.
    ///
    /// `capacity` is not checked against any ring size here; that belongs to
    /// [`TableConfig::validate`](crate::config::TableConfig::validate).
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(buffer_size: usize, capacity: usize) -> (Self, HostClient) {
        assert!(capacity > 0, "host capacity must be at least 1");
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            returns: sender.downgrade(),
            capacity,
            seated: HashMap::new(),
            waiting: VecDeque::new(),
            next_ticket: 1,
            peak_seated: 0,
            granted: 0,
        };
        (actor, HostClient::new(sender))
    }

    /// Runs the host loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(capacity = self.capacity, "Host started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                HostRequest::RequestSlot {
                    philosopher,
                    respond_to,
                } => {
                    if self.seated.len() < self.capacity {
                        self.seat(philosopher, respond_to);
                    } else {
                        self.waiting.push_back((philosopher, respond_to));
                        debug!(philosopher, waiting = self.waiting.len(), "Table full, queued");
                    }
                }
                HostRequest::ReleaseSlot {
                    ticket,
                    philosopher,
                } => {
                    if self.seated.remove(&ticket).is_none() {
                        panic!("slot {ticket} of philosopher {philosopher} released but not seated");
                    }
                    debug!(philosopher, seated = self.seated.len(), "Left the table");
                    self.seat_next();
                }
                HostRequest::Stats { respond_to } => {
                    let _ = respond_to.send(self.stats());
                }
            }
        }

        info!(
            granted = self.granted,
            peak_seated = self.peak_seated,
            "Host shutdown"
        );
    }

    /// Hands out a slot. Returns `false` if the requester is already gone,
    /// in which case nothing is recorded.
    fn seat(&mut self, philosopher: usize, respond_to: Response<Slot>) -> bool {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let slot = Slot {
            ticket,
            philosopher,
            host: self.returns.upgrade(),
        };
        if let Err(mut unclaimed) = respond_to.send(slot) {
            // Never seated, so nothing to give back.
            unclaimed.disarm();
            warn!(philosopher, "Requester gone before being seated");
            return false;
        }

        self.seated.insert(ticket, philosopher);
        assert!(
            self.seated.len() <= self.capacity,
            "host seated {} with capacity {}",
            self.seated.len(),
            self.capacity
        );
        self.granted += 1;
        self.peak_seated = self.peak_seated.max(self.seated.len());
        debug!(philosopher, ticket, seated = self.seated.len(), "Seated");
        true
    }

    fn seat_next(&mut self) {
        while let Some((philosopher, respond_to)) = self.waiting.pop_front() {
            if self.seat(philosopher, respond_to) {
                break;
            }
        }
    }

    fn stats(&self) -> HostStats {
        HostStats {
            capacity: self.capacity,
            seated: self.seated.len(),
            waiting: self.waiting.len(),
            peak_seated: self.peak_seated,
            granted: self.granted,
        }
    }
}
