//! # Host Messages
//!
//! Requests sent from a [`HostClient`](super::HostClient) to the
//! [`HostActor`](super::HostActor).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tracing::warn;

/// Type alias for the one-shot reply channel used by the host.
pub type Response<T> = oneshot::Sender<T>;

/// Proof that the host has seated a philosopher.
///
/// Not `Clone`: the normal way to give a seat back is to hand this value to
/// [`HostClient::release_slot`](super::HostClient::release_slot). A slot
/// dropped without that (its task panicked or was aborted) sends the release
/// itself.
#[derive(Debug)]
#[must_use = "a slot that is never released keeps a seat occupied"]
pub struct Slot {
    pub(crate) ticket: u64,
    pub(crate) philosopher: usize,
    /// Set until the release has been sent.
    pub(crate) host: Option<mpsc::Sender<HostRequest>>,
}

impl Slot {
    pub fn philosopher(&self) -> usize {
        self.philosopher
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub(crate) fn release_request(&self) -> HostRequest {
        HostRequest::ReleaseSlot {
            ticket: self.ticket,
            philosopher: self.philosopher,
        }
    }

    /// The host already knows this seat is free (or never held it).
    pub(crate) fn disarm(&mut self) {
        self.host = None;
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        let Some(host) = self.host.take() else {
            return;
        };
        warn!(
            philosopher = self.philosopher,
            ticket = self.ticket,
            "Slot dropped without release, returning it"
        );
        match host.try_send(self.release_request()) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(release)) => {
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move {
                        let _ = host.send(release).await;
                    });
                }
            }
        }
    }
}

/// Snapshot of the host's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStats {
    pub capacity: usize,
    /// Philosophers holding a slot right now.
    pub seated: usize,
    /// Philosophers queued for a slot.
    pub waiting: usize,
    /// Highest `seated` value ever observed.
    pub peak_seated: usize,
    /// Total slots handed out.
    pub granted: u64,
}

#[derive(Debug)]
pub enum HostRequest {
    RequestSlot {
        philosopher: usize,
        respond_to: Response<Slot>,
    },
    ReleaseSlot {
        ticket: u64,
        philosopher: usize,
    },
    Stats {
        respond_to: Response<HostStats>,
    },
}
