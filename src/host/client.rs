//! # Host Client
//!
//! Cheap, cloneable handle to a running [`HostActor`](super::HostActor), plus
//! the [`Admission`] trait that philosophers are written against.

use super::message::{HostRequest, HostStats, Slot};
use crate::error::DiningError;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Anything that can seat a philosopher and take the seat back.
///
/// [`HostClient`] is the real implementation. Tests wrap it to count grants
/// and releases independently of the host's own bookkeeping.
#[async_trait]
pub trait Admission: Send + Sync {
    /// Waits for a free slot.
    async fn request_slot(&self, philosopher: usize) -> Result<Slot, DiningError>;

    /// Gives a slot back. Dropping the slot instead also frees the seat,
    /// but this is the path a normal meal takes.
    async fn release_slot(&self, slot: Slot) -> Result<(), DiningError>;
}

/// Client for talking to the host task.
#[derive(Clone)]
pub struct HostClient {
    sender: mpsc::Sender<HostRequest>,
}

impl HostClient {
    pub fn new(sender: mpsc::Sender<HostRequest>) -> Self {
        Self { sender }
    }

    pub async fn stats(&self) -> Result<HostStats, DiningError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HostRequest::Stats { respond_to })
            .await
            .map_err(|_| DiningError::HostClosed)?;
        response.await.map_err(|_| DiningError::HostDropped)
    }
}

#[async_trait]
impl Admission for HostClient {
    #[instrument(skip(self))]
    async fn request_slot(&self, philosopher: usize) -> Result<Slot, DiningError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HostRequest::RequestSlot {
                philosopher,
                respond_to,
            })
            .await
            .map_err(|_| DiningError::HostClosed)?;
        response.await.map_err(|_| DiningError::HostDropped)
    }

    #[instrument(skip(self))]
    async fn release_slot(&self, mut slot: Slot) -> Result<(), DiningError> {
        // Disarm only once the send is done; if this future is dropped
        // mid-send the slot still returns itself.
        let sent = self.sender.send(slot.release_request()).await;
        slot.disarm();
        sent.map_err(|_| DiningError::HostClosed)
    }
}
