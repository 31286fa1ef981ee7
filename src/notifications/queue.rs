//! In-memory per-user envelope queue with broadcast to push clients.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, info};

use super::model::Envelope;
use crate::directory::UserId;

/// Default broadcast channel capacity.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

type Slot = Arc<Mutex<Vec<Envelope>>>;

/// Append-only envelope sequences keyed by recipient.
///
/// The map lock is only held to find or create a recipient's slot; appends
/// for the same recipient serialize on that slot's mutex, so concurrent
/// appends never lose entries and different recipients don't contend.
pub struct RecipientQueue {
    slots: RwLock<HashMap<UserId, Slot>>,
    tx: broadcast::Sender<Envelope>,
}

impl RecipientQueue {
    /// Create a new queue.
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_BROADCAST_CAPACITY)
    }

    /// Create a queue whose live broadcast buffers `capacity` envelopes.
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Arc::new(Self {
            slots: RwLock::new(HashMap::new()),
            tx,
        })
    }

    /// Subscribe to envelopes as they are appended. Each push client calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }

    /// Append an envelope to the tail of its recipient's sequence.
    pub async fn append(&self, envelope: Envelope) {
        let recipient_id = envelope.recipient_id;
        let slot = self.slot(recipient_id).await;

        let mut envelopes = slot.lock().await;
        envelopes.push(envelope.clone());
        let queued = envelopes.len();

        // Broadcast under the slot lock so subscribers see queue order
        let _ = self.tx.send(envelope.clone());
        drop(envelopes);

        info!(
            recipient_id,
            envelope_id = %envelope.id,
            event_type = %envelope.event_type,
            queued,
            "Envelope queued"
        );
    }

    async fn slot(&self, recipient_id: UserId) -> Slot {
        if let Some(slot) = self.slots.read().await.get(&recipient_id) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().await;
        let slot = slots.entry(recipient_id).or_insert_with(|| {
            debug!(recipient_id, "Creating recipient slot");
            Arc::new(Mutex::new(Vec::new()))
        });
        Arc::clone(slot)
    }

    /// Snapshot of everything queued for a recipient, oldest first.
    pub async fn pending(&self, recipient_id: UserId) -> Vec<Envelope> {
        let slot = self.slots.read().await.get(&recipient_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Number of envelopes queued for a recipient.
    pub async fn len(&self, recipient_id: UserId) -> usize {
        let slot = self.slots.read().await.get(&recipient_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.len(),
            None => 0,
        }
    }

    /// Number of envelopes queued across all recipients.
    pub async fn total(&self) -> usize {
        let slots: Vec<Slot> = self.slots.read().await.values().cloned().collect();
        let mut total = 0;
        for slot in slots {
            total += slot.lock().await.len();
        }
        total
    }

    /// Recipients with at least one queued envelope.
    pub async fn recipients(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.slots.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
