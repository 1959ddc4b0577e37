//! Pending-operation queue for mutations made while offline.

use std::collections::VecDeque;

use placemark_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::model::PlaceDraft;

/// A deferred mutation, recorded while the client is offline.
///
/// `Create` carries the provisional local id assigned at enqueue time so the
/// optimistic local entry can be swapped for the server's place on replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PendingOp {
    Create { local_id: DbId, data: PlaceDraft },
    Update { id: DbId, data: PlaceDraft },
    Delete { id: DbId },
}

/// FIFO queue of pending operations. Replay preserves enqueue order; a
/// failed operation goes to the back and is retried on the next pass.
#[derive(Debug, Default)]
pub struct PendingQueue {
    ops: VecDeque<PendingOp>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: PendingOp) {
        self.ops.push_back(op);
    }

    pub fn pop(&mut self) -> Option<PendingOp> {
        self.ops.pop_front()
    }

    /// Re-queue a failed operation behind everything currently waiting.
    pub fn requeue(&mut self, op: PendingOp) {
        self.ops.push_back(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Fold a later offline edit into a queued `Create` for the same
    /// provisional place. Returns false when no such entry exists.
    pub fn amend_create(&mut self, local_id: DbId, data: PlaceDraft) -> bool {
        for op in self.ops.iter_mut() {
            if let PendingOp::Create {
                local_id: queued_id,
                data: queued_data,
            } = op
            {
                if *queued_id == local_id {
                    *queued_data = data;
                    return true;
                }
            }
        }
        false
    }

    /// Drop a queued `Create` for a provisional place that was deleted
    /// before ever reaching the server. Returns false when absent.
    pub fn cancel_create(&mut self, local_id: DbId) -> bool {
        let before = self.ops.len();
        self.ops.retain(|op| {
            !matches!(op, PendingOp::Create { local_id: queued_id, .. } if *queued_id == local_id)
        });
        self.ops.len() != before
    }
}
