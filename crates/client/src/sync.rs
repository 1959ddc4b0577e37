//! Local state store: server fetch, cache fallback, offline queue, and
//! relay-event patching.

use placemark_core::relay::UpdateEvent;
use placemark_core::types::DbId;

use crate::cache::CacheFile;
use crate::error::ClientError;
use crate::http::PlacesApi;
use crate::model::{Place, PlaceDraft};
use crate::queue::{PendingOp, PendingQueue};

/// Synchronized view of the place list.
///
/// Online mutations go straight to the HTTP API and the local copy mirrors
/// the server's response. Offline mutations apply optimistically to local
/// state and enqueue a [`PendingOp`]; [`replay`](Self::replay) pushes the
/// queue to the server strictly in enqueue order once connectivity returns.
/// Offline edits are not reconciled against concurrent server-side changes;
/// the last local write wins on replay.
pub struct SyncStore {
    api: PlacesApi,
    cache: CacheFile,
    places: Vec<Place>,
    queue: PendingQueue,
    offline: bool,
    last_error: Option<String>,
    next_local_id: DbId,
}

impl SyncStore {
    pub fn new(api: PlacesApi, cache: CacheFile) -> Self {
        Self {
            api,
            cache,
            places: Vec::new(),
            queue: PendingQueue::new(),
            offline: false,
            last_error: None,
            // Provisional ids for offline creates count down from -1 so
            // they can never collide with server-assigned ids.
            next_local_id: -1,
        }
    }

    /// Fetch the full place list and mirror it to the cache. When the fetch
    /// fails, fall back to the cached copy (if any) and record an error
    /// string for the caller to display.
    pub async fn start(&mut self) {
        match self.api.list_places().await {
            Ok(places) => {
                self.places = places;
                self.offline = false;
                self.last_error = None;
                self.mirror();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial fetch failed, using cached places");
                self.offline = true;
                self.last_error = Some(format!("Failed to fetch places: {e}"));
                if self.cache.exists() {
                    match self.cache.load() {
                        Ok(places) => self.places = places,
                        Err(e) => {
                            tracing::warn!(error = %e, "Cache unreadable, starting empty")
                        }
                    }
                }
            }
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Force offline mode, e.g. from a connectivity check.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// The most recent fetch error, for display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Create a place. Offline, the place appears locally with a
    /// provisional negative id and the create is queued.
    pub async fn create_place(&mut self, draft: PlaceDraft) -> Result<Place, ClientError> {
        if self.offline {
            let local_id = self.next_local_id;
            self.next_local_id -= 1;
            let place = draft.clone().into_place(local_id);
            self.places.push(place.clone());
            self.queue.push(PendingOp::Create {
                local_id,
                data: draft,
            });
            self.mirror();
            return Ok(place);
        }

        match self.api.create_place(&draft).await {
            Ok(place) => {
                self.places.push(place.clone());
                self.mirror();
                Ok(place)
            }
            Err(e) if e.is_network() => {
                // Connectivity dropped mid-session; switch to offline mode
                // and retry this create as a queued operation.
                self.offline = true;
                Box::pin(self.create_place(draft)).await
            }
            Err(e) => Err(e),
        }
    }

    /// Replace a place's fields. Offline edits to a not-yet-synced place
    /// fold into its queued create instead of enqueuing a separate update.
    pub async fn update_place(
        &mut self,
        id: DbId,
        draft: PlaceDraft,
    ) -> Result<Place, ClientError> {
        if self.offline {
            let place = draft.clone().into_place(id);
            self.upsert(place.clone());
            if !self.queue.amend_create(id, draft.clone()) {
                self.queue.push(PendingOp::Update { id, data: draft });
            }
            self.mirror();
            return Ok(place);
        }

        match self.api.update_place(id, &draft).await {
            Ok(place) => {
                self.upsert(place.clone());
                self.mirror();
                Ok(place)
            }
            Err(e) if e.is_network() => {
                self.offline = true;
                Box::pin(self.update_place(id, draft)).await
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a place. Offline, deleting a not-yet-synced place simply
    /// cancels its queued create.
    pub async fn delete_place(&mut self, id: DbId) -> Result<(), ClientError> {
        if self.offline {
            self.places.retain(|p| p.id != id);
            if !self.queue.cancel_create(id) {
                self.queue.push(PendingOp::Delete { id });
            }
            self.mirror();
            return Ok(());
        }

        match self.api.delete_place(id).await {
            Ok(_) => {
                self.places.retain(|p| p.id != id);
                self.mirror();
                Ok(())
            }
            Err(e) if e.is_network() => {
                self.offline = true;
                Box::pin(self.delete_place(id)).await
            }
            Err(e) => Err(e),
        }
    }

    /// Replay the pending queue against the server, one pass in enqueue
    /// order. A failed operation is re-queued at the back for the next
    /// pass; there is no retry cap and no backoff here. Returns the number
    /// of operations still pending.
    pub async fn replay(&mut self) -> usize {
        let pass_len = self.queue.len();
        for _ in 0..pass_len {
            let Some(op) = self.queue.pop() else { break };
            if let Err(e) = self.run_op(&op).await {
                tracing::warn!(error = %e, ?op, "Replay failed, re-queueing");
                self.queue.requeue(op);
            }
        }

        if self.queue.is_empty() {
            self.offline = false;
            self.last_error = None;
        }
        self.mirror();
        self.queue.len()
    }

    /// Patch local state from a relay event originating elsewhere.
    pub fn apply_update(&mut self, event: &UpdateEvent) {
        match event {
            UpdateEvent::Add { data } | UpdateEvent::Refresh { data } => {
                match serde_json::from_value::<Place>(data.clone()) {
                    Ok(place) => self.upsert(place),
                    Err(e) => {
                        tracing::debug!(error = %e, "Ignoring relay event with unparseable place")
                    }
                }
            }
            UpdateEvent::Delete { id } => {
                self.places.retain(|p| p.id != *id);
            }
        }
        self.mirror();
    }

    async fn run_op(&mut self, op: &PendingOp) -> Result<(), ClientError> {
        match op {
            PendingOp::Create { local_id, data } => {
                let created = self.api.create_place(data).await?;
                // Swap the provisional entry for the server's place.
                match self.places.iter_mut().find(|p| p.id == *local_id) {
                    Some(slot) => *slot = created,
                    None => self.places.push(created),
                }
            }
            PendingOp::Update { id, data } => {
                let updated = self.api.update_place(*id, data).await?;
                self.upsert(updated);
            }
            PendingOp::Delete { id } => match self.api.delete_place(*id).await {
                Ok(_) => {}
                // Already gone server-side; the local intent is satisfied.
                Err(ClientError::Api { status: 404, .. }) => {}
                Err(e) => return Err(e),
            },
        }
        Ok(())
    }

    fn upsert(&mut self, place: Place) {
        match self.places.iter_mut().find(|p| p.id == place.id) {
            Some(slot) => *slot = place,
            None => self.places.push(place),
        }
    }

    /// Best-effort cache write; a failed mirror never fails the operation.
    fn mirror(&self) {
        if let Err(e) = self.cache.save(&self.places) {
            tracing::warn!(error = %e, "Failed to write offline cache");
        }
    }
}
