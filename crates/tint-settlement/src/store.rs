//! Intent storage.
//!
//! The pipeline never owns a global registry: callers inject an
//! [`IntentStore`]. [`InMemoryIntentStore`] keeps a bounded number of
//! intents. Once full it evicts the oldest terminal intent; an intent still
//! in flight is never dropped, so a full store of live intents rejects new
//! ones instead.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard},
};

use alloy_primitives::B256;
use tint_types::{Intent, IntentId, IntentStatus, Result, TintError};

/// Where intents live between lifecycle steps.
pub trait IntentStore: Send + Sync {
    /// A snapshot of the stored intent.
    fn get(&self, id: &IntentId) -> Result<Intent>;

    /// Insert a new intent.
    ///
    /// # Errors
    /// `DuplicateIntent` if the id is already stored, `StoreFull` if there
    /// is no room without dropping a live intent.
    fn put(&self, intent: Intent) -> Result<()>;

    /// Apply one lifecycle transition and return the updated intent.
    fn update_status(&self, id: &IntentId, status: IntentStatus, note: &str) -> Result<Intent>;

    /// Record the commitment digest published for the intent.
    fn attach_commitment(&self, id: &IntentId, digest: B256) -> Result<()>;
}

impl<T: IntentStore + ?Sized> IntentStore for &T {
    fn get(&self, id: &IntentId) -> Result<Intent> {
        (**self).get(id)
    }

    fn put(&self, intent: Intent) -> Result<()> {
        (**self).put(intent)
    }

    fn update_status(&self, id: &IntentId, status: IntentStatus, note: &str) -> Result<Intent> {
        (**self).update_status(id, status, note)
    }

    fn attach_commitment(&self, id: &IntentId, digest: B256) -> Result<()> {
        (**self).attach_commitment(id, digest)
    }
}

struct Inner {
    intents: HashMap<IntentId, Intent>,
    /// Insertion order for eviction (front = oldest).
    order: VecDeque<IntentId>,
}

/// Bounded in-process store.
pub struct InMemoryIntentStore {
    inner: Mutex<Inner>,
    max_size: usize,
}

impl InMemoryIntentStore {
    /// Create a store holding at most `max_size` intents.
    ///
    /// # Panics
    /// Panics if `max_size` is zero.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "InMemoryIntentStore max_size must be > 0");
        Self {
            inner: Mutex::new(Inner {
                intents: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
            }),
            max_size,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| TintError::Internal("intent store lock poisoned".into()))
    }

    /// Number of intents currently held.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |inner| inner.intents.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryIntentStore {
    fn default() -> Self {
        Self::new(tint_types::constants::DEFAULT_INTENT_STORE_CAPACITY)
    }
}

impl IntentStore for InMemoryIntentStore {
    fn get(&self, id: &IntentId) -> Result<Intent> {
        self.lock()?
            .intents
            .get(id)
            .cloned()
            .ok_or(TintError::IntentNotFound(*id))
    }

    fn put(&self, intent: Intent) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.intents.contains_key(&intent.id) {
            return Err(TintError::DuplicateIntent(intent.id));
        }

        if inner.intents.len() >= self.max_size {
            let Inner { intents, order } = &mut *inner;
            let pos = order
                .iter()
                .position(|id| intents.get(id).is_some_and(Intent::is_terminal))
                .ok_or(TintError::StoreFull {
                    capacity: self.max_size,
                })?;
            if let Some(evicted) = order.remove(pos) {
                intents.remove(&evicted);
                tracing::debug!(intent = %evicted, "Evicted oldest terminal intent");
            }
        }

        inner.order.push_back(intent.id);
        inner.intents.insert(intent.id, intent);
        Ok(())
    }

    fn update_status(&self, id: &IntentId, status: IntentStatus, note: &str) -> Result<Intent> {
        let mut inner = self.lock()?;
        let intent = inner
            .intents
            .get_mut(id)
            .ok_or(TintError::IntentNotFound(*id))?;
        let from = intent.status;
        intent.transition(status, note)?;
        tracing::info!(intent = %id, %from, to = %status, note, "Intent status");
        Ok(intent.clone())
    }

    fn attach_commitment(&self, id: &IntentId, digest: B256) -> Result<()> {
        let mut inner = self.lock()?;
        let intent = inner
            .intents
            .get_mut(id)
            .ok_or(TintError::IntentNotFound(*id))?;
        intent.commitment = Some(digest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tint_types::IntentRequest;

    use super::*;

    fn intent() -> Intent {
        Intent::new(IntentRequest::dummy(100))
    }

    #[test]
    fn put_then_get() {
        let store = InMemoryIntentStore::new(10);
        let i = intent();
        let id = i.id;
        store.put(i).unwrap();
        assert_eq!(store.get(&id).unwrap().status, IntentStatus::Created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_put_rejected() {
        let store = InMemoryIntentStore::new(10);
        let i = intent();
        store.put(i.clone()).unwrap();
        let err = store.put(i).unwrap_err();
        assert!(matches!(err, TintError::DuplicateIntent(_)));
    }

    #[test]
    fn missing_intent() {
        let store = InMemoryIntentStore::new(10);
        let err = store.get(&IntentId::new()).unwrap_err();
        assert!(matches!(err, TintError::IntentNotFound(_)));
    }

    #[test]
    fn update_enforces_transitions() {
        let store = InMemoryIntentStore::new(10);
        let i = intent();
        let id = i.id;
        store.put(i).unwrap();

        let updated = store
            .update_status(&id, IntentStatus::Connecting, "dialing")
            .unwrap();
        assert_eq!(updated.timeline.len(), 1);

        let err = store
            .update_status(&id, IntentStatus::Settled, "skip")
            .unwrap_err();
        assert!(matches!(err, TintError::InvalidTransition { .. }));
        assert_eq!(store.get(&id).unwrap().status, IntentStatus::Connecting);
    }

    fn fail(store: &InMemoryIntentStore, id: &IntentId) {
        store
            .update_status(id, IntentStatus::Failed, "gave up")
            .unwrap();
    }

    #[test]
    fn evicts_oldest_terminal() {
        let store = InMemoryIntentStore::new(3);
        let (a, b, c, d) = (intent(), intent(), intent(), intent());
        let (ia, ib, ic, id) = (a.id, b.id, c.id, d.id);
        store.put(a).unwrap();
        store.put(b).unwrap();
        store.put(c).unwrap();
        fail(&store, &ib);
        fail(&store, &ic);

        store.put(d).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get(&ia).is_ok(), "live intent must survive eviction");
        assert!(store.get(&ib).is_err(), "oldest terminal should be evicted");
        assert!(store.get(&ic).is_ok());
        assert!(store.get(&id).is_ok());
    }

    #[test]
    fn full_of_live_intents_rejects_put() {
        let store = InMemoryIntentStore::new(2);
        let (a, b, c) = (intent(), intent(), intent());
        let (ia, ib, ic) = (a.id, b.id, c.id);
        store.put(a).unwrap();
        store.put(b).unwrap();
        store
            .update_status(&ia, IntentStatus::Connecting, "")
            .unwrap();

        let err = store.put(c).unwrap_err();
        assert!(matches!(err, TintError::StoreFull { capacity: 2 }));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&ia).unwrap().status, IntentStatus::Connecting);
        assert!(store.get(&ib).is_ok());
        assert!(store.get(&ic).is_err());

        // Room again once one of them finishes.
        fail(&store, &ia);
        store.put(intent()).unwrap();
        assert!(store.get(&ia).is_err());
        assert!(store.get(&ib).is_ok());
    }

    #[test]
    fn commitment_attached() {
        let store = InMemoryIntentStore::new(2);
        let i = intent();
        let id = i.id;
        store.put(i).unwrap();
        store.attach_commitment(&id, B256::repeat_byte(7)).unwrap();
        assert_eq!(store.get(&id).unwrap().commitment, Some(B256::repeat_byte(7)));
    }
}
