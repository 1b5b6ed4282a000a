//! The embedded object store behind both screens.
//!
//! `PetStore` holds the registry in memory and applies every mutation
//! synchronously, so observers see changes immediately; each mutation bumps
//! a monotonic version counter, which is the subscribe-for-changes
//! primitive the screens poll. Persistence is fire-and-forget: the updated
//! snapshot is handed to a background worker thread and never awaited. A
//! failed write is logged and reported once through [`StoreEvent`] so the
//! UI can show a banner; the in-memory state is kept either way.

use crate::domain::{OwnerId, PetDraft, PetId, Registry, StoreResult};
use crate::infrastructure::persistence::RegistryRepository;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};
use std::thread::JoinHandle;

/// Out-of-band notifications from the persistence worker.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    PersistFailed(String),
}

pub struct PetStore {
    registry: Mutex<Registry>,
    version: AtomicU64,
    persist_tx: Option<Sender<Registry>>,
    events: Mutex<Receiver<StoreEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl PetStore {
    /// Opens the registry file, creating a seeded registry when the file
    /// does not exist yet, and starts the persistence worker.
    pub fn open(path: impl AsRef<std::path::Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let fresh = !path.exists();
        let registry = if fresh {
            Registry::seeded()
        } else {
            RegistryRepository::load(&path)?
        };

        let (persist_tx, persist_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = std::thread::spawn(move || persist_worker(persist_rx, event_tx, path));

        let store = Self {
            registry: Mutex::new(registry),
            version: AtomicU64::new(0),
            persist_tx: Some(persist_tx),
            events: Mutex::new(event_rx),
            worker: Some(worker),
        };
        if fresh {
            store.queue_persist();
        }
        Ok(store)
    }

    /// A seeded store with no backing file. Used by tests and safe to use
    /// anywhere a throwaway registry is wanted.
    pub fn in_memory() -> Self {
        let (_event_tx, event_rx) = mpsc::channel();
        Self {
            registry: Mutex::new(Registry::seeded()),
            version: AtomicU64::new(0),
            persist_tx: None,
            events: Mutex::new(event_rx),
            worker: None,
        }
    }

    /// Monotonic change counter. Screens re-derive their projections
    /// whenever this moves.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    /// A full copy of the current records.
    pub fn snapshot(&self) -> Registry {
        self.guard().clone()
    }

    pub fn add_pet(&self, draft: PetDraft) -> PetId {
        self.commit(|registry| registry.add_pet(draft))
    }

    pub fn rename_owner(&self, id: OwnerId, name: &str) -> bool {
        self.commit(|registry| registry.rename_owner(id, name))
    }

    pub fn remove_pet(&self, id: PetId) -> bool {
        self.commit(|registry| registry.remove_pet(id))
    }

    pub fn remove_owner(&self, id: OwnerId) -> bool {
        self.commit(|registry| registry.remove_owner(id))
    }

    /// Drains one pending worker notification, if any.
    pub fn try_recv_event(&self) -> Option<StoreEvent> {
        let events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.try_recv().ok()
    }

    fn commit<R>(&self, mutate: impl FnOnce(&mut Registry) -> R) -> R {
        let mut registry = self.guard();
        let result = mutate(&mut registry);
        let snapshot = self.persist_tx.is_some().then(|| registry.clone());
        drop(registry);

        self.version.fetch_add(1, Ordering::Relaxed);
        if let (Some(tx), Some(snapshot)) = (&self.persist_tx, snapshot) {
            // Fire and forget: a closed channel only happens mid-teardown.
            let _ = tx.send(snapshot);
        }
        result
    }

    fn queue_persist(&self) {
        if let Some(tx) = &self.persist_tx {
            let _ = tx.send(self.guard().clone());
        }
    }

    fn guard(&self) -> MutexGuard<'_, Registry> {
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for PetStore {
    /// Closes the persist channel and waits for queued writes to land, so
    /// dropping the store never loses an acknowledged mutation.
    fn drop(&mut self) {
        self.persist_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn persist_worker(rx: Receiver<Registry>, events: Sender<StoreEvent>, path: PathBuf) {
    while let Ok(snapshot) = rx.recv() {
        match RegistryRepository::save(&snapshot, &path) {
            Ok(()) => log::debug!("persisted registry to {}", path.display()),
            Err(err) => {
                log::error!("failed to persist registry to {}: {}", path.display(), err);
                let _ = events.send(StoreEvent::PersistFailed(err.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, store: &PetStore, owner: Option<&str>) -> PetDraft {
        PetDraft {
            name: name.to_string(),
            age: 4,
            type_id: store.snapshot().pet_types[0].id,
            owner_name: owner.map(|o| o.to_string()),
        }
    }

    #[test]
    fn test_mutations_bump_version_and_apply_immediately() {
        let store = PetStore::in_memory();
        assert_eq!(store.version(), 0);

        let draft = draft("Rex", &store, None);
        let pet_id = store.add_pet(draft);
        assert_eq!(store.version(), 1);
        assert_eq!(store.snapshot().pets.len(), 1);

        assert!(store.remove_pet(pet_id));
        assert_eq!(store.version(), 2);
        assert!(store.snapshot().pets.is_empty());
    }

    #[test]
    fn test_in_memory_store_has_no_events() {
        let store = PetStore::in_memory();
        store.add_pet(draft("Rex", &store, None));
        assert!(store.try_recv_event().is_none());
    }

    #[test]
    fn test_open_creates_seeded_registry_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.json");

        {
            let store = PetStore::open(&path).expect("open should succeed");
            assert_eq!(store.snapshot().pet_types.len(), 5);
        }

        // Dropping the store flushes the queued seed write.
        assert!(path.exists());
    }

    #[test]
    fn test_reopen_sees_persisted_mutations() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.json");

        {
            let store = PetStore::open(&path).expect("open should succeed");
            store.add_pet(draft("Rex", &store, Some("Ana")));
        }

        let store = PetStore::open(&path).expect("reopen should succeed");
        let registry = store.snapshot();
        assert_eq!(registry.pets.len(), 1);
        assert_eq!(registry.pets[0].name, "Rex");
        assert_eq!(registry.owners.len(), 1);
        assert_eq!(registry.owners[0].name, "Ana");
    }

    #[test]
    fn test_persist_failure_emits_event() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.json");
        let store = PetStore::open(&path).expect("open should succeed");

        // Removing the directory makes every later write fail.
        drop(dir);
        store.add_pet(draft("Rex", &store, None));

        let mut event = None;
        for _ in 0..100 {
            event = store.try_recv_event();
            if event.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(matches!(event, Some(StoreEvent::PersistFailed(_))));

        // The in-memory state is kept despite the failed write.
        assert_eq!(store.snapshot().pets.len(), 1);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.json");
        std::fs::write(&path, "{ not json").expect("write fixture");
        assert!(PetStore::open(&path).is_err());
    }
}
