//! Keyed request deduplication with reference-counted cancellation.
//!
//! One cache entry per `(procedure, input)` key. Concurrent callers for the
//! same key share a single in-flight transport call; the first caller spawns
//! the driver task, later callers subscribe to its result. Each waiter holds
//! a reference on the flight: when the last waiter is dropped before
//! resolution, the driver is aborted and the pending entry removed, so an
//! abandoned request never masquerades as a completed one.
//!
//! Successful results are cached; errors are not (a retry must re-issue).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ClientError;
use crate::transport::Transport;

type Key = (&'static str, String);
type FlightResult = Option<Result<Value, ClientError>>;

struct Flight {
    rx: watch::Receiver<FlightResult>,
    waiters: AtomicUsize,
    finished: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

enum CacheEntry {
    Pending(Arc<Flight>),
    Ready(Value),
}

/// Shared request cache. Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    transport: Arc<dyn Transport>,
    entries: Arc<DashMap<Key, CacheEntry>>,
}

impl QueryCache {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            entries: Arc::new(DashMap::new()),
        }
    }

    fn key(procedure: &'static str, input: &Value) -> Key {
        // Inputs come from typed structs, so the serialized field order is
        // deterministic per procedure.
        (procedure, input.to_string())
    }

    /// Fetch through the cache: at most one underlying request per distinct
    /// key, shared by every concurrent caller.
    pub async fn get_raw(
        &self,
        procedure: &'static str,
        input: Value,
    ) -> Result<Value, ClientError> {
        let key = Self::key(procedure, &input);

        loop {
            let flight = match self.entries.entry(key.clone()) {
                dashmap::Entry::Occupied(occupied) => match occupied.get() {
                    CacheEntry::Ready(value) => return Ok(value.clone()),
                    CacheEntry::Pending(flight) => {
                        flight.waiters.fetch_add(1, Ordering::AcqRel);
                        Arc::clone(flight)
                    }
                },
                dashmap::Entry::Vacant(vacant) => {
                    let (tx, rx) = watch::channel(None);
                    let flight = Arc::new(Flight {
                        rx,
                        waiters: AtomicUsize::new(1),
                        finished: AtomicBool::new(false),
                        handle: Mutex::new(None),
                    });
                    vacant.insert(CacheEntry::Pending(Arc::clone(&flight)));

                    let transport = Arc::clone(&self.transport);
                    let entries = Arc::clone(&self.entries);
                    let task_key = key.clone();
                    let task_flight = Arc::clone(&flight);
                    let task_input = input.clone();
                    let handle = tokio::spawn(async move {
                        let result = transport.call(task_key.0, task_input).await;
                        task_flight.finished.store(true, Ordering::Release);
                        match &result {
                            Ok(value) => {
                                entries.insert(task_key, CacheEntry::Ready(value.clone()));
                            }
                            Err(_) => {
                                // Errors are not cached
                                entries.remove(&task_key);
                            }
                        }
                        let _ = tx.send(Some(result));
                    });
                    *flight.handle.lock().expect("flight handle lock poisoned") = Some(handle);
                    flight
                }
            };

            // The guard keeps the waiter count honest even when this future
            // is dropped mid-wait.
            let _guard = WaiterGuard {
                entries: Arc::clone(&self.entries),
                key: key.clone(),
                flight: Arc::clone(&flight),
            };

            let mut rx = flight.rx.clone();
            let waited = rx
                .wait_for(|slot| slot.is_some())
                .await
                .map(|slot| slot.clone());
            match waited {
                Ok(slot) => {
                    return slot.expect("watch resolved without a value");
                }
                Err(_) => {
                    // The flight was torn down underneath us (invalidation
                    // mid-wait). Re-issue against fresh state.
                    debug!(procedure, "in-flight request vanished; retrying");
                    continue;
                }
            }
        }
    }

    /// Drop the entry for one key, pending or ready.
    pub fn invalidate(&self, procedure: &'static str, input: &Value) {
        self.entries.remove(&Self::key(procedure, input));
    }

    /// Drop every entry. Used after mutations.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Whether a completed value is cached for the key.
    pub fn contains_ready(&self, procedure: &'static str, input: &Value) -> bool {
        matches!(
            self.entries.get(&Self::key(procedure, input)).as_deref(),
            Some(CacheEntry::Ready(_))
        )
    }

    /// Whether any entry (pending or ready) exists for the key.
    pub fn contains(&self, procedure: &'static str, input: &Value) -> bool {
        self.entries.contains_key(&Self::key(procedure, input))
    }
}

struct WaiterGuard {
    entries: Arc<DashMap<Key, CacheEntry>>,
    key: Key,
    flight: Arc<Flight>,
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        let remaining = self.flight.waiters.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining > 0 || self.flight.finished.load(Ordering::Acquire) {
            return;
        }

        // Last waiter gone before resolution: abort the driver and clear the
        // pending entry (only if it is still ours — a fresh flight for the
        // same key must not be clobbered).
        if let Some(handle) = self
            .flight
            .handle
            .lock()
            .expect("flight handle lock poisoned")
            .take()
        {
            handle.abort();
        }
        self.entries.remove_if(&self.key, |_, entry| match entry {
            CacheEntry::Pending(f) => Arc::ptr_eq(f, &self.flight),
            CacheEntry::Ready(_) => false,
        });
    }
}
