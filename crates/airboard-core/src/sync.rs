//! Refresh cycle for the airline board.
//!
//! Each cycle either republishes the cached list (when a non-empty cache
//! entry exists) or looks up every configured code concurrently, merges the
//! results over the in-memory list, persists the merged list and publishes
//! it. A polling task repeats the cycle on a fixed period and reports every
//! outcome through an mpsc channel.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::AirlineLookup;
use crate::cache::CacheManager;
use crate::models::{AirlineList, AirlineRecord};

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A non-empty cache entry was found; no lookups were made
    FromCache(AirlineList),
    /// Lookups ran; `matched` counts codes that returned a record this cycle
    Fetched { airlines: AirlineList, matched: usize },
}

impl SyncEvent {
    pub fn airlines(&self) -> &AirlineList {
        match self {
            SyncEvent::FromCache(airlines) => airlines,
            SyncEvent::Fetched { airlines, .. } => airlines,
        }
    }

    pub fn into_airlines(self) -> AirlineList {
        match self {
            SyncEvent::FromCache(airlines) => airlines,
            SyncEvent::Fetched { airlines, .. } => airlines,
        }
    }
}

/// Owns the in-memory `AirlineList` and runs refresh cycles against it.
pub struct Synchronizer {
    lookup: Arc<dyn AirlineLookup>,
    cache: CacheManager,
    codes: Vec<String>,
    current: AirlineList,
}

impl Synchronizer {
    /// Start with one empty slot per code.
    pub fn new(lookup: Arc<dyn AirlineLookup>, cache: CacheManager, codes: Vec<String>) -> Self {
        let current = AirlineList::empty(codes.len());
        Self {
            lookup,
            cache,
            codes,
            current,
        }
    }

    pub fn current(&self) -> &AirlineList {
        &self.current
    }

    /// Run one refresh cycle.
    ///
    /// Any non-empty cache entry short-circuits the cycle regardless of its
    /// age, so once an entry exists the timer never triggers a lookup until
    /// the entry is cleared.
    pub async fn run_cycle(&mut self) -> SyncEvent {
        if let Some(cached) = self.cached_list() {
            debug!(slots = cached.len(), "Using cached airline list");
            self.current = cached.clone();
            return SyncEvent::FromCache(cached);
        }

        let fetched = self.fetch_all().await;
        let matched = fetched.iter().filter(|slot| slot.is_some()).count();
        let merged = self.current.merge_fetched(fetched);

        if let Err(e) = self.cache.save_airlines(&merged) {
            warn!(error = %e, "Failed to cache airline list");
        }

        info!(matched = matched, total = self.codes.len(), "Airline refresh complete");
        self.current = merged.clone();
        SyncEvent::Fetched {
            airlines: merged,
            matched,
        }
    }

    /// Read the cache entry, treating unreadable or empty entries as absent.
    fn cached_list(&self) -> Option<AirlineList> {
        match self.cache.load_airlines() {
            Ok(Some(list)) if !list.is_empty() => {
                if list.len() != self.codes.len() {
                    debug!(
                        cached = list.len(),
                        expected = self.codes.len(),
                        "Resizing cached airline list"
                    );
                }
                Some(list.resized(self.codes.len()))
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable airline cache");
                None
            }
        }
    }

    /// Look up every code at once and wait for all of them.
    ///
    /// Slot `i` of the result belongs to `codes[i]`.
    async fn fetch_all(&self) -> Vec<Option<AirlineRecord>> {
        debug!(count = self.codes.len(), "Looking up airlines");
        let lookups = self.codes.iter().map(|code| self.lookup.lookup(code));
        join_all(lookups).await
    }

    /// Move the synchronizer into a polling task.
    ///
    /// The first cycle runs immediately, then once per `period`. A cycle that
    /// overruns the period delays the next tick rather than bursting. The
    /// task stops when the receiving side of `tx` is dropped or the returned
    /// handle is shut down.
    pub fn spawn(mut self, period: Duration, tx: mpsc::Sender<SyncEvent>) -> BoardHandle {
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let event = self.run_cycle().await;
                if tx.send(event).await.is_err() {
                    debug!("Board closed, stopping synchronizer");
                    break;
                }
            }
        });

        BoardHandle { task }
    }
}

/// Handle to a running polling task. Dropping it cancels the timer; lookups
/// still in flight are discarded.
pub struct BoardHandle {
    task: JoinHandle<()>,
}

impl BoardHandle {
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BoardHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AIRLINE_CODES;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Barrier;

    struct MockLookup {
        records: Mutex<HashMap<String, AirlineRecord>>,
        calls: AtomicUsize,
    }

    impl MockLookup {
        fn new(records: Vec<AirlineRecord>) -> Arc<Self> {
            let records = records
                .into_iter()
                .filter_map(|r| r.identifier.clone().map(|code| (code, r)))
                .collect();
            Arc::new(Self {
                records: Mutex::new(records),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn forget(&self, code: &str) {
            self.records.lock().expect("mock lock").remove(code);
        }
    }

    #[async_trait]
    impl AirlineLookup for MockLookup {
        async fn lookup(&self, code: &str) -> Option<AirlineRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.lock().expect("mock lock").get(code).cloned()
        }
    }

    /// Answers only once every expected lookup is in flight.
    struct BarrierLookup {
        barrier: Barrier,
    }

    #[async_trait]
    impl AirlineLookup for BarrierLookup {
        async fn lookup(&self, code: &str) -> Option<AirlineRecord> {
            self.barrier.wait().await;
            Some(record(code, "Nowhere"))
        }
    }

    fn record(code: &str, country: &str) -> AirlineRecord {
        AirlineRecord {
            identifier: Some(code.to_string()),
            name: Some(format!("{} Airlines", code)),
            icao: Some(code.to_string()),
            country: Some(country.to_string()),
            callsign: Some(code.to_string()),
            ..Default::default()
        }
    }

    fn american() -> AirlineRecord {
        AirlineRecord {
            identifier: Some("AAL".to_string()),
            name: Some("American Airlines".to_string()),
            icao: Some("AAL".to_string()),
            country: Some("United States".to_string()),
            callsign: Some("AMERICAN".to_string()),
            ..Default::default()
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    fn cache() -> (tempfile::TempDir, CacheManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("cache");
        (dir, cache)
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_slot_empty() {
        let (_dir, cache) = cache();
        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL", "DAL"]));

        let event = sync.run_cycle().await;

        let SyncEvent::Fetched { airlines, matched } = event else {
            panic!("expected a fetch cycle");
        };
        assert_eq!(matched, 1);
        assert_eq!(airlines.slots(), &[Some(american()), None]);
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetched_list_is_persisted() {
        let (_dir, cache) = cache();
        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup, cache, codes(&["AAL", "DAL"]));

        let event = sync.run_cycle().await;

        let stored = sync.cache.load_airlines().expect("load").expect("entry");
        assert_eq!(&stored, event.airlines());
    }

    #[tokio::test]
    async fn test_cached_list_skips_lookups() {
        let (_dir, cache) = cache();
        let cached = AirlineList::from_slots(vec![Some(american()), None]);
        cache.save_airlines(&cached).expect("seed cache");

        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL", "DAL"]));

        let event = sync.run_cycle().await;

        assert_eq!(event, SyncEvent::FromCache(cached.clone()));
        assert_eq!(sync.current(), &cached);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_repeats_every_cycle() {
        let (_dir, cache) = cache();
        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL", "DAL"]));

        assert!(matches!(sync.run_cycle().await, SyncEvent::Fetched { .. }));
        assert!(matches!(sync.run_cycle().await, SyncEvent::FromCache(_)));
        assert!(matches!(sync.run_cycle().await, SyncEvent::FromCache(_)));
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_cache_entry_triggers_fetch() {
        let (_dir, cache) = cache();
        cache.save_airlines(&AirlineList::empty(0)).expect("seed cache");
        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL"]));

        assert!(matches!(sync.run_cycle().await, SyncEvent::Fetched { .. }));
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_triggers_fetch() {
        let (dir, cache) = cache();
        std::fs::write(dir.path().join("airlineData.json"), "[{broken").expect("write");
        let lookup = MockLookup::new(vec![american()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL"]));

        let event = sync.run_cycle().await;
        assert_eq!(event.airlines().slots(), &[Some(american())]);
    }

    #[tokio::test]
    async fn test_miss_falls_back_to_previous_value() {
        let (_dir, cache) = cache();
        let dal = record("DAL", "United States");
        let lookup = MockLookup::new(vec![american(), dal.clone()]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, codes(&["AAL", "DAL"]));
        sync.run_cycle().await;

        // Simulate an outage for DAL and a cleared cache entry
        lookup.forget("DAL");
        sync.cache.clear_airlines().expect("clear");

        let event = sync.run_cycle().await;
        let SyncEvent::Fetched { airlines, matched } = event else {
            panic!("expected a fetch cycle");
        };
        assert_eq!(matched, 1);
        assert_eq!(airlines.slots(), &[Some(american()), Some(dal)]);
    }

    #[tokio::test]
    async fn test_length_invariant_across_cycles() {
        let (_dir, cache) = cache();
        let all_codes: Vec<String> = AIRLINE_CODES.iter().map(|c| c.to_string()).collect();
        let lookup = MockLookup::new(vec![american(), record("KLM", "Netherlands")]);
        let mut sync = Synchronizer::new(lookup.clone(), cache, all_codes);
        assert_eq!(sync.current().len(), 32);

        for _ in 0..3 {
            let event = sync.run_cycle().await;
            assert_eq!(event.airlines().len(), 32);
            sync.cache.clear_airlines().expect("clear");
        }
        assert_eq!(sync.current().loaded_count(), 2);
        assert_eq!(sync.current().get(10).and_then(|r| r.icao.as_deref()), Some("KLM"));
    }

    #[tokio::test]
    async fn test_cached_list_of_wrong_length_is_resized() {
        let (_dir, cache) = cache();
        cache
            .save_airlines(&AirlineList::from_slots(vec![Some(american())]))
            .expect("seed cache");
        let lookup = MockLookup::new(vec![]);
        let mut sync = Synchronizer::new(lookup, cache, codes(&["AAL", "DAL", "UAL"]));

        let event = sync.run_cycle().await;
        assert_eq!(event.airlines().len(), 3);
        assert_eq!(event.airlines().get(0), Some(&american()));
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let (_dir, cache) = cache();
        let all = codes(&["AAL", "DAL", "UAL", "SWA"]);
        let lookup = Arc::new(BarrierLookup {
            barrier: Barrier::new(all.len()),
        });
        let mut sync = Synchronizer::new(lookup, cache, all);

        // Sequential lookups would never get past the barrier
        let event = time::timeout(Duration::from_secs(5), sync.run_cycle())
            .await
            .expect("lookups did not overlap");
        assert_eq!(event.airlines().loaded_count(), 4);
    }

    #[tokio::test]
    async fn test_spawn_publishes_first_cycle_immediately() {
        let (_dir, cache) = cache();
        let lookup = MockLookup::new(vec![american()]);
        let sync = Synchronizer::new(lookup, cache, codes(&["AAL", "DAL"]));
        let (tx, mut rx) = mpsc::channel(4);

        let handle = sync.spawn(Duration::from_secs(3600), tx);

        let event = time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event published")
            .expect("channel closed");
        assert_eq!(event.airlines().get(0), Some(&american()));
        assert!(!handle.is_finished());
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_polling() {
        let (_dir, cache) = cache();
        let lookup = MockLookup::new(vec![]);
        let sync = Synchronizer::new(lookup, cache, codes(&["AAL"]));
        let (tx, mut rx) = mpsc::channel(4);

        let handle = sync.spawn(Duration::from_secs(3600), tx);
        let _first = time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event published");
        drop(handle);

        let next = time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("polling task was not cancelled");
        assert!(next.is_none());
    }
}
