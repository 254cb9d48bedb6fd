//! CLOCK-Pro+ cache replacement policy.
//!
//! An adaptive, scan-resistant policy that approximates LIRS (Low
//! Inter-reference Recency Set) on a single circular clock. Pages are
//! classified hot (LIR) or cold (HIR); evicted cold pages leave nonresident
//! "test" metadata behind, and re-references to test pages drive an adaptive
//! resize of the hot/cold split. The "+" over classic CLOCK-Pro: adaptation
//! deltas are proportional to the observed demotion/test ratio instead of ±1.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ClockProPlusCache<K, V> Layout                      │
//! │                                                                         │
//! │   ┌───────────────────────────────────────────────────────────────────┐ │
//! │   │  index: FxHashMap<K, PageId>    (key -> page, residents + ghosts) │ │
//! │   └───────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │   ┌───────────────────────────────────────────────────────────────────┐ │
//! │   │  ring: PageRing<K, V>      (one circular list of all pages)       │ │
//! │   │                                                                   │ │
//! │   │        ┌──► [HOT] ──► [cld] ──► [tst] ──► [HOT] ──► [cld] ──┐     │ │
//! │   │        └────────────────────────────────────────────────────┘     │ │
//! │   │              ▲          ▲         ▲                    ▲          │ │
//! │   │              │          │         │                    │          │ │
//! │   │             hot        cold      test                 lru         │ │
//! │   └───────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │   hot hand:  rests on an unreferenced hot page; clears reference        │
//! │              bits and prunes test pages it passes                       │
//! │   cold hand: rests on an unreferenced resident cold page (the           │
//! │              eviction victim); promotes referenced cold pages it        │
//! │              passes                                                     │
//! │   test hand: rests on a nonresident (test) page for metadata pruning    │
//! │   lru:       tail of the recency stack; reused pages move here          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! GET(key):
//!   resident -> set referenced, return value
//!   ghost or absent -> miss (no structural change)
//!
//! INSERT(key, value):
//!   resident -> overwrite, set referenced
//!   otherwise -> MISS(key, value)
//!
//! MISS(key, value):
//!   sweep hot hand, then cold hand, to their rest positions
//!   key still has (nonresident) metadata -> ghost hit:
//!     grow the cold target, evict the cold victim, resurrect the
//!     page as hot, demoting hot pages while over target
//!   else:
//!     at capacity -> evict the cold victim (keeps test metadata if the
//!     page was still in the recency stack, drops it entirely otherwise)
//!     add the new page at the LRU tail (hot while the hot set is still
//!     filling and no cold page exists, cold otherwise)
//!     prune test pages while metadata exceeds 2x capacity
//! ```
//!
//! ## Scan Resistance
//!
//! A one-pass scan inserts pages that are cold and never re-referenced, so
//! the cold hand reclaims them first while the hot set is untouched. Pages
//! re-referenced during their test period (ghost hits) pull the cold target
//! up, letting a workload with a larger loop distance claim more cold space;
//! closed demotions push it back down.
//!
//! ## Performance Characteristics
//!
//! | Operation | Time    | Notes                                     |
//! |-----------|---------|-------------------------------------------|
//! | `get`     | O(1)    | Hash lookup + reference bit               |
//! | `insert`  | O(1)*   | *Amortized; hand sweeps bounded by 2·cap  |
//! | `peek`    | O(1)    | Hash lookup only                          |
//! | `keys`    | O(len)  | Emitted work; stops after the residents   |
//!
//! ## Example Usage
//!
//! ```
//! use clockkit::policy::clock_pro_plus::ClockProPlusCache;
//!
//! let mut cache: ClockProPlusCache<String, String> =
//!     ClockProPlusCache::new(100).unwrap();
//!
//! cache.insert("page1".to_string(), "content1".to_string());
//! cache.insert("page2".to_string(), "content2".to_string());
//!
//! // An access sets the reference bit; referenced cold pages are promoted
//! // when a hand passes them.
//! assert_eq!(cache.get(&"page1".to_string()), Some(&"content1".to_string()));
//!
//! // Churn through many single-use keys; the referenced page tends to
//! // survive the scan.
//! for i in 0..200 {
//!     cache.insert(format!("scan_{i}"), format!("data_{i}"));
//! }
//! let _ = cache.contains(&"page1".to_string());
//! assert!(cache.len() <= 100);
//! ```
//!
//! ## Notes
//! - Single-threaded: the cache is one consistency domain (ring, index,
//!   hands, counts, targets) and callers guard external concurrency.
//! - `debug_validate_invariants()` is available in debug/test builds.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::ds::page_ring::{Page, PageId, PageRing};
use crate::error::ConfigError;

/// Lowest capacity supported by the constructors: one hot and one cold page.
pub const MINIMUM_CAPACITY: usize = 2;

/// Initial fraction of capacity given to the cold set by
/// [`ClockProPlusCache::new`].
///
/// The adaptive target moves away from this within `[1, capacity / 2]` as
/// the workload is observed; workloads known to want a different starting
/// split can use [`ClockProPlusCache::try_with_cold_ratio`].
pub const DEFAULT_COLD_RATIO: f64 = 0.01;

/// Bounded key→value cache managed by the CLOCK-Pro+ replacement policy.
///
/// Holds at most `capacity` resident pages plus up to `capacity` nonresident
/// test pages (metadata only). Hot pages are protected from eviction; the
/// cold/hot split adapts to the workload via ghost hits and demotions.
///
/// Not thread-safe: wrap in an external mutex if sharing across threads.
pub struct ClockProPlusCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Maps keys to their page, for residents and test pages alike.
    index: FxHashMap<K, PageId>,
    /// Circular list of every tracked page.
    ring: PageRing<K, V>,
    hot: Option<PageId>,
    cold: Option<PageId>,
    test: Option<PageId>,
    lru: Option<PageId>,
    capacity: usize,
    cold_target: usize,
    hot_target: usize,
    initial_cold_target: usize,
    hot_count: usize,
    cold_count: usize,
    test_count: usize,
    /// Number of pages currently carrying the demoted bit.
    demotions: usize,
}

impl<K, V> ClockProPlusCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity and the default initial cold
    /// fraction ([`DEFAULT_COLD_RATIO`]).
    ///
    /// Capacity must be at least [`MINIMUM_CAPACITY`] so both a hot and a
    /// cold page can exist.
    ///
    /// # Example
    ///
    /// ```
    /// use clockkit::policy::clock_pro_plus::ClockProPlusCache;
    ///
    /// let cache: ClockProPlusCache<u64, String> = ClockProPlusCache::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    ///
    /// assert!(ClockProPlusCache::<u64, String>::new(1).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_cold_ratio(capacity, DEFAULT_COLD_RATIO)
    }

    /// Creates a cache whose initial cold target is `capacity * cold_ratio`.
    ///
    /// `cold_ratio` must lie in `(0.0, 0.5]`; the resulting target is still
    /// clamped to `[1, capacity / 2]`. Workloads dominated by long loops can
    /// start with a larger cold fraction instead of waiting for adaptation
    /// to grow it.
    pub fn try_with_cold_ratio(capacity: usize, cold_ratio: f64) -> Result<Self, ConfigError> {
        if capacity < MINIMUM_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                requested: capacity,
            });
        }
        if !(cold_ratio > 0.0 && cold_ratio <= 0.5) {
            return Err(ConfigError::InvalidColdRatio {
                requested: cold_ratio,
            });
        }
        // Range: [1, half capacity].
        let cold_initial = ((capacity as f64) * cold_ratio).max(1.0) as usize;
        let cold_target = cold_initial.min(capacity / 2);
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ring: PageRing::with_capacity(capacity),
            hot: None,
            cold: None,
            test: None,
            lru: None,
            capacity,
            cold_target,
            hot_target: capacity - cold_target,
            initial_cold_target: cold_target,
            hot_count: 0,
            cold_count: 0,
            test_count: 0,
            demotions: 0,
        })
    }

    /// Returns the value for `key` if it is resident, marking the page as
    /// referenced; otherwise returns `None`. Never restructures the ring.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.index.get(key).copied()?;
        let page = self.ring.get_mut(id);
        if !page.is_resident() {
            return None;
        }
        page.referenced = true;
        page.value.as_ref()
    }

    /// Returns the value for `key` if it is resident, without touching the
    /// reference bit or page status.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key).copied()?;
        self.ring.get(id).value.as_ref()
    }

    /// Returns `true` if `key` is resident. Test pages report `false`.
    ///
    /// Does not affect the reference bit.
    pub fn contains(&self, key: &K) -> bool {
        self.index
            .get(key)
            .is_some_and(|&id| self.ring.get(id).is_resident())
    }

    /// Inserts or updates `key` with `value`, marking the page as
    /// referenced.
    ///
    /// Updating a resident key returns the previous value. A nonresident
    /// key is a miss: if its test metadata is still tracked, the re-access
    /// is a ghost hit and the page is resurrected as hot (growing the cold
    /// target); otherwise a fresh page is admitted, evicting the cold
    /// victim when at capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use clockkit::policy::clock_pro_plus::ClockProPlusCache;
    ///
    /// let mut cache = ClockProPlusCache::new(2).unwrap();
    /// assert_eq!(cache.insert("a", 1), None);
    /// assert_eq!(cache.insert("a", 10), Some(1));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let page = self.ring.get_mut(id);
            if page.is_resident() {
                page.referenced = true;
                return page.value.replace(value);
            }
        }
        let had_metadata = self.index.contains_key(&key);
        self.handle_miss(key, value, had_metadata);
        None
    }

    /// Returns the resident value for `key`, or fetches, caches, and
    /// returns it.
    ///
    /// On a hit the reference bit is set and `fetch` is not invoked. On a
    /// miss, `fetch` runs; an `Err` is returned unchanged and the cache is
    /// left untouched (the next call will fetch again), while an `Ok` value
    /// is admitted through the regular miss path — including ghost-hit
    /// resurrection when the key's test metadata is still tracked.
    ///
    /// # Example
    ///
    /// ```
    /// use clockkit::policy::clock_pro_plus::ClockProPlusCache;
    ///
    /// let mut cache: ClockProPlusCache<&str, u32> = ClockProPlusCache::new(10).unwrap();
    /// let value = cache.try_get_or_insert_with("answer", || Ok::<u32, String>(42));
    /// assert_eq!(value, Ok(&42));
    ///
    /// // Second call hits; the closure is not consulted.
    /// let value = cache.try_get_or_insert_with("answer", || Err("offline".to_string()));
    /// assert_eq!(value, Ok(&42));
    /// ```
    pub fn try_get_or_insert_with<E>(
        &mut self,
        key: K,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        let hit = self
            .index
            .get(&key)
            .copied()
            .filter(|&id| self.ring.get(id).is_resident());
        match hit {
            Some(id) => {
                let page = self.ring.get_mut(id);
                page.referenced = true;
                Ok(page.value.as_ref().expect("resident page holds a value"))
            }
            None => {
                let value = fetch()?;
                let had_metadata = self.index.contains_key(&key);
                self.handle_miss(key.clone(), value, had_metadata);
                let id = self
                    .index
                    .get(&key)
                    .copied()
                    .expect("miss handling admits the key");
                Ok(self
                    .ring
                    .get(id)
                    .value
                    .as_ref()
                    .expect("resident page holds a value"))
            }
        }
    }

    /// Returns the number of resident pages.
    pub fn len(&self) -> usize {
        self.hot_count + self.cold_count
    }

    /// Returns `true` if no pages are resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of resident pages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of hot (LIR) pages.
    pub fn hot_count(&self) -> usize {
        self.hot_count
    }

    /// Returns the number of resident cold (HIR) pages.
    pub fn cold_count(&self) -> usize {
        self.cold_count
    }

    /// Returns the number of nonresident test (ghost) pages.
    pub fn ghost_count(&self) -> usize {
        self.test_count
    }

    /// Returns the adaptive target size of the cold set.
    pub fn cold_target(&self) -> usize {
        self.cold_target
    }

    /// Returns the target size of the hot set
    /// (`capacity - cold_target`).
    pub fn hot_target(&self) -> usize {
        self.hot_target
    }

    /// Returns an iterator over the keys of resident pages.
    ///
    /// Unordered and restartable: each call walks the index afresh. The
    /// iterator yields exactly [`len`](Self::len) keys and then stops, even
    /// while test entries remain in the index, so emitted work is
    /// proportional to the resident count. Mutating the cache invalidates
    /// the iterator (it borrows the cache).
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let residents = self.len();
        self.index
            .iter()
            .filter(|&(_, &id)| self.ring.get(id).is_resident())
            .map(|(key, _)| key)
            .take(residents)
    }

    /// Clears all entries and restores the initial cold/hot split.
    pub fn clear(&mut self) {
        self.index.clear();
        self.ring.clear();
        self.hot = None;
        self.cold = None;
        self.test = None;
        self.lru = None;
        self.hot_count = 0;
        self.cold_count = 0;
        self.test_count = 0;
        self.demotions = 0;
        self.cold_target = self.initial_cold_target;
        self.hot_target = self.capacity - self.initial_cold_target;
    }

    // -----------------------------------------------------------------------
    // Miss handling
    // -----------------------------------------------------------------------

    /// Runs after a page access misses. `had_metadata` says whether the
    /// key's page was present in the index (even if nonresident).
    fn handle_miss(&mut self, key: K, value: V, had_metadata: bool) {
        self.sweep_hot();
        self.sweep_cold();
        if had_metadata {
            // The sweeps above may have pruned the key's test page; only a
            // survivor is resurrected.
            if let Some(&ghost) = self.index.get(&key) {
                self.promote_test(ghost, value);
                return;
            }
        }
        if self.at_capacity() {
            self.evict_cold();
        }
        self.add_new(key, value);
    }

    fn at_capacity(&self) -> bool {
        self.hot_count + self.cold_count == self.capacity
    }

    /// Creates a new resident page, links it at the LRU tail, and performs
    /// the follow-up sweeps. The page starts hot while no cold page exists
    /// and the hot set is under target, cold otherwise.
    fn add_new(&mut self, key: K, value: V) {
        let low_irr = self.cold_count == 0 && self.hot_count < self.hot_target;
        let id = self.ring.insert_detached(Page {
            key: key.clone(),
            value: Some(value),
            lir: low_irr,
            referenced: false,
            stacked: true,
            demoted: false,
        });
        self.add_to_clock(key, id);
        if low_irr {
            self.hot_count += 1;
        } else {
            if self.cold.is_none() {
                self.cold = Some(id);
            }
            self.cold_count += 1;
        }
        self.sweep_cold();
        self.prune_test();
    }

    /// Links the page into the clock at the LRU tail and indexes it.
    fn add_to_clock(&mut self, key: K, id: PageId) {
        match self.lru {
            Some(lru) => self.ring.link_after(lru, id),
            None => self.hot = Some(id),
        }
        self.lru = Some(id);
        self.index.insert(key, id);
    }

    /// Resurrects a nonresident page as resident and hot; the cache targets
    /// are adjusted for the ghost hit.
    fn promote_test(&mut self, id: PageId, value: V) {
        debug_assert!(
            self.ring.get(id).stacked,
            "hit a nonresident cold page out of the stack"
        );
        debug_assert!(
            !self.ring.get(id).referenced,
            "hit a referenced nonresident cold page"
        );
        debug_assert!(self.at_capacity(), "ghost hit while below capacity");
        self.increase_cold_target();
        if self.at_capacity() {
            self.evict_cold();
        }
        let page = self.ring.get_mut(id);
        page.value = Some(value);
        self.test_count -= 1;
        self.cold_count += 1;
        if self.test == Some(id) {
            self.sweep_test();
        }
        self.promote_cold(id);
        self.sweep_cold();
    }

    // -----------------------------------------------------------------------
    // Hand sweeps
    // -----------------------------------------------------------------------

    /// Advances the hot hand until it rests on an unreferenced hot page,
    /// clearing reference bits, restacking pages, and pruning test pages
    /// along the way.
    fn sweep_hot(&mut self) {
        if self.hot_count == 0 {
            return;
        }
        let Some(mut id) = self.hot else { return };
        loop {
            let (lir, referenced) = {
                let page = self.ring.get(id);
                (page.lir, page.referenced)
            };
            if lir && !referenced {
                break;
            }
            let next = self.ring.next(id);
            if lir {
                self.ring.get_mut(id).referenced = false;
                self.lru = Some(id);
            } else {
                self.handle_hot_hir(id, next);
            }
            id = next;
        }
        self.hot = Some(id);
    }

    /// Processes a cold page the hot hand passes: referenced residents are
    /// restacked (closing a demotion if one is pending), unreferenced
    /// residents fall out of the stack, nonresidents are pruned.
    fn handle_hot_hir(&mut self, id: PageId, next: PageId) {
        let page = self.ring.get_mut(id);
        if !page.is_resident() {
            self.remove_test(id);
            return;
        }
        if !page.referenced {
            page.stacked = false;
            return;
        }
        page.referenced = false;
        let closes_demotion = page.demoted;
        page.demoted = false;
        if closes_demotion {
            self.decrease_cold_target();
            self.demotions -= 1;
        }
        self.lru = Some(id);
        if self.cold == Some(id) {
            self.cold = Some(next);
        }
    }

    /// Advances the cold hand until it rests on an unreferenced resident
    /// cold page (the next eviction victim), promoting or restacking
    /// referenced cold pages it passes.
    fn sweep_cold(&mut self) {
        if self.cold_count == 0 {
            return;
        }
        let Some(mut hand) = self.cold else { return };
        loop {
            let (lir, resident, referenced) = {
                let page = self.ring.get(hand);
                (page.lir, page.is_resident(), page.referenced)
            };
            if !lir && resident && !referenced {
                break;
            }
            let id = hand;
            hand = self.ring.next(hand);
            if lir || !referenced {
                continue;
            }
            self.handle_referenced_cold(id);
            if !self.ring.contains(hand) {
                // A promotion can demote hot pages, and the follow-up hot
                // sweep may prune the test page the cursor was parked on.
                // The pre-sweep rest position is a resident page and cannot
                // have been pruned; resume from there.
                let Some(rest) = self.cold else { return };
                hand = rest;
            }
        }
        self.cold = Some(hand);
    }

    /// Handles a referenced resident cold page under the cold hand: a
    /// stacked one has proven a short reuse distance and is promoted to
    /// hot; an unstacked one re-enters the stack at the LRU tail.
    fn handle_referenced_cold(&mut self, id: PageId) {
        let page = self.ring.get_mut(id);
        page.referenced = false;
        let closes_demotion = page.demoted;
        page.demoted = false;
        let stacked = page.stacked;
        if closes_demotion {
            self.decrease_cold_target();
            self.demotions -= 1;
        }
        if stacked {
            self.promote_cold(id);
        } else {
            self.ring.get_mut(id).stacked = true;
            self.move_to_lru(id);
        }
    }

    /// Promotes a cold page to hot, then demotes hot pages while the hot
    /// set exceeds its target.
    fn promote_cold(&mut self, id: PageId) {
        self.ring.get_mut(id).lir = true;
        self.hot_count += 1;
        self.cold_count -= 1;
        self.move_to_lru(id);
        while self.hot_count > self.hot_target {
            self.demote_hot();
        }
    }

    /// Turns the page under the hot hand into a demoted cold page at the
    /// LRU tail, then re-establishes the hot hand's rest position.
    fn demote_hot(&mut self) {
        let id = self.hot.expect("hot hand unset while hot pages exist");
        debug_assert!(
            !self.ring.get(id).referenced,
            "hot hand stops on a referenced page"
        );
        self.hot = Some(self.ring.next(id));
        let page = self.ring.get_mut(id);
        page.lir = false;
        page.stacked = false;
        page.demoted = true;
        self.hot_count -= 1;
        self.cold_count += 1;
        self.demotions += 1;
        self.move_to_lru(id);
        self.sweep_hot();
    }

    /// Moves a page to the LRU tail of the recency stack.
    fn move_to_lru(&mut self, id: PageId) {
        let Some(lru) = self.lru else { return };
        if lru == id {
            return;
        }
        self.ring.unlink(id);
        self.ring.link_after(lru, id);
        self.lru = Some(id);
    }

    /// Evicts the page under the cold hand. The value is dropped but the
    /// metadata stays behind as a nonresident test page while the page is
    /// still in the stack; a page that already fell out is removed
    /// entirely.
    fn evict_cold(&mut self) {
        let id = self.cold.expect("cold hand unset at eviction");
        debug_assert!(
            {
                let page = self.ring.get(id);
                !page.lir && page.is_resident() && !page.referenced
            },
            "cold hand does not stop at an unreferenced resident cold page"
        );
        self.cold = Some(self.ring.next(id));
        let page = self.ring.get_mut(id);
        page.value = None;
        let closes_demotion = page.demoted;
        page.demoted = false;
        let stacked = page.stacked;
        self.cold_count -= 1;
        self.test_count += 1;
        if closes_demotion {
            self.demotions -= 1;
        }
        if self.test.is_none() {
            self.test = Some(id);
        }
        if !stacked {
            if self.lru == Some(id) {
                self.lru = Some(self.ring.prev(id));
            }
            self.remove_test(id);
        }
    }

    /// Splices a test page out of the ring and the index, re-pointing the
    /// test hand when necessary.
    fn remove_test(&mut self, id: PageId) {
        if self.test == Some(id) {
            self.test = Some(self.ring.next(id));
        }
        let page = self.ring.remove(id);
        self.index.remove(&page.key);
        self.test_count -= 1;
        self.sweep_test();
    }

    /// Advances the test hand to the next nonresident page, or clears it
    /// when no test pages remain.
    fn sweep_test(&mut self) {
        if self.test_count == 0 {
            self.test = None;
            return;
        }
        let Some(mut hand) = self.test else { return };
        loop {
            let page = self.ring.get(hand);
            if !page.lir && !page.is_resident() {
                break;
            }
            hand = self.ring.next(hand);
        }
        self.test = Some(hand);
    }

    /// Drops test pages while tracked metadata exceeds twice the capacity.
    fn prune_test(&mut self) {
        let metadata_limit = self.capacity * 2;
        while self.hot_count + self.cold_count + self.test_count > metadata_limit {
            let id = self.test.expect("metadata over bound without a test hand");
            debug_assert!(
                {
                    let page = self.ring.get(id);
                    page.stacked && !page.lir && !page.is_resident()
                },
                "test hand does not stop at a test page"
            );
            self.remove_test(id);
        }
    }

    // -----------------------------------------------------------------------
    // Target adaptation
    // -----------------------------------------------------------------------

    /// Grows the cold target on a ghost hit. The delta is the ratio of
    /// open demotions to test pages, at least 1; callers guarantee at
    /// least one test page exists.
    fn increase_cold_target(&mut self) {
        let delta = (self.demotions / self.test_count).max(1);
        self.adjust_cold_target(delta as isize);
    }

    /// Shrinks the cold target when a demotion closes (the demoted page
    /// was re-referenced or evicted). The delta is the ratio of test pages
    /// to open demotions, at least 1; callers guarantee at least one
    /// demotion is open.
    fn decrease_cold_target(&mut self) {
        let delta = (self.test_count / self.demotions).max(1);
        self.adjust_cold_target(-(delta as isize));
    }

    fn adjust_cold_target(&mut self, delta: isize) {
        // Range: [1, half capacity].
        let raised = (self.cold_target as isize).saturating_add(delta).max(1) as usize;
        self.cold_target = raised.min(self.capacity / 2);
        self.hot_target = self.capacity - self.cold_target;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.ring.debug_validate_invariants();

        assert!(self.hot_count + self.cold_count <= self.capacity);
        assert!(self.hot_count + self.cold_count + self.test_count <= self.capacity * 2);
        assert!((1..=self.capacity / 2).contains(&self.cold_target));
        assert_eq!(self.hot_target + self.cold_target, self.capacity);
        assert_eq!(
            self.ring.len(),
            self.hot_count + self.cold_count + self.test_count
        );
        assert_eq!(self.index.len(), self.ring.len());

        let (mut hot, mut cold, mut test, mut demoted) = (0, 0, 0, 0);
        for (key, &id) in &self.index {
            let page = self.ring.get(id);
            assert!(&page.key == key, "index key does not match page key");
            if page.lir {
                assert!(page.is_resident(), "hot pages are always resident");
                hot += 1;
            } else if page.is_resident() {
                cold += 1;
            } else {
                test += 1;
            }
            if page.demoted {
                demoted += 1;
            }
        }
        assert_eq!(hot, self.hot_count);
        assert_eq!(cold, self.cold_count);
        assert_eq!(test, self.test_count);
        assert_eq!(demoted, self.demotions);

        if self.hot_count > 0 {
            let hand = self.hot.expect("hot pages exist without a hot hand");
            assert!(self.ring.get(hand).lir, "hot hand rests on a cold page");
        }
        if let Some(hand) = self.test {
            let page = self.ring.get(hand);
            assert!(
                page.stacked && !page.lir && !page.is_resident(),
                "test hand rests off a test page"
            );
        }
    }
}

impl<K, V> fmt::Debug for ClockProPlusCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockProPlusCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("hot_count", &self.hot_count)
            .field("cold_count", &self.cold_count)
            .field("ghost_count", &self.test_count)
            .field("cold_target", &self.cold_target)
            .field("hot_target", &self.hot_target)
            .finish()
    }
}
