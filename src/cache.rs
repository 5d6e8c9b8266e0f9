//! Fixed-capacity LRU cache for routing verdicts.
//!
//! Implemented as an arena of nodes addressed by index: a `HashMap` maps
//! each key to a slot in `nodes`, and the slots form a doubly-linked
//! recency list through `prev`/`next` indices. Index links keep the
//! structure free of raw pointers and unsafe code while preserving O(1)
//! get/put/remove.
//!
//! The map and the list describe the same set of entries at all times:
//! every mapped key has exactly one node on the list and vice versa. All
//! mutations go through `unlink`/`push_tail` so both structures move
//! together.
//!
//! List orientation: `head` is the least recently used entry (next to be
//! evicted), `tail` the most recently used.

use crate::error::{Result, RouterError};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::trace;

/// Node in the recency list.
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded key-value store with least-recently-used eviction.
///
/// By default an entry's recency position is set on insertion only.
/// With touch-on-get enabled, successful reads also refresh the position,
/// turning insertion-order eviction into true access-order eviction.
pub struct LruCache<K, V> {
    /// Key to node-slot mapping.
    map: HashMap<K, usize>,

    /// Node arena; `None` slots are parked on the free list.
    nodes: Vec<Option<Node<K, V>>>,

    /// Recycled slot indices.
    free: Vec<usize>,

    /// Least recently used end of the list.
    head: Option<usize>,

    /// Most recently used end of the list.
    tail: Option<usize>,

    /// Maximum number of entries at rest.
    capacity: usize,

    /// Whether a successful `get` refreshes the entry's recency.
    touch_on_get: bool,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with [`RouterError::InvalidCapacity`] when `capacity` is zero:
    /// eviction assumes at least one entry can reside before overflow.
    pub fn new(capacity: usize, touch_on_get: bool) -> Result<Self> {
        if capacity == 0 {
            return Err(RouterError::InvalidCapacity { capacity });
        }

        Ok(Self {
            map: HashMap::with_capacity(capacity),
            // One extra slot: put inserts before it evicts, so the arena
            // transiently holds capacity + 1 nodes.
            nodes: Vec::with_capacity(capacity + 1),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity,
            touch_on_get,
        })
    }

    /// Looks up `key`, refreshing its recency when touch-on-get is enabled.
    ///
    /// Returns `None` only when no entry exists; a stored value is always
    /// reported as present, whatever it holds.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        if self.touch_on_get {
            self.move_to_tail(idx);
        }
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Looks up `key` without affecting recency, regardless of options.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Inserts `key` → `value`, evicting the least recently used entry if
    /// the cache overflows. Returns whether an existing entry for `key`
    /// was replaced.
    ///
    /// Replacement is delete-then-insert rather than an in-place value
    /// swap: the entry always ends up at the most recently used position,
    /// whatever its prior recency. Eviction happens synchronously within
    /// the same call, so `len() <= capacity()` holds on return.
    pub fn put(&mut self, key: K, value: V) -> bool {
        let replaced = self.remove(&key).is_some();

        let idx = self.alloc();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.map.insert(key, idx);
        self.push_tail(idx);

        if self.map.len() > self.capacity {
            self.evict_lru();
        }

        replaced
    }

    /// Removes the entry for `key`, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        Some(node.value)
    }

    /// Iterates entries from least to most recently used.
    ///
    /// The traversal is lazy, leaves recency untouched, and can be
    /// restarted by calling `iter` again.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cache: self,
            cursor: self.head,
        }
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether reads refresh recency.
    pub fn touch_on_get(&self) -> bool {
        self.touch_on_get
    }

    /// Drops all entries, keeping capacity and options.
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Detaches the node at `idx` from the recency list, patching its
    /// neighbors and the `head`/`tail` ends. Handles head, tail, interior
    /// and single-node (head == tail) positions alike.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.nodes[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.nodes[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    /// Appends the detached node at `idx` to the most recently used end.
    fn push_tail(&mut self, idx: usize) {
        match self.tail {
            Some(tail_idx) => {
                if let Some(tail_node) = self.nodes[tail_idx].as_mut() {
                    tail_node.next = Some(idx);
                }
                if let Some(node) = self.nodes[idx].as_mut() {
                    node.prev = Some(tail_idx);
                    node.next = None;
                }
                self.tail = Some(idx);
            }
            None => {
                self.head = Some(idx);
                self.tail = Some(idx);
            }
        }
    }

    fn move_to_tail(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_tail(idx);
    }

    /// Evicts the entry at the least recently used end.
    fn evict_lru(&mut self) {
        if let Some(head_idx) = self.head {
            self.unlink(head_idx);
            if let Some(node) = self.nodes[head_idx].take() {
                self.map.remove(&node.key);
            }
            self.free.push(head_idx);
            trace!(len = self.map.len(), "evicted least recently used entry");
        }
    }

    fn alloc(&mut self) -> usize {
        match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.push(None);
                self.nodes.len() - 1
            }
        }
    }
}

/// Iterator over cache entries, least to most recently used.
pub struct Iter<'a, K, V> {
    cache: &'a LruCache<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.cache.nodes[idx].as_ref()?;
        self.cursor = node.next;
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LruCache<String, String> {
        LruCache::new(capacity, false).unwrap()
    }

    fn keys_lru_to_mru(cache: &LruCache<String, String>) -> Vec<String> {
        cache.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Walks the recency list and cross-checks it against the map:
    /// bijection, no cycles, consistent back links.
    fn check_consistency(cache: &LruCache<String, String>) {
        let walked: Vec<&String> = cache.iter().take(cache.len() + 1).map(|(k, _)| k).collect();
        assert_eq!(walked.len(), cache.len(), "list length != map length");
        for key in &walked {
            assert!(cache.map.contains_key(*key), "listed key missing from map");
        }
        // Back links mirror forward links.
        let mut cursor = cache.tail;
        let mut backward = Vec::new();
        while let Some(idx) = cursor {
            let node = cache.nodes[idx].as_ref().unwrap();
            backward.push(&node.key);
            cursor = node.prev;
            assert!(backward.len() <= cache.len(), "cycle in prev links");
        }
        backward.reverse();
        assert_eq!(walked, backward);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = LruCache::<String, String>::new(0, false);
        assert!(matches!(
            result,
            Err(RouterError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_get_and_put() {
        let mut c = cache(2);
        assert!(!c.put("a".into(), "1".into()));
        assert!(!c.put("b".into(), "2".into()));

        assert_eq!(c.get(&"a".into()), Some(&"1".to_string()));
        assert_eq!(c.get(&"b".into()), Some(&"2".to_string()));
        assert_eq!(c.get(&"c".into()), None);
        assert_eq!(c.len(), 2);
        check_consistency(&c);
    }

    #[test]
    fn test_absent_is_distinct_from_empty_value() {
        let mut c = cache(2);
        c.put("direct".into(), String::new());

        // An entry holding an empty string is still a hit.
        assert_eq!(c.get(&"direct".into()), Some(&String::new()));
        assert_eq!(c.get(&"missing".into()), None);
    }

    #[test]
    fn test_eviction_is_insertion_order() {
        let mut c = cache(2);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());
        c.put("c".into(), "3".into());

        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&"a".into()), None);
        assert_eq!(keys_lru_to_mru(&c), ["b", "c"]);
        check_consistency(&c);
    }

    #[test]
    fn test_plain_get_does_not_promote() {
        let mut c = cache(2);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());

        // Touch-on-get is off: reading "a" must not save it.
        c.get(&"a".into());
        c.put("c".into(), "3".into());

        assert_eq!(c.get(&"a".into()), None);
        assert_eq!(keys_lru_to_mru(&c), ["b", "c"]);
    }

    #[test]
    fn test_touch_on_get_promotes() {
        let mut c = LruCache::new(2, true).unwrap();
        c.put("a".to_string(), "1".to_string());
        c.put("b".to_string(), "2".to_string());

        // Reading "a" makes it the freshest entry, so "b" goes first.
        c.get(&"a".to_string());
        c.put("c".to_string(), "3".to_string());

        assert_eq!(c.get(&"b".to_string()), None);
        assert_eq!(c.get(&"a".to_string()), Some(&"1".to_string()));
        assert_eq!(c.get(&"c".to_string()), Some(&"3".to_string()));
    }

    #[test]
    fn test_peek_never_promotes() {
        let mut c = LruCache::new(2, true).unwrap();
        c.put("a".to_string(), "1".to_string());
        c.put("b".to_string(), "2".to_string());

        c.peek(&"a".to_string());
        c.put("c".to_string(), "3".to_string());

        assert_eq!(c.peek(&"a".to_string()), None);
    }

    #[test]
    fn test_replace_moves_to_mru_and_reports() {
        let mut c = cache(3);
        assert!(!c.put("a".into(), "1".into()));
        c.put("b".into(), "2".into());
        c.put("c".into(), "3".into());

        // Replacing "a" re-inserts it at the freshest position.
        assert!(c.put("a".into(), "1b".into()));
        assert_eq!(c.len(), 3);
        assert_eq!(c.get(&"a".into()), Some(&"1b".to_string()));
        assert_eq!(keys_lru_to_mru(&c), ["b", "c", "a"]);
        check_consistency(&c);
    }

    #[test]
    fn test_replace_at_capacity_does_not_evict() {
        let mut c = cache(2);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());

        assert!(c.put("a".into(), "1b".into()));
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&"b".into()), Some(&"2".to_string()));
    }

    #[test]
    fn test_remove() {
        let mut c = cache(3);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());
        c.put("c".into(), "3".into());

        assert_eq!(c.remove(&"b".into()), Some("2".to_string()));
        assert_eq!(c.remove(&"b".into()), None);
        assert_eq!(c.len(), 2);
        assert_eq!(keys_lru_to_mru(&c), ["a", "c"]);
        check_consistency(&c);
    }

    #[test]
    fn test_remove_head_tail_and_single() {
        let mut c = cache(3);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());
        c.put("c".into(), "3".into());

        // Head (LRU end).
        c.remove(&"a".into());
        assert_eq!(keys_lru_to_mru(&c), ["b", "c"]);
        check_consistency(&c);

        // Tail (MRU end).
        c.remove(&"c".into());
        assert_eq!(keys_lru_to_mru(&c), ["b"]);
        check_consistency(&c);

        // Single node: head and tail at once.
        c.remove(&"b".into());
        assert!(c.is_empty());
        assert_eq!(keys_lru_to_mru(&c), Vec::<String>::new());
        check_consistency(&c);
    }

    #[test]
    fn test_iter_is_restartable_and_lazy() {
        let mut c = cache(3);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());

        let first: Vec<_> = c.iter().map(|(k, _)| k.clone()).collect();
        let second: Vec<_> = c.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(first, second);

        // Partial traversal leaves the cache intact.
        let mut it = c.iter();
        assert_eq!(it.next().map(|(k, _)| k.as_str()), Some("a"));
        drop(it);
        assert_eq!(c.len(), 2);

        let empty = cache(3);
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn test_capacity_bound_under_churn() {
        let mut c = cache(4);
        for i in 0..64 {
            c.put(format!("host-{i}.com"), format!("v{i}"));
            assert!(c.len() <= c.capacity());
        }
        assert_eq!(keys_lru_to_mru(&c).len(), 4);
        check_consistency(&c);
    }

    #[test]
    fn test_clear() {
        let mut c = cache(2);
        c.put("a".into(), "1".into());
        c.clear();

        assert!(c.is_empty());
        assert_eq!(c.get(&"a".into()), None);
        assert_eq!(c.capacity(), 2);

        c.put("b".into(), "2".into());
        assert_eq!(c.len(), 1);
        check_consistency(&c);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Get(u8),
            Put(u8, u8),
            Remove(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..16u8).prop_map(Op::Get),
                (0..16u8, any::<u8>()).prop_map(|(k, v)| Op::Put(k, v)),
                (0..16u8).prop_map(Op::Remove),
            ]
        }

        /// Reference model: entries ordered least to most recently used.
        fn apply_model(model: &mut Vec<(String, String)>, op: &Op, cap: usize, touch: bool) {
            match op {
                Op::Get(k) => {
                    let key = format!("k{k}");
                    if touch {
                        if let Some(pos) = model.iter().position(|(mk, _)| *mk == key) {
                            let entry = model.remove(pos);
                            model.push(entry);
                        }
                    }
                }
                Op::Put(k, v) => {
                    let key = format!("k{k}");
                    model.retain(|(mk, _)| *mk != key);
                    model.push((key, format!("v{v}")));
                    if model.len() > cap {
                        model.remove(0);
                    }
                }
                Op::Remove(k) => {
                    let key = format!("k{k}");
                    model.retain(|(mk, _)| *mk != key);
                }
            }
        }

        fn run_against_model(ops: Vec<Op>, cap: usize, touch: bool) {
            let mut cache: LruCache<String, String> = LruCache::new(cap, touch).unwrap();
            let mut model: Vec<(String, String)> = Vec::new();

            for op in &ops {
                match op {
                    Op::Get(k) => {
                        let key = format!("k{k}");
                        let expected = model
                            .iter()
                            .find(|(mk, _)| *mk == key)
                            .map(|(_, mv)| mv.clone());
                        assert_eq!(cache.get(&key).cloned(), expected);
                    }
                    Op::Put(k, v) => {
                        let key = format!("k{k}");
                        let expected_replaced = model.iter().any(|(mk, _)| *mk == key);
                        assert_eq!(cache.put(key, format!("v{v}")), expected_replaced);
                    }
                    Op::Remove(k) => {
                        let key = format!("k{k}");
                        let expected = model
                            .iter()
                            .find(|(mk, _)| *mk == key)
                            .map(|(_, mv)| mv.clone());
                        assert_eq!(cache.remove(&key), expected);
                    }
                }
                apply_model(&mut model, op, cap, touch);

                assert!(cache.len() <= cache.capacity());
                let got: Vec<(String, String)> = cache
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                assert_eq!(got, model, "recency order diverged after {op:?}");
                check_consistency(&cache);
            }
        }

        proptest! {
            /// The cache tracks a straightforward reference model exactly,
            /// with and without touch-on-get.
            #[test]
            fn prop_matches_reference_model(
                ops in proptest::collection::vec(op_strategy(), 0..80),
                cap in 1..6usize,
                touch in any::<bool>(),
            ) {
                run_against_model(ops, cap, touch);
            }
        }
    }
}
