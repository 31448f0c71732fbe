//! Bounded in-memory cache for generated images.
//!
//! Bridges the generate-then-retrieve-later access pattern: the
//! generation handler stores fresh bytes under a random id, and a later
//! request streams them back. Entries are immutable after store and can
//! be retrieved repeatedly until evicted.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// A stored generated image.
#[derive(Debug, Clone)]
pub struct CachedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Concurrent image store with insertion-order eviction.
///
/// Capacity is enforced on insert: once full, the oldest entry is
/// dropped. Readers and writers on distinct keys do not contend; the
/// order queue is only touched on insert.
pub struct ImageCache {
    entries: DashMap<Uuid, CachedImage>,
    order: Mutex<VecDeque<Uuid>>,
    capacity: usize,
}

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Store an image under a freshly minted id and return the id.
    pub fn store(&self, data: Vec<u8>, mime_type: String) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.insert(id, CachedImage { data, mime_type });

        let evicted: Vec<Uuid> = {
            let mut order = self.order.lock().expect("image cache order lock poisoned");
            order.push_back(id);
            let mut evicted = Vec::new();
            while order.len() > self.capacity {
                if let Some(oldest) = order.pop_front() {
                    evicted.push(oldest);
                }
            }
            evicted
        };

        for oldest in evicted {
            self.entries.remove(&oldest);
            tracing::debug!(image_id = %oldest, "Evicted image from cache");
        }

        id
    }

    /// Look up a stored image. `None` for ids never stored or already
    /// evicted.
    pub fn retrieve(&self, id: &Uuid) -> Option<CachedImage> {
        self.entries.get(id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn retrieve_returns_exactly_what_was_stored() {
        let cache = ImageCache::new(16);
        let data = vec![0u8, 1, 2, 255, 254];
        let id = cache.store(data.clone(), "image/png".to_string());

        let entry = cache.retrieve(&id).expect("entry should exist");
        assert_eq!(entry.data, data);
        assert_eq!(entry.mime_type, "image/png");

        // Retrieval is non-destructive.
        assert!(cache.retrieve(&id).is_some());
    }

    #[test]
    fn retrieve_of_unknown_id_is_none() {
        let cache = ImageCache::new(16);
        assert!(cache.retrieve(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn stores_mint_unique_ids() {
        let cache = ImageCache::new(20_000);
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            assert!(ids.insert(cache.store(vec![1], "image/png".to_string())));
        }
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let cache = ImageCache::new(2);
        let first = cache.store(vec![1], "image/png".to_string());
        let second = cache.store(vec![2], "image/png".to_string());
        let third = cache.store(vec![3], "image/png".to_string());

        assert!(cache.retrieve(&first).is_none());
        assert!(cache.retrieve(&second).is_some());
        assert!(cache.retrieve(&third).is_some());
        assert_eq!(cache.len(), 2);
    }
}
