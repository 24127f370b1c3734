// SPDX-License-Identifier: MPL-2.0
//! Bounded image cache for map tiles and remote photos.
//!
//! # Design
//!
//! - **LRU eviction**: least recently inserted or touched images go first
//! - **Count-bounded**: capacity is a number of images, not bytes; tiles
//!   and photos are decoded lazily by the renderer
//! - **In-flight tracking**: a key is fetched at most once concurrently
//! - **Failure memory**: keys that failed are not retried until
//!   [`ImageCache::forget_failures`]

use iced::widget::image::Handle;
use lru::LruCache;
use std::collections::HashSet;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// LRU cache of image handles keyed by `K` (a tile id or a photo URL).
pub struct ImageCache<K: Hash + Eq + Clone> {
    cache: LruCache<K, Handle>,
    in_flight: HashSet<K>,
    failed: HashSet<K>,
}

impl<K: Hash + Eq + Clone> ImageCache<K> {
    /// Creates a cache holding at most `capacity` images (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            in_flight: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    /// Returns the cached handle without touching LRU order.
    ///
    /// Views only get `&self`, so rendering never reorders the cache.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&Handle> {
        self.cache.peek(key)
    }

    /// Marks `key` as being fetched.
    ///
    /// Returns `false` when the image is already cached, already being
    /// fetched, or failed before; callers only start a fetch on `true`.
    pub fn begin_fetch(&mut self, key: &K) -> bool {
        if self.cache.contains(key) || self.in_flight.contains(key) || self.failed.contains(key) {
            // Keep visible images warm.
            self.cache.promote(key);
            return false;
        }
        self.in_flight.insert(key.clone());
        true
    }

    /// Records a finished fetch.
    pub fn finish_fetch(&mut self, key: K, image: Option<Handle>) {
        self.in_flight.remove(&key);
        match image {
            Some(handle) => {
                self.cache.put(key, handle);
            }
            None => {
                self.failed.insert(key);
            }
        }
    }

    /// Allows previously failed keys to be fetched again.
    pub fn forget_failures(&mut self) {
        self.failed.clear();
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.in_flight.clear();
        self.failed.clear();
    }
}

impl<K: Hash + Eq + Clone> std::fmt::Debug for ImageCache<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .field("in_flight", &self.in_flight.len())
            .field("failed", &self.failed.len())
            .finish()
    }
}
