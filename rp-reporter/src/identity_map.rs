// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mapping between local nodes and remote report items.

use chrono::{DateTime, Utc};
use iddqd::{BiHashItem, BiHashMap, bi_upcast};
use rp_reporter_metadata::{ItemHandle, ItemType};
use std::{fmt, hash::Hash};

/// Whether the start call for a report item has completed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HandleState {
    /// The start call was issued but has not completed yet.
    Pending,

    /// The start call completed successfully.
    Resolved,
}

/// A report item started for a local node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ItemRecord<K> {
    /// The local key.
    pub key: K,

    /// The handle returned by the client's start call.
    pub handle: ItemHandle,

    /// The type of the report item.
    pub item_type: ItemType,

    /// The time at which the item was started.
    pub started_at: DateTime<Utc>,

    /// Whether the start call has completed.
    pub state: HandleState,
}

impl<K: Eq + Hash> BiHashItem for ItemRecord<K> {
    type K1<'a>
        = &'a K
    where
        Self: 'a;
    type K2<'a>
        = &'a ItemHandle
    where
        Self: 'a;

    fn key1(&self) -> Self::K1<'_> {
        &self.key
    }

    fn key2(&self) -> Self::K2<'_> {
        &self.handle
    }

    bi_upcast!();
}

/// Associates local node keys with remote item handles, for the duration of a
/// single run.
///
/// Records are reachable by key and by handle. A record is added when the
/// start call for its node is issued, and removed once the finish call has
/// been issued.
pub struct IdentityMap<K: Eq + Hash> {
    records: BiHashMap<ItemRecord<K>>,
}

impl<K: Eq + Hash> fmt::Debug for IdentityMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityMap")
            .field("len", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl<K: Eq + Hash> Default for IdentityMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> IdentityMap<K> {
    /// Creates a new, empty identity map.
    pub fn new() -> Self {
        Self {
            records: BiHashMap::new(),
        }
    }

    /// Registers a pending handle for `key`.
    ///
    /// Returns the records this replaced, if `key` or `handle` were already
    /// registered.
    pub fn register(
        &mut self,
        key: K,
        handle: ItemHandle,
        item_type: ItemType,
        started_at: DateTime<Utc>,
    ) -> Vec<ItemRecord<K>> {
        self.records.insert_overwrite(ItemRecord {
            key,
            handle,
            item_type,
            started_at,
            state: HandleState::Pending,
        })
    }

    /// Returns the record for `key`.
    pub fn get(&self, key: &K) -> Option<&ItemRecord<K>> {
        self.records.get1(key)
    }

    /// Returns the handle for `key`.
    pub fn handle(&self, key: &K) -> Option<&ItemHandle> {
        self.get(key).map(|record| &record.handle)
    }

    /// Returns the key a handle was registered under.
    pub fn key_for(&self, handle: &ItemHandle) -> Option<&K> {
        self.records.get2(handle).map(|record| &record.key)
    }

    /// Marks the handle for `key` as resolved.
    ///
    /// Returns false if `key` is not registered.
    pub fn mark_resolved(&mut self, key: &K) -> bool {
        match self.records.get1_mut(key) {
            Some(mut record) => {
                record.state = HandleState::Resolved;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the record for `key`.
    pub fn remove(&mut self, key: &K) -> Option<ItemRecord<K>> {
        self.records.remove1(key)
    }

    /// Returns the number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the registered records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord<K>> + '_ {
        self.records.iter()
    }
}
