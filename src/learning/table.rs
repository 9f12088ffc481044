/*
 * Copyright (c) 2024 Yunshan Networks
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::time::Duration;

use log::{debug, info};

use public::bitmap::Bitmap;
use public::tag::{Tag, TagSet};
use public::utils::net::MacAddr;

use super::entry::{mac_vlan_key, EntryId, MacEntry};
use super::{DEFAULT_CAPACITY, DEFAULT_GRAT_ARP_LOCK_TIME, DEFAULT_IDLE_TIME};
use crate::common::{Timestamp, VLAN_ID_MAX};
use crate::config::{ConfigError, MacLearningConfig};
use crate::utils::hasher::jenkins64;

// list terminator, also marks unlinked slots
const NIL: u32 = u32::MAX;

struct Slot<P> {
    entry: MacEntry<P>,
    prev: u32,
    next: u32,
    // bumped whenever the slot starts a new binding, so handles to the
    // previous occupant stop resolving
    generation: u32,
    in_use: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LearningCounter {
    pub learned: u64,
    pub relearned: u64,
    pub evicted: u64,
    pub expired: u64,
    pub flushed: u64,
}

/// Learned L2 forwarding table for the switching slow path.
///
/// Maps (mac, vlan) to the port the address was last seen on. All
/// entries live in a fixed arena, so a full table reclaims the least
/// recently refreshed binding instead of growing. Entries age out
/// after a fixed idle time.
///
/// Not thread safe. The table is meant to be owned by the single
/// thread that handles table misses. Each mutating call takes `now`
/// so the owner's clock drives aging.
pub struct MacLearning<P> {
    slots: Vec<Slot<P>>,
    free: Vec<u32>,
    buckets: Vec<Vec<u32>>,
    // intrusive list in refresh order, head is the oldest entry.
    // every refresh writes expires = now + idle_time with a fixed
    // idle_time, so list order is also expiry order.
    lru_head: u32,
    lru_tail: u32,
    secret: u64,
    tag_seq: u64,
    idle_time: Timestamp,
    grat_arp_lock_time: Timestamp,
    flood_vlans: Bitmap,
    counter: LearningCounter,
}

impl<P: Copy> Default for MacLearning<P> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<P: Copy> MacLearning<P> {
    /// Panics if `capacity` is zero or too large for 32 bit slot
    /// indices.
    pub fn new(capacity: usize) -> Self {
        Self::with_settings(
            capacity,
            DEFAULT_IDLE_TIME,
            DEFAULT_GRAT_ARP_LOCK_TIME,
            Bitmap::new(VLAN_ID_MAX as usize),
        )
    }

    pub fn with_config(config: &MacLearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_settings(
            config.capacity,
            config.idle_time,
            config.grat_arp_lock_time,
            config.flood_vlans()?,
        ))
    }

    fn with_settings(
        capacity: usize,
        idle_time: Duration,
        grat_arp_lock_time: Duration,
        flood_vlans: Bitmap,
    ) -> Self {
        assert!(
            capacity > 0 && capacity < NIL as usize,
            "capacity out of range"
        );
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot {
                entry: MacEntry::vacant(),
                prev: NIL,
                next: NIL,
                generation: 0,
                in_use: false,
            });
        }
        Self {
            slots,
            free: (0..capacity as u32).rev().collect(),
            buckets: vec![Vec::new(); (capacity / 2).next_power_of_two()],
            lru_head: NIL,
            lru_tail: NIL,
            secret: rand::random(),
            tag_seq: 0,
            idle_time: idle_time.into(),
            grat_arp_lock_time: grat_arp_lock_time.into(),
            flood_vlans,
            counter: LearningCounter::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn counter(&self) -> LearningCounter {
        self.counter
    }

    /// Whether learning is worthwhile for a source address at all:
    /// multicast sources are never learned, and neither are addresses
    /// on VLANs configured to always flood.
    pub fn may_learn(&self, mac: MacAddr, vlan: u16) -> bool {
        mac.is_unicast() && !self.flood_vlans.is_set(vlan as usize)
    }

    /// Finds the live entry for (mac, vlan). Aging is left to [`run`],
    /// so an expired entry that has not been swept yet is still found.
    ///
    /// Returns the handle and the tag cached decisions must record.
    /// The tag is `None` while the binding has never changed.
    ///
    /// [`run`]: Self::run
    pub fn lookup(&self, mac: MacAddr, vlan: u16) -> Option<(EntryId, Option<Tag>)> {
        self.find(mac, vlan)
            .map(|idx| (self.id_of(idx), self.slots[idx as usize].entry.tag))
    }

    /// Learns or refreshes the entry for (mac, vlan) and returns its
    /// handle. The entry's expiry moves `idle_time` past `now` and the
    /// entry becomes the newest in refresh order, on every call.
    ///
    /// A miss on a full table reclaims the oldest entry. Callers are
    /// expected to have checked [`may_learn`] first.
    ///
    /// [`may_learn`]: Self::may_learn
    pub fn insert(&mut self, mac: MacAddr, vlan: u16, now: Timestamp) -> EntryId {
        let idx = match self.find(mac, vlan) {
            Some(idx) => {
                self.counter.relearned += 1;
                self.lru_unlink(idx);
                idx
            }
            None => {
                let idx = match self.free.pop() {
                    Some(idx) => idx,
                    None => self.evict_oldest(),
                };
                let bucket = self.bucket_of(mac_vlan_key(mac, vlan));
                let slot = &mut self.slots[idx as usize];
                slot.entry.rebind(mac, vlan);
                slot.generation = slot.generation.wrapping_add(1);
                slot.in_use = true;
                self.buckets[bucket].push(idx);
                self.counter.learned += 1;
                debug!("learned {} on vlan {}", mac, vlan);
                idx
            }
        };
        self.slots[idx as usize].entry.expires = now + self.idle_time;
        self.lru_push_back(idx);
        self.id_of(idx)
    }

    /// Marks the binding as changed and returns the fresh tag that
    /// decisions computed from now on must record. The tag previously
    /// held by the entry keeps identifying the decisions that are now
    /// stale; callers invalidating a port move must collect it before
    /// calling this.
    ///
    /// Returns `None` when the handle no longer points at a live entry.
    pub fn changed(&mut self, id: EntryId) -> Option<Tag> {
        let idx = self.slot_of(id)?;
        let tag = self.next_tag();
        let entry = &mut self.slots[idx].entry;
        entry.tag = Some(tag);
        debug!("binding {} vlan {} changed, tag {}", entry.mac, entry.vlan, tag);
        Some(tag)
    }

    pub fn entry(&self, id: EntryId) -> Option<&MacEntry<P>> {
        self.slot_of(id).map(|idx| &self.slots[idx].entry)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut MacEntry<P>> {
        let idx = self.slot_of(id)?;
        Some(&mut self.slots[idx].entry)
    }

    /// How long ago the entry was last refreshed.
    pub fn entry_age(&self, id: EntryId, now: Timestamp) -> Option<Duration> {
        self.entry(id).map(|e| {
            let remaining = e.expires.saturating_sub(now);
            Duration::from(self.idle_time.saturating_sub(remaining))
        })
    }

    /// Pins the binding against port moves until `grat_arp_lock_time`
    /// past `now`. Callers consult [`MacEntry::is_grat_arp_locked`]
    /// before accepting a move.
    pub fn set_grat_arp_lock(&mut self, id: EntryId, now: Timestamp) {
        let lock = now + self.grat_arp_lock_time;
        if let Some(idx) = self.slot_of(id) {
            self.slots[idx].entry.grat_arp_lock = lock;
        }
    }

    /// Drops the entry immediately. No tag is collected; callers that
    /// need downstream invalidation collect the entry's tag first.
    pub fn expire(&mut self, id: EntryId) {
        if let Some(idx) = self.slot_of(id) {
            self.release(idx as u32);
            self.counter.expired += 1;
        }
    }

    /// Sweeps entries whose expiry has passed, oldest first, unioning
    /// the tag of every reclaimed entry into `tags` for downstream
    /// revalidation. Stops at the first entry still alive.
    pub fn run(&mut self, now: Timestamp, tags: &mut TagSet) {
        let mut expired = 0u64;
        while self.lru_head != NIL {
            let entry = &self.slots[self.lru_head as usize].entry;
            if entry.expires > now {
                break;
            }
            if let Some(tag) = entry.tag {
                tags.add(tag);
            }
            self.release(self.lru_head);
            expired += 1;
        }
        if expired > 0 {
            self.counter.expired += expired;
            debug!("expired {} learned entries", expired);
        }
    }

    /// The instant [`run`] next has work to do, `None` on an empty
    /// table. Advisory: learning traffic may move it closer.
    ///
    /// [`run`]: Self::run
    pub fn wait(&self) -> Option<Timestamp> {
        if self.lru_head == NIL {
            None
        } else {
            Some(self.slots[self.lru_head as usize].entry.expires)
        }
    }

    /// Empties the table without collecting tags. Meant for teardown
    /// and for reconfigurations where the caller revalidates everything
    /// anyway.
    pub fn flush(&mut self) {
        let mut flushed = 0u64;
        while self.lru_head != NIL {
            self.release(self.lru_head);
            flushed += 1;
        }
        if flushed > 0 {
            self.counter.flushed += flushed;
            debug!("flushed {} learned entries", flushed);
        }
    }

    /// Replaces the set of VLANs excluded from learning. Returns true
    /// if the set actually changed, in which case the caller should
    /// revalidate all cached decisions.
    pub fn set_flood_vlans(&mut self, flood_vlans: Bitmap) -> bool {
        if self.flood_vlans == flood_vlans {
            return false;
        }
        info!("flood vlan set changed, {} vlans flooded", flood_vlans.count());
        self.flood_vlans = flood_vlans;
        true
    }

    /// Visits live entries in refresh order, oldest first.
    pub fn iter(&self) -> Entries<'_, P> {
        Entries {
            table: self,
            cursor: self.lru_head,
        }
    }

    fn bucket_of(&self, key: u64) -> usize {
        (jenkins64(key ^ self.secret) & (self.buckets.len() as u64 - 1)) as usize
    }

    fn find(&self, mac: MacAddr, vlan: u16) -> Option<u32> {
        let key = mac_vlan_key(mac, vlan);
        self.buckets[self.bucket_of(key)]
            .iter()
            .copied()
            .find(|&idx| self.slots[idx as usize].entry.key() == key)
    }

    fn id_of(&self, idx: u32) -> EntryId {
        EntryId {
            index: idx,
            generation: self.slots[idx as usize].generation,
        }
    }

    // resolves a handle to its slot, None once the binding is gone,
    // even if the slot already carries a newer one
    fn slot_of(&self, id: EntryId) -> Option<usize> {
        let idx = id.index as usize;
        let slot = &self.slots[idx];
        if slot.in_use && slot.generation == id.generation {
            Some(idx)
        } else {
            None
        }
    }

    // jenkins64 is invertible, so the sequence cannot hand out the
    // same tag twice before wrapping. at most one counter value maps
    // to zero and is skipped.
    fn next_tag(&mut self) -> Tag {
        loop {
            self.tag_seq = self.tag_seq.wrapping_add(1);
            if let Some(tag) = Tag::new(jenkins64(self.secret ^ self.tag_seq)) {
                return tag;
            }
        }
    }

    // reclaims the oldest entry and returns its slot for reuse,
    // leaving it out of the free list
    fn evict_oldest(&mut self) -> u32 {
        let idx = self.lru_head;
        debug_assert_ne!(idx, NIL);
        let entry = &self.slots[idx as usize].entry;
        debug!("table full, dropping {} on vlan {}", entry.mac, entry.vlan);
        self.counter.evicted += 1;
        self.unindex(idx);
        self.lru_unlink(idx);
        idx
    }

    fn release(&mut self, idx: u32) {
        self.unindex(idx);
        self.lru_unlink(idx);
        self.slots[idx as usize].in_use = false;
        self.free.push(idx);
    }

    fn unindex(&mut self, idx: u32) {
        let bucket = self.bucket_of(self.slots[idx as usize].entry.key());
        let chain = &mut self.buckets[bucket];
        if let Some(pos) = chain.iter().position(|&i| i == idx) {
            chain.swap_remove(pos);
        }
    }

    fn lru_unlink(&mut self, idx: u32) {
        debug_assert!(self.lru_head == idx || self.slots[idx as usize].prev != NIL);
        let (prev, next) = {
            let slot = &self.slots[idx as usize];
            (slot.prev, slot.next)
        };
        if prev == NIL {
            self.lru_head = next;
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == NIL {
            self.lru_tail = prev;
        } else {
            self.slots[next as usize].prev = prev;
        }
        let slot = &mut self.slots[idx as usize];
        slot.prev = NIL;
        slot.next = NIL;
    }

    fn lru_push_back(&mut self, idx: u32) {
        let tail = self.lru_tail;
        let slot = &mut self.slots[idx as usize];
        slot.prev = tail;
        slot.next = NIL;
        if tail == NIL {
            self.lru_head = idx;
        } else {
            self.slots[tail as usize].next = idx;
        }
        self.lru_tail = idx;
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let mut linked = 0;
        let mut prev = NIL;
        let mut cursor = self.lru_head;
        while cursor != NIL {
            let slot = &self.slots[cursor as usize];
            assert!(slot.in_use);
            assert_eq!(slot.prev, prev);
            if prev != NIL {
                assert!(self.slots[prev as usize].entry.expires <= slot.entry.expires);
            }
            prev = cursor;
            cursor = slot.next;
            linked += 1;
            assert!(linked <= self.slots.len());
        }
        assert_eq!(self.lru_tail, prev);
        assert_eq!(linked + self.free.len(), self.slots.len());

        let indexed: usize = self.buckets.iter().map(|b| b.len()).sum();
        assert_eq!(indexed, linked);
        for (i, slot) in self.slots.iter().enumerate() {
            if !slot.in_use {
                continue;
            }
            let chain = &self.buckets[self.bucket_of(slot.entry.key())];
            assert_eq!(chain.iter().filter(|&&idx| idx == i as u32).count(), 1);
        }
        for &idx in self.free.iter() {
            assert!(!self.slots[idx as usize].in_use);
        }
    }
}

pub struct Entries<'a, P> {
    table: &'a MacLearning<P>,
    cursor: u32,
}

impl<'a, P: Copy> Iterator for Entries<'a, P> {
    type Item = (EntryId, &'a MacEntry<P>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let idx = self.cursor;
        let slot = &self.table.slots[idx as usize];
        self.cursor = slot.next;
        Some((self.table.id_of(idx), &slot.entry))
    }
}
