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

use public::tag::Tag;
use public::utils::net::MacAddr;

use crate::common::Timestamp;

// low 48 bits mac, next 16 bits vlan
pub(crate) fn mac_vlan_key(mac: MacAddr, vlan: u16) -> u64 {
    u64::from(mac) | (vlan as u64) << 48
}

/// Stable handle to one binding in a [`MacLearning`] table.
///
/// A handle names the binding, not its slot: it stays valid while the
/// binding lives (relearns included) and goes stale when the binding is
/// expired, evicted, or flushed. The generation makes resolving a stale
/// handle safe even after the slot is reused, so accessors return
/// `None` and mutators do nothing instead of touching the new occupant.
///
/// [`MacLearning`]: super::MacLearning
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// One learned (mac, vlan) -> port binding.
#[derive(Clone, Debug)]
pub struct MacEntry<P> {
    pub(crate) mac: MacAddr,
    pub(crate) vlan: u16,
    pub(crate) port: Option<P>,
    pub(crate) tag: Option<Tag>,
    pub(crate) expires: Timestamp,
    pub(crate) grat_arp_lock: Timestamp,
}

impl<P: Copy> MacEntry<P> {
    pub(crate) fn vacant() -> Self {
        Self {
            mac: MacAddr::ZERO,
            vlan: 0,
            port: None,
            tag: None,
            expires: Timestamp::ZERO,
            grat_arp_lock: Timestamp::ZERO,
        }
    }

    // rebind a reclaimed slot, caller refreshes expiry
    pub(crate) fn rebind(&mut self, mac: MacAddr, vlan: u16) {
        self.mac = mac;
        self.vlan = vlan;
        self.port = None;
        self.tag = None;
        self.grat_arp_lock = Timestamp::ZERO;
    }

    pub(crate) fn key(&self) -> u64 {
        mac_vlan_key(self.mac, self.vlan)
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn vlan(&self) -> u16 {
        self.vlan
    }

    pub fn port(&self) -> Option<P> {
        self.port
    }

    pub fn set_port(&mut self, port: P) {
        self.port = Some(port);
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// True until the first `changed()` call hands the binding a tag,
    /// i.e. no cached decision depends on it yet.
    pub fn is_new(&self) -> bool {
        self.tag.is_none()
    }

    pub fn expires(&self) -> Timestamp {
        self.expires
    }

    /// True while port moves for this binding should be ignored because
    /// a gratuitous ARP recently pinned it in place.
    pub fn is_grat_arp_locked(&self, now: Timestamp) -> bool {
        now < self.grat_arp_lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacant_and_rebind() {
        let mut e: MacEntry<u32> = MacEntry::vacant();
        assert!(e.is_new());
        assert_eq!(e.port(), None);

        let mac: MacAddr = "52:54:00:12:34:56".parse().unwrap();
        e.rebind(mac, 7);
        e.set_port(3);
        assert_eq!(e.mac(), mac);
        assert_eq!(e.vlan(), 7);
        assert_eq!(e.port(), Some(3));
        assert_eq!(e.key(), u64::from(mac) | 7u64 << 48);

        e.tag = public::tag::Tag::new(1);
        assert!(!e.is_new());
        e.rebind(mac, 8);
        assert!(e.is_new());
        assert_eq!(e.port(), None);
        assert!(!e.is_grat_arp_locked(Timestamp::ZERO));
    }

    #[test]
    fn grat_arp_lock_window() {
        let mut e: MacEntry<u32> = MacEntry::vacant();
        assert!(!e.is_grat_arp_locked(Timestamp::ZERO));
        assert!(!e.is_grat_arp_locked(Timestamp::from_secs(100)));

        e.grat_arp_lock = Timestamp::from_secs(15);
        assert!(e.is_grat_arp_locked(Timestamp::from_secs(14)));
        assert!(!e.is_grat_arp_locked(Timestamp::from_secs(15)));
        assert!(!e.is_grat_arp_locked(Timestamp::from_secs(16)));
    }
}
