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

use public::tag::TagSet;

use crate::common::Timestamp;
use crate::learning::MacLearning;

/// A downstream cache of forwarding decisions keyed by invalidation
/// tags.
///
/// Every decision computed from a learned binding records the tag the
/// table returned with that binding (from `lookup` or `changed`). When
/// bindings die or move, their tags are collected into a [`TagSet`]
/// and handed to the consumer, which drops or recomputes the matching
/// decisions. A port move contributes the entry's previous tag, read
/// before `changed` replaces it.
pub trait Revalidate {
    /// Recomputes or discards every cached decision whose recorded tag
    /// is in `tags`.
    fn revalidate(&mut self, tags: &TagSet);

    /// Discards or recomputes all cached decisions regardless of tags,
    /// for reconfigurations such as a flood VLAN change.
    fn revalidate_all(&mut self);
}

/// One maintenance pass: sweeps expired bindings and feeds the tags of
/// the reclaimed ones to `consumer`. Returns the next instant the
/// caller should come back, `None` while the table is empty.
pub fn run_maintenance<P: Copy, R: Revalidate + ?Sized>(
    table: &mut MacLearning<P>,
    consumer: &mut R,
    now: Timestamp,
) -> Option<Timestamp> {
    let mut tags = TagSet::new();
    table.run(now, &mut tags);
    if !tags.is_empty() {
        consumer.revalidate(&tags);
    }
    table.wait()
}
