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

use std::fmt;
use std::num::NonZeroU64;

use ahash::AHashSet;

/// An opaque invalidation token attached to cached decisions.
///
/// Consumers record the tag handed out with a binding and later match
/// it against a [`TagSet`] to find decisions that must be recomputed.
/// Zero is reserved as "no tag", so a tag value is always non-zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(NonZeroU64);

impl Tag {
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Tag)
    }

    pub fn as_u64(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:#x})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A set of tags pending revalidation.
#[derive(Clone, Debug, Default)]
pub struct TagSet(AHashSet<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    // returns true if the tag was not in the set
    pub fn add(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn union(&mut self, other: &TagSet) {
        for &tag in other.0.iter() {
            self.0.insert(tag);
        }
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }

    /// True when any tag attached to `decision_tag` is in the set.
    /// `None` (untagged decision) never matches.
    pub fn matches(&self, decision_tag: Option<Tag>) -> bool {
        decision_tag.map_or(false, |t| self.0.contains(&t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        TagSet(iter.into_iter().collect())
    }
}
