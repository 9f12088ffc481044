/*
 * Copyright (c) 2022 Yunshan Networks
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

use std::ops::{Bound, RangeBounds, RangeInclusive};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    IndexOutOfBound,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Bitmap(Vec<u64>);

impl Bitmap {
    pub fn new(max_pos: usize) -> Self {
        Bitmap(vec![0; (max_pos / 64) + 1])
    }

    // Parses a comma separated list of values and inclusive ranges,
    // for example "10,20,100-200". Returns None if any piece fails to
    // parse or falls outside [0, max_pos]. Empty pieces are ignored,
    // so "" yields an empty bitmap.
    pub fn from_range_list(s: &str, max_pos: usize) -> Option<Self> {
        let mut bitmap = Self::new(max_pos);
        for piece in s.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            match piece.split_once('-') {
                Some((start, end)) => {
                    let start = start.trim().parse::<usize>().ok()?;
                    let end = end.trim().parse::<usize>().ok()?;
                    if start > end || end > max_pos {
                        return None;
                    }
                    bitmap.set_range(start..=end, true).ok()?;
                }
                None => {
                    let pos = piece.parse::<usize>().ok()?;
                    if pos > max_pos {
                        return None;
                    }
                    bitmap.set(pos, true).ok()?;
                }
            }
        }
        Some(bitmap)
    }

    // if success, return old value
    pub fn set(&mut self, pos: usize, val: bool) -> Result<bool, Error> {
        if pos > self.get_max_pos() {
            return Err(Error::IndexOutOfBound);
        }

        let (idx, bit) = self.get_idx_pos(pos);
        let old = self.0[idx] & (1 << bit) != 0;
        if val {
            self.0[idx] |= 1 << bit;
        } else {
            self.0[idx] &= !(1 << bit);
        }
        Ok(old)
    }

    pub fn set_range<R: RangeBounds<usize>>(&mut self, range: R, val: bool) -> Result<(), Error> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start + 1,
            Bound::Unbounded => 0,
        };

        let end = match range.end_bound() {
            Bound::Included(&end) => end,
            Bound::Excluded(&end) if end == 0 => return Ok(()),
            Bound::Excluded(&end) => end - 1,
            Bound::Unbounded => self.get_max_pos(),
        };
        if start > end {
            return Ok(());
        }
        if end > self.get_max_pos() {
            return Err(Error::IndexOutOfBound);
        }

        let (start_idx, start_bit) = self.get_idx_pos(start);
        let (end_idx, end_bit) = self.get_idx_pos(end);

        if start_idx == end_idx {
            self.mask_word(start_idx, start_bit..=end_bit, val);
            return Ok(());
        }

        self.mask_word(start_idx, start_bit..=63, val);
        let v = if val { u64::MAX } else { 0 };
        for i in start_idx + 1..end_idx {
            self.0[i] = v;
        }
        self.mask_word(end_idx, 0..=end_bit, val);
        Ok(())
    }

    pub fn get(&self, pos: usize) -> Result<bool, Error> {
        if pos > self.get_max_pos() {
            return Err(Error::IndexOutOfBound);
        }
        let (idx, bit) = self.get_idx_pos(pos);
        Ok(self.0[idx] & (1 << bit) != 0)
    }

    // out of range positions read as unset
    pub fn is_set(&self, pos: usize) -> bool {
        self.get(pos).unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    // max_pos equal to ((max/64)+1)*64-1, not equal the max, where max is new() first param.
    fn get_max_pos(&self) -> usize {
        self.0.len() * 64 - 1
    }

    // return vec index and word bit
    fn get_idx_pos(&self, pos: usize) -> (usize, usize) {
        (pos / 64, pos % 64)
    }

    // bit_range must in [0, 63]
    fn mask_word(&mut self, idx: usize, bit_range: RangeInclusive<usize>, val: bool) {
        let (start, end) = (*bit_range.start(), *bit_range.end());
        let mask = (u64::MAX >> (63 - end)) & (u64::MAX << start);
        if val {
            self.0[idx] |= mask;
        } else {
            self.0[idx] &= !mask;
        }
    }
}
