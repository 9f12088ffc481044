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

// Jenkins Wiki: https://en.wikipedia.org/wiki/Jenkins_hash_function
// 32 bit variant: http://burtleburtle.net/bob/hash/integer.html
//
// Full avalanche and invertible on u64, so distinct inputs never collide.

pub fn jenkins64(mut hash: u64) -> u64 {
    hash = hash.wrapping_shl(21).wrapping_sub(hash).wrapping_sub(1);
    hash ^= hash.wrapping_shr(24);
    hash = hash
        .wrapping_add(hash.wrapping_shl(3))
        .wrapping_add(hash.wrapping_shl(8));
    hash ^= hash.wrapping_shr(14);
    hash = hash
        .wrapping_add(hash.wrapping_shl(2))
        .wrapping_add(hash.wrapping_shl(4));
    hash ^= hash.wrapping_shr(28);
    hash = hash.wrapping_add(hash.wrapping_shl(31));

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_jenkins64() {
        assert_eq!(
            jenkins64(1281291242888) ^ jenkins64(122345676892),
            17281198411619148719
        );
    }

    #[test]
    fn distinct_inputs_distinct_outputs() {
        let mut seen = std::collections::HashSet::new();
        for i in 0..10000u64 {
            assert!(seen.insert(jenkins64(i)));
        }
    }
}
