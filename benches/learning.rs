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

use std::time::{Duration, Instant};

use criterion::*;
use lru::LruCache;
use rand::prelude::*;

use public::tag::TagSet;
use public::utils::net::MacAddr;
use vswitch_core::learning::DEFAULT_IDLE_TIME;
use vswitch_core::{MacLearning, Timestamp};

const TABLE_CAPACITY: usize = 2048;

fn mac(n: u64) -> MacAddr {
    MacAddr::try_from(n & 0xffff_ffff_ffff).unwrap()
}

fn table_ops(c: &mut Criterion) {
    c.bench_function("learn-miss", |b| {
        b.iter_custom(|iters| {
            let mut seeds = vec![];
            for i in 0..iters {
                seeds.push(mac(i));
            }
            let mut table: MacLearning<u32> = MacLearning::new(TABLE_CAPACITY);
            let now = Timestamp::from_secs(1);
            let start = Instant::now();
            for m in seeds {
                table.insert(m, 0, now);
            }
            start.elapsed()
        })
    });

    c.bench_function("learn-touch-hot", |b| {
        b.iter_custom(|iters| {
            let hot: Vec<MacAddr> = (0..256).map(mac).collect();
            let mut table: MacLearning<u32> = MacLearning::new(TABLE_CAPACITY);
            let now = Timestamp::from_secs(1);
            for &m in hot.iter() {
                table.insert(m, 0, now);
            }
            let start = Instant::now();
            for i in 0..iters {
                table.insert(hot[(i % 256) as usize], 0, now);
            }
            start.elapsed()
        })
    });

    c.bench_function("lookup-randomly", |b| {
        b.iter_custom(|iters| {
            let mut rng = thread_rng();
            let mut table: MacLearning<u32> = MacLearning::new(TABLE_CAPACITY);
            let now = Timestamp::from_secs(1);
            for i in 0..TABLE_CAPACITY as u64 {
                table.insert(mac(i), 0, now);
            }
            let mut probes = vec![];
            for _ in 0..iters {
                probes.push(mac(rng.gen_range(0..TABLE_CAPACITY as u64)));
            }
            let start = Instant::now();
            for m in probes {
                let _ = table.lookup(m, 0);
            }
            start.elapsed()
        })
    });

    c.bench_function("sweep-expired", |b| {
        b.iter_custom(|iters| {
            let mut elapsed = Duration::ZERO;
            let mut remaining = iters;
            let mut tags = TagSet::new();
            while remaining > 0 {
                let batch = remaining.min(TABLE_CAPACITY as u64);
                let mut table: MacLearning<u32> = MacLearning::new(TABLE_CAPACITY);
                let t0 = Timestamp::from_secs(1);
                for i in 0..batch {
                    let id = table.insert(mac(i), 0, t0);
                    table.changed(id);
                }
                let start = Instant::now();
                table.run(t0 + DEFAULT_IDLE_TIME, &mut tags);
                elapsed += start.elapsed();
                tags.clear();
                remaining -= batch;
            }
            elapsed
        })
    });
}

// same workloads against the lru crate for a reference point
fn lru_baseline(c: &mut Criterion) {
    c.bench_function("lru-baseline-insert", |b| {
        b.iter_custom(|iters| {
            let mut cache = LruCache::new(TABLE_CAPACITY.try_into().unwrap());
            let start = Instant::now();
            for i in 0..iters {
                cache.put(i, 0u32);
            }
            start.elapsed()
        })
    });

    c.bench_function("lru-baseline-get-randomly", |b| {
        b.iter_custom(|iters| {
            let mut rng = thread_rng();
            let mut cache = LruCache::new(TABLE_CAPACITY.try_into().unwrap());
            for i in 0..TABLE_CAPACITY as u64 {
                cache.put(i, 0u32);
            }
            let mut probes = vec![];
            for _ in 0..iters {
                probes.push(rng.gen_range(0..TABLE_CAPACITY as u64));
            }
            let start = Instant::now();
            for key in probes.iter() {
                let _ = cache.get(key);
            }
            start.elapsed()
        })
    });
}

criterion_group!(benches, table_ops, lru_baseline);
criterion_main!(benches);
