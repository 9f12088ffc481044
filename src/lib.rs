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

//! Learned L2 forwarding state for a software switch.
//!
//! The slow path learns which port each (mac, vlan) talks from and
//! caches decisions downstream. This crate keeps those bindings in a
//! fixed-size table with idle aging and hands out tags that let the
//! downstream caches find stale decisions without scanning the table.

pub mod common;
pub mod config;
pub mod learning;
pub mod revalidate;
mod utils;

pub use common::{Timer, Timestamp};
pub use config::{ConfigError, MacLearningConfig};
pub use learning::{EntryId, MacEntry, MacLearning};
pub use revalidate::{run_maintenance, Revalidate};
