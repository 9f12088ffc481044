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

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use public::bitmap::Bitmap;

use crate::common::VLAN_ID_MAX;
use crate::learning::{DEFAULT_CAPACITY, DEFAULT_GRAT_ARP_LOCK_TIME, DEFAULT_IDLE_TIME};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml config invalid: {0}")]
    YamlConfigInvalid(String),
    #[error("capacity must be non-zero and fit a 32 bit index")]
    CapacityInvalid,
    #[error("idle-time must be non-zero")]
    IdleTimeInvalid,
    #[error("flood-vlans invalid: {0}")]
    FloodVlansInvalid(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct MacLearningConfig {
    pub capacity: usize,
    #[serde(with = "humantime_serde")]
    pub idle_time: Duration,
    #[serde(with = "humantime_serde")]
    pub grat_arp_lock_time: Duration,
    // comma separated vlan ids and inclusive ranges, e.g. "10,20,100-200"
    pub flood_vlans: String,
}

impl Default for MacLearningConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            idle_time: DEFAULT_IDLE_TIME,
            grat_arp_lock_time: DEFAULT_GRAT_ARP_LOCK_TIME,
            flood_vlans: String::new(),
        }
    }
}

impl MacLearningConfig {
    pub fn load_from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::YamlConfigInvalid(e.to_string()))?;
        Self::load(&contents)
    }

    pub fn load<C: AsRef<str>>(contents: C) -> Result<Self, ConfigError> {
        let contents = contents.as_ref();
        if contents.len() == 0 {
            // parsing empty string leads to EOF error
            Ok(Self::default())
        } else {
            let cfg: Self = serde_yaml::from_str(contents)
                .map_err(|e| ConfigError::YamlConfigInvalid(e.to_string()))?;
            cfg.validate()?;
            Ok(cfg)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity >= u32::MAX as usize {
            return Err(ConfigError::CapacityInvalid);
        }
        if self.idle_time.is_zero() {
            return Err(ConfigError::IdleTimeInvalid);
        }
        self.flood_vlans()?;
        Ok(())
    }

    pub fn flood_vlans(&self) -> Result<Bitmap, ConfigError> {
        Bitmap::from_range_list(&self.flood_vlans, VLAN_ID_MAX as usize)
            .ok_or_else(|| ConfigError::FloodVlansInvalid(self.flood_vlans.clone()))
    }
}
