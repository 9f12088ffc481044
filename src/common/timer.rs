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

use super::Timestamp;

/// A one-shot deadline for driving periodic maintenance.
///
/// Holds the instant a caller should next run housekeeping, or nothing
/// at all. The caller supplies `now` on every check, so the timer works
/// with whatever clock the rest of the pipeline uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Timestamp>,
}

impl Timer {
    pub fn infinite() -> Self {
        Self { deadline: None }
    }

    pub fn at(deadline: Timestamp) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    // fires on the first check, whatever the clock reads
    pub fn expired() -> Self {
        Self::at(Timestamp::ZERO)
    }

    pub fn set_at(&mut self, deadline: Timestamp) {
        self.deadline = Some(deadline);
    }

    pub fn set_after(&mut self, duration: Duration, now: Timestamp) {
        self.deadline = Some(now + duration);
    }

    pub fn set_infinite(&mut self) {
        self.deadline = None;
    }

    pub fn set_expired(&mut self) {
        self.deadline = Some(Timestamp::ZERO);
    }

    pub fn is_infinite(&self) -> bool {
        self.deadline.is_none()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    pub fn expired_at(&self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

impl From<Option<Timestamp>> for Timer {
    fn from(deadline: Option<Timestamp>) -> Self {
        Self { deadline }
    }
}
