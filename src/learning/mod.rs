mod entry;
pub mod table;

pub use entry::{EntryId, MacEntry};
pub use table::{Entries, LearningCounter, MacLearning};

use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 2048;
pub const DEFAULT_IDLE_TIME: Duration = Duration::from_secs(60);
pub const DEFAULT_GRAT_ARP_LOCK_TIME: Duration = Duration::from_secs(5);
