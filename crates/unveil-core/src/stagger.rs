//! Delay arithmetic for staggered groups

use serde::{Deserialize, Serialize};

/// Upper bound on a per-item delay
pub const PER_ITEM_DELAY_CAP_MS: u64 = 1000;

/// How children of a staggered list get revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaggerMode {
    /// One observation on the container reveals every child, each delayed by
    /// `base + index * step`
    #[default]
    Group,
    /// Every child is observed on its own with delay `min(base * index, cap)`
    PerItem,
}

/// Per-index delay schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaggerGroup {
    pub base_delay_ms: u64,
    pub step_delay_ms: u64,
    pub cap_ms: u64,
}

impl Default for StaggerGroup {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

impl StaggerGroup {
    pub fn new(base_delay_ms: u64, step_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            step_delay_ms,
            cap_ms: PER_ITEM_DELAY_CAP_MS,
        }
    }

    pub fn with_cap(mut self, cap_ms: u64) -> Self {
        self.cap_ms = cap_ms;
        self
    }

    /// `base + index * step`, saturating instead of overflowing
    pub fn group_delay(&self, index: usize) -> u64 {
        (index as u64)
            .saturating_mul(self.step_delay_ms)
            .saturating_add(self.base_delay_ms)
    }

    /// `min(base * index, cap)`
    pub fn per_item_delay(&self, index: usize) -> u64 {
        self.base_delay_ms.saturating_mul(index as u64).min(self.cap_ms)
    }

    pub fn delay(&self, mode: StaggerMode, index: usize) -> u64 {
        match mode {
            StaggerMode::Group => self.group_delay(index),
            StaggerMode::PerItem => self.per_item_delay(index),
        }
    }

    pub fn delays(&self, mode: StaggerMode, count: usize) -> Vec<u64> {
        (0..count).map(|i| self.delay(mode, i)).collect()
    }
}
