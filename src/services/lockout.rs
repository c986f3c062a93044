use crate::config::DEFAULT_BLOCK_THRESHOLD;
use dashmap::DashMap;
use std::net::IpAddr;

/// Failed-login counter per remote address.
///
/// Counts are never reset: a successful login from the same address leaves the
/// counter where it was, and every failure at or above the threshold asks for a block.
#[derive(Debug)]
pub struct LockoutTracker {
    failures: DashMap<IpAddr, u32>,
    threshold: u32,
}

impl LockoutTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: DashMap::new(),
            threshold,
        }
    }

    /// Record one failure and return the new count for `addr`.
    pub fn record_failure(&self, addr: IpAddr) -> u32 {
        let mut count = self.failures.entry(addr).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn should_block(&self, count: u32) -> bool {
        count >= self.threshold
    }

    /// Number of distinct addresses with at least one recorded failure.
    pub fn blocked_address_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures_for(&self, addr: IpAddr) -> u32 {
        self.failures.get(&addr).map(|c| *c).unwrap_or(0)
    }
}

impl Default for LockoutTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_THRESHOLD)
    }
}
