use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Numeric identifier of a generic product; the leading field of a
/// composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Source of line-item uids for encoded carts.
///
/// Values only need to be unique within one encoding session; callers that
/// share a generator across threads rely on `next` taking `&self`.
pub trait IdGenerator: Send + Sync {
    fn next(&self) -> u64;
}

/// Monotonic counter backed by an atomic, safe to share between concurrent
/// translations.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Counter whose first uid is 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Start again from 0. Only meaningful between sessions.
    pub fn reset(&self) {
        self.next.store(0, Ordering::SeqCst);
    }
}

impl IdGenerator for SequentialIds {
    fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Hands out product ids during one catalog build, skipping ids that items
/// claimed explicitly in the catalog file.
#[derive(Debug)]
pub(crate) struct PidAllocator {
    next: u32,
    reserved: BTreeSet<u32>,
}

impl PidAllocator {
    pub(crate) fn new(reserved: BTreeSet<u32>) -> Self {
        Self { next: 0, reserved }
    }

    pub(crate) fn allocate(&mut self) -> ProductId {
        while self.reserved.contains(&self.next) {
            self.next += 1;
        }
        let pid = self.next;
        self.next += 1;
        ProductId(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique_and_resettable() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next(), 0);
        assert_eq!(ids.next(), 1);
        ids.reset();
        assert_eq!(ids.next(), 0);
    }

    #[test]
    fn allocator_skips_reserved_ids() {
        let mut alloc = PidAllocator::new([0, 2].into_iter().collect());
        assert_eq!(alloc.allocate(), ProductId(1));
        assert_eq!(alloc.allocate(), ProductId(3));
        assert_eq!(alloc.allocate(), ProductId(4));
    }
}
