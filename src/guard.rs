use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One in-flight flag per endpoint, index-aligned with the endpoint list.
#[derive(Debug)]
pub struct InFlightGuard {
    flags: Box<[AtomicBool]>,
}

impl InFlightGuard {
    pub fn new(len: usize) -> Self {
        Self {
            flags: (0..len).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// Atomically flips the flag from clear to set. Returns `false` when a
    /// probe for `index` is already outstanding (or the index is unknown).
    pub fn try_acquire(&self, index: usize) -> bool {
        self.flags.get(index).is_some_and(|flag| {
            flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }

    pub fn release(&self, index: usize) {
        if let Some(flag) = self.flags.get(index) {
            flag.store(false, Ordering::Release);
        }
    }

    pub fn is_held(&self, index: usize) -> bool {
        self.flags
            .get(index)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Like [`try_acquire`](Self::try_acquire), but the flag is cleared when
    /// the returned lease is dropped, including on unwind.
    pub fn lease(self: &Arc<Self>, index: usize) -> Option<InFlightLease> {
        self.try_acquire(index).then(|| InFlightLease {
            guard: Arc::clone(self),
            index,
        })
    }
}

#[derive(Debug)]
pub struct InFlightLease {
    guard: Arc<InFlightGuard>,
    index: usize,
}

impl Drop for InFlightLease {
    fn drop(&mut self) {
        self.guard.release(self.index);
    }
}
