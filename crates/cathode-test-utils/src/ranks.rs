//! A mock process group whose ranks are threads.
//!
//! [`ThreadGroup::new`] hands out one [`MockRank`] per rank. Move each
//! into its own thread; `all_sum` then behaves like a blocking,
//! symmetric all-reduce, summing contributions in rank order so every
//! rank sees the bit-identical total.

use std::sync::{Arc, Barrier, Mutex};

use cathode_core::Collective;

struct Shared {
    slots: Mutex<Vec<f64>>,
    barrier: Barrier,
}

/// Factory for a group of [`MockRank`]s.
pub struct ThreadGroup;

impl ThreadGroup {
    /// Create `size` connected ranks, rank `k` at index `k`.
    pub fn new(size: usize) -> Vec<MockRank> {
        let shared = Arc::new(Shared {
            slots: Mutex::new(vec![0.0; size]),
            barrier: Barrier::new(size),
        });
        (0..size)
            .map(|rank| MockRank {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

/// One rank of a [`ThreadGroup`].
pub struct MockRank {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl Collective for MockRank {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_sum(&self, local: f64) -> f64 {
        self.shared.slots.lock().unwrap()[self.rank] = local;
        self.shared.barrier.wait();
        let total = self.shared.slots.lock().unwrap().iter().sum();
        // Nobody may overwrite a slot until every rank has read.
        self.shared.barrier.wait();
        total
    }
}
