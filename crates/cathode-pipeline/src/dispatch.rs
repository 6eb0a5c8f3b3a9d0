//! Contiguous partitioning and scoped fan-out/fan-in dispatch.
//!
//! # Partition
//!
//! With `nq = n / Q` whole quads and `P` pipelines, pipeline `p` owns
//! quads `[s(p), s(p+1))` where
//!
//! ```text
//! s(p) = floor((2 * nq * p + P) / (2 * P))
//! ```
//!
//! i.e. a rounded proportional split. The host owns the particle tail
//! `[Q * nq, n)`, which holds fewer than `Q` particles. Every particle is
//! covered exactly once and ranges are ordered by rank.
//!
//! # Execution
//!
//! Workers run on [`std::thread::scope`] threads and send their output
//! through a crossbeam channel tagged with their rank. The host computes
//! the tail after spawning and before joining, then joins every worker
//! and places each output in its rank's slot.

use std::ops::Range;

use cathode_core::DiagnosticError;
use tracing::{debug, warn};

use crate::config::{ConfigError, PipelineConfig};

/// Work a pipeline performs on its particle range.
pub trait PipelineKernel: Sync {
    /// Partial result of one range.
    type Output: Send;

    /// Process `range`. `rank` is the pipeline index, or the pipeline
    /// count for the host tail.
    fn run(&self, rank: usize, range: Range<usize>) -> Self::Output;
}

/// Particle range of `rank` when `n` particles in quads of `quad_width`
/// are split over `pipelines` workers. `rank == pipelines` is the host.
///
/// # Panics
///
/// Panics if `quad_width` or `pipelines` is zero, or `rank > pipelines`.
pub fn partition(n: usize, quad_width: usize, pipelines: usize, rank: usize) -> Range<usize> {
    assert!(quad_width > 0, "quad_width must be > 0");
    assert!(pipelines > 0, "pipelines must be > 0");
    assert!(rank <= pipelines, "rank {rank} exceeds pipeline count {pipelines}");
    let nq = n / quad_width;
    if rank == pipelines {
        return quad_width * nq..n;
    }
    let start = quad_start(nq, pipelines, rank);
    let end = quad_start(nq, pipelines, rank + 1);
    quad_width * start..quad_width * end
}

fn quad_start(nq: usize, pipelines: usize, p: usize) -> usize {
    let (nq, pipelines, p) = (nq as u128, pipelines as u128, p as u128);
    ((2 * nq * p + pipelines) / (2 * pipelines)) as usize
}

/// A fixed set of pipeline workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pipelines {
    workers: usize,
    quad_width: usize,
}

impl Pipelines {
    /// Resolve a validated configuration.
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            workers: config.resolved_worker_count(),
            quad_width: config.quad_width,
        })
    }

    /// Number of worker pipelines (the host is not counted).
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Particles per quad.
    pub fn quad_width(&self) -> usize {
        self.quad_width
    }

    /// Run `kernel` over `n` particles.
    ///
    /// Returns `workers() + 1` outputs in rank order, the host tail last.
    ///
    /// # Errors
    ///
    /// [`DiagnosticError::WorkerPanicked`] naming the lowest rank whose
    /// worker panicked. All workers are joined first.
    pub fn dispatch<K: PipelineKernel>(
        &self,
        n: usize,
        kernel: &K,
    ) -> Result<Vec<K::Output>, DiagnosticError> {
        let p = self.workers;
        let q = self.quad_width;
        debug!(n, pipelines = p, quad_width = q, "dispatching pipelines");

        let (tx, rx) = crossbeam_channel::bounded::<(usize, K::Output)>(p);
        let (tail, panicked) = std::thread::scope(|s| {
            let handles: Vec<_> = (0..p)
                .map(|rank| {
                    let tx = tx.clone();
                    let range = partition(n, q, p, rank);
                    s.spawn(move || {
                        let out = kernel.run(rank, range);
                        // The receiver outlives the scope.
                        let _ = tx.send((rank, out));
                    })
                })
                .collect();
            drop(tx);

            let tail = kernel.run(p, partition(n, q, p, p));

            let panicked: Vec<usize> = handles
                .into_iter()
                .enumerate()
                .filter_map(|(rank, h)| h.join().is_err().then_some(rank))
                .collect();
            (tail, panicked)
        });

        if let Some(&rank) = panicked.first() {
            warn!(rank, failed = panicked.len(), "pipeline worker panicked");
            return Err(DiagnosticError::WorkerPanicked { rank });
        }

        let mut slots: Vec<Option<K::Output>> = (0..p).map(|_| None).collect();
        for (rank, out) in rx.try_iter() {
            slots[rank] = Some(out);
        }
        let mut outputs = Vec::with_capacity(p + 1);
        for (rank, slot) in slots.into_iter().enumerate() {
            outputs.push(slot.ok_or(DiagnosticError::WorkerPanicked { rank })?);
        }
        outputs.push(tail);
        Ok(outputs)
    }
}
