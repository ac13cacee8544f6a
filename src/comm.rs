//! Distributed-runtime seam: collective reductions across ranks.
//!
//! A rank is one participant in a domain-decomposed computation, running the
//! identical program over its local mesh partition. The only synchronization
//! primitive this crate uses is the blocking collective sum: every rank must
//! call [`Communicator::sum`] the same number of times, in the same order.
//!
//! Two implementations are provided:
//!
//! - [`SerialComm`]: the degenerate world of one rank.
//! - [`ThreadComm`]: a fixed-size in-process cluster, one handle per thread,
//!   reducing through a shared slot array behind a two-phase barrier. This is
//!   the harness used to exercise the multi-rank consensus protocol without an
//!   MPI launcher.

use std::sync::{Arc, Barrier, Mutex};

/// Collective-communication interface.
///
/// `sum` is a blocking collective: it returns the global sum of every rank's
/// contribution, and no rank proceeds past it until all ranks have called it.
pub trait Communicator: Send + Sync {
    /// This rank's id, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of ranks in the communicator.
    fn size(&self) -> usize;

    /// Blocking collective sum of one scalar per rank.
    fn sum(&self, local: f64) -> f64;
}

/// Single-rank communicator: every collective is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl SerialComm {
    pub fn new() -> Self {
        Self
    }
}

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum(&self, local: f64) -> f64 {
        local
    }
}

/// Shared state of an in-process rank cluster.
struct ClusterState {
    barrier: Barrier,
    slots: Mutex<Vec<f64>>,
}

/// One rank's handle into an in-process cluster of threads.
///
/// Created in a batch by [`ThreadComm::cluster`]; each handle is moved onto its
/// own thread. The reduction is two-phase: all ranks deposit into their slot and
/// wait, all ranks read the total and wait again. The second barrier keeps a
/// fast rank from starting the next collective while a slow one is still
/// reading, so back-to-back collectives never tear.
pub struct ThreadComm {
    state: Arc<ClusterState>,
    rank: usize,
    size: usize,
}

impl ThreadComm {
    /// Create the handles for a cluster of `size` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn cluster(size: usize) -> Vec<ThreadComm> {
        assert!(size > 0, "cluster requires at least one rank");
        let state = Arc::new(ClusterState {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![0.0; size]),
        });
        (0..size)
            .map(|rank| ThreadComm {
                state: Arc::clone(&state),
                rank,
                size,
            })
            .collect()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sum(&self, local: f64) -> f64 {
        {
            let mut slots = self.state.slots.lock().unwrap();
            slots[self.rank] = local;
        }
        self.state.barrier.wait();
        let total: f64 = self.state.slots.lock().unwrap().iter().sum();
        self.state.barrier.wait();
        total
    }
}
