//! Run-wide source of connection innovation numbers.
//!
//! The ledger is owned by whatever drives the run and handed by reference to
//! bootstrap and to the structural mutation operators. Issuance is atomic, so
//! a shared `&InnovationLedger` can be used from several threads.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use log::trace;

use crate::genome::{Innovation, NodeId};

/// Monotonic innovation counter with a per-generation memo of the edge
/// topologies already numbered.
#[derive(Debug, Default)]
pub struct InnovationLedger {
    next: AtomicU64,
    generation: Mutex<HashMap<(NodeId, NodeId), Innovation>>,
}

impl InnovationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: Innovation) -> Self {
        Self {
            next: AtomicU64::new(first),
            generation: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh innovation number.
    pub fn next(&self) -> Innovation {
        let innovation = self.next.fetch_add(1, Ordering::SeqCst);
        trace!("issued innovation {}", innovation);
        innovation
    }

    /// The number the next call to [`InnovationLedger::next`] will return.
    pub fn peek(&self) -> Innovation {
        self.next.load(Ordering::SeqCst)
    }

    /// Reserve `0..count` for the initial population. The counter never
    /// moves backwards; it is raised to `count` if it sits below it.
    pub fn reserve_baseline(&self, count: Innovation) -> Range<Innovation> {
        let previous = self.next.fetch_max(count, Ordering::SeqCst);
        trace!("baseline 0..{} reserved (counter was {})", count, previous);
        0..count
    }

    /// Innovation for the edge `input -> output` introduced in the current
    /// generation. Repeated requests for one topology within a generation
    /// return the same number.
    pub fn innovation_for(&self, input: NodeId, output: NodeId) -> Innovation {
        let mut seen = self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *seen
            .entry((input, output))
            .or_insert_with(|| self.next())
    }

    /// Forget this generation's topologies. Later requests for the same edge
    /// receive a new number.
    pub fn end_generation(&self) {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
