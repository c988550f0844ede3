//! Orchestrator phase transitions.
//!
//! A run moves `Initializing -> Iterating(0) -> ... -> Iterating(n-1) -> Reporting`.
//! The transition out of `Iterating` depends only on the position in the
//! registry, never on the verdict just produced.

use crate::core::types::TestVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clearing artifacts and loading the registry.
    Initializing,
    /// About to test the component at `next`.
    Iterating { next: usize },
    /// Terminal: print the summary and compute the exit status.
    Reporting,
}

/// Phase entered once initialization succeeded.
pub fn after_init(component_count: usize) -> Phase {
    if component_count == 0 {
        Phase::Reporting
    } else {
        Phase::Iterating { next: 0 }
    }
}

/// Phase entered after component `index` produced `verdict`.
///
/// Pass or fail, the loop continues.
pub fn after_verdict(index: usize, component_count: usize, _verdict: &TestVerdict) -> Phase {
    let next = index + 1;
    if next < component_count {
        Phase::Iterating { next }
    } else {
        Phase::Reporting
    }
}
