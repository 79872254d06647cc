//! Finite state acceptor engine for CTC graph construction.
//!
//! Acceptors follow the k2 conventions: state `0` is the start state, the last
//! state is the unique final state, and the only arcs entering the final state
//! carry the label `-1`. An acceptor may carry a second (auxiliary) label
//! column, which turns it into a transducer.
//!
//! # Architecture
//!
//! - [`arc`] -- Arc record and label constants
//! - [`fsa`] -- The validated `Fsa` container and its per-state arc index
//! - [`text`] -- Line-oriented text format (parse and display)
//! - [`algo`] -- Unary algorithms: arc-sort, invert, connect, linear acceptors
//! - [`product`] -- Binary algorithms: intersect and compose
//! - [`search`] -- Acceptance test and shortest path

pub mod algo;
pub mod arc;
pub mod fsa;
pub mod product;
pub mod search;
pub mod text;

pub use algo::{arc_sort, connect, invert, linear_acceptor, linear_fsa};
pub use arc::{Arc, EPSILON, FINAL_LABEL, Label, StateId};
pub use fsa::Fsa;
pub use product::{compose, intersect};
pub use search::Path;

/// Error type for FSA construction, parsing and algebra.
#[derive(Debug, thiserror::Error)]
pub enum FsaError {
    #[error("an FSA must have either zero states or at least two, got 1")]
    SingleState,
    #[error("arc {index} is out of order: source state {src} follows {previous}")]
    ArcsNotSorted {
        index: usize,
        src: StateId,
        previous: StateId,
    },
    #[error("arc {index} refers to state {state}, but the FSA has {num_states} states")]
    StateOutOfRange {
        index: usize,
        state: StateId,
        num_states: usize,
    },
    #[error("arc {index} leaves the final state")]
    ArcLeavesFinal { index: usize },
    #[error("arc {index}: label -1 must be used exactly on arcs entering the final state")]
    InvalidFinalArc { index: usize },
    #[error("arc {index} has invalid label {label}")]
    InvalidLabel { index: usize, label: Label },
    #[error("auxiliary label count mismatch: expected {expected}, got {actual}")]
    AuxLengthMismatch { expected: usize, actual: usize },
    #[error("cannot allocate an FSA with {num_states} states")]
    TooManyStates { num_states: usize },
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("left operand of compose has no auxiliary labels")]
    NotATransducer,
}
