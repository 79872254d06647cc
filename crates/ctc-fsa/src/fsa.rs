// The Fsa container: arcs grouped by source state plus an optional
// auxiliary label column.

use std::ops::Range;

use crate::arc::{Arc, FINAL_LABEL, Label, StateId, sort_key};
use crate::FsaError;

/// A weighted finite state acceptor, optionally with auxiliary labels.
///
/// Either empty (zero states) or has at least two states, with state `0` as
/// start and `num_states - 1` as final. Arcs are stored grouped by ascending
/// source state; `row_splits[s]..row_splits[s + 1]` indexes the arcs of `s`.
#[derive(Clone, PartialEq)]
pub struct Fsa {
    num_states: usize,
    arcs: Vec<Arc>,
    aux_labels: Option<Vec<Label>>,
    row_splits: Vec<usize>,
    arc_sorted: bool,
}

impl std::fmt::Debug for Fsa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fsa")
            .field("num_states", &self.num_states)
            .field("num_arcs", &self.arcs.len())
            .field("has_aux_labels", &self.aux_labels.is_some())
            .field("arc_sorted", &self.arc_sorted)
            .finish()
    }
}

impl Fsa {
    /// The empty acceptor: no states, accepts nothing.
    pub fn empty() -> Self {
        Self {
            num_states: 0,
            arcs: Vec::new(),
            aux_labels: None,
            row_splits: vec![0],
            arc_sorted: true,
        }
    }

    /// Build a validated FSA from its arcs.
    ///
    /// `arcs` must already be grouped by ascending source state. Within a
    /// state the order is kept as given; use [`arc_sort`](crate::arc_sort)
    /// to order by label.
    pub fn new(
        num_states: usize,
        arcs: Vec<Arc>,
        aux_labels: Option<Vec<Label>>,
    ) -> Result<Self, FsaError> {
        validate(num_states, &arcs, aux_labels.as_deref())?;
        if num_states == 0 {
            return Ok(Self::empty());
        }
        let mut splits = Vec::new();
        splits
            .try_reserve_exact(num_states.saturating_add(1))
            .map_err(|_| FsaError::TooManyStates { num_states })?;
        Ok(Self::assemble(num_states, arcs, aux_labels, splits))
    }

    /// Assemble an FSA whose invariants the caller already guarantees.
    pub(crate) fn from_parts(
        num_states: usize,
        arcs: Vec<Arc>,
        aux_labels: Option<Vec<Label>>,
    ) -> Self {
        debug_assert!(validate(num_states, &arcs, aux_labels.as_deref()).is_ok());
        if num_states == 0 {
            return Self::empty();
        }
        let splits = Vec::with_capacity(num_states + 1);
        Self::assemble(num_states, arcs, aux_labels, splits)
    }

    fn assemble(
        num_states: usize,
        arcs: Vec<Arc>,
        aux_labels: Option<Vec<Label>>,
        mut row_splits: Vec<usize>,
    ) -> Self {
        fill_row_splits(&mut row_splits, num_states, &arcs);
        let arc_sorted = labels_sorted(&arcs, &row_splits);
        Self {
            num_states,
            arcs,
            aux_labels,
            row_splits,
            arc_sorted,
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_states == 0
    }

    /// The final state, or `None` for the empty FSA.
    pub fn final_state(&self) -> Option<StateId> {
        self.num_states.checked_sub(1).map(|s| s as StateId)
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn aux_labels(&self) -> Option<&[Label]> {
        self.aux_labels.as_deref()
    }

    pub fn has_aux_labels(&self) -> bool {
        self.aux_labels.is_some()
    }

    /// Auxiliary label of arc `index`, if this FSA has an auxiliary column.
    #[inline]
    pub fn aux_label(&self, index: usize) -> Option<Label> {
        self.aux_labels.as_ref().map(|aux| aux[index])
    }

    /// Index range (into [`arcs`](Self::arcs)) of the arcs leaving `state`.
    #[inline]
    pub fn arc_range(&self, state: StateId) -> Range<usize> {
        let s = state as usize;
        self.row_splits[s]..self.row_splits[s + 1]
    }

    /// Arcs leaving `state`.
    #[inline]
    pub fn arcs_of(&self, state: StateId) -> &[Arc] {
        &self.arcs[self.arc_range(state)]
    }

    /// Whether the arcs of every state are ordered by label (`-1` last).
    pub fn is_arc_sorted(&self) -> bool {
        self.arc_sorted
    }

    /// Decompose into `(num_states, arcs, aux_labels)`.
    pub fn into_parts(self) -> (usize, Vec<Arc>, Option<Vec<Label>>) {
        (self.num_states, self.arcs, self.aux_labels)
    }
}

fn validate(num_states: usize, arcs: &[Arc], aux: Option<&[Label]>) -> Result<(), FsaError> {
    if num_states == 1 {
        return Err(FsaError::SingleState);
    }
    if let Some(aux) = aux {
        if aux.len() != arcs.len() {
            return Err(FsaError::AuxLengthMismatch {
                expected: arcs.len(),
                actual: aux.len(),
            });
        }
    }

    let final_state = num_states.saturating_sub(1) as StateId;
    let mut previous: StateId = 0;
    for (index, arc) in arcs.iter().enumerate() {
        for state in [arc.src, arc.dest] {
            if state as usize >= num_states {
                return Err(FsaError::StateOutOfRange {
                    index,
                    state,
                    num_states,
                });
            }
        }
        if arc.src < previous {
            return Err(FsaError::ArcsNotSorted {
                index,
                src: arc.src,
                previous,
            });
        }
        previous = arc.src;

        if arc.src == final_state {
            return Err(FsaError::ArcLeavesFinal { index });
        }
        if arc.label < FINAL_LABEL {
            return Err(FsaError::InvalidLabel {
                index,
                label: arc.label,
            });
        }
        let enters_final = arc.dest == final_state;
        if enters_final != arc.is_final() {
            return Err(FsaError::InvalidFinalArc { index });
        }
        if let Some(aux) = aux {
            let label = aux[index];
            if label < FINAL_LABEL {
                return Err(FsaError::InvalidLabel { index, label });
            }
            if enters_final != (label == FINAL_LABEL) {
                return Err(FsaError::InvalidFinalArc { index });
            }
        }
    }
    Ok(())
}

/// Fill `splits` (empty, with room for `num_states + 1` entries).
fn fill_row_splits(splits: &mut Vec<usize>, num_states: usize, arcs: &[Arc]) {
    splits.resize(num_states + 1, 0);
    for arc in arcs {
        splits[arc.src as usize + 1] += 1;
    }
    for s in 0..num_states {
        splits[s + 1] += splits[s];
    }
}

fn labels_sorted(arcs: &[Arc], row_splits: &[usize]) -> bool {
    row_splits.windows(2).all(|w| {
        arcs[w[0]..w[1]]
            .windows(2)
            .all(|pair| sort_key(pair[0].label) <= sort_key(pair[1].label))
    })
}
