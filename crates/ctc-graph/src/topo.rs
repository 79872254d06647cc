// CTC topologies.
//
// A topology maps raw frame-level token sequences (blanks and repeats
// included) to collapsed token sequences. Input labels are raw tokens, where
// 0 is blank; auxiliary labels are the emitted tokens, where 0 is epsilon.

use std::fmt;
use std::str::FromStr;

use ctc_fsa::{Arc, FINAL_LABEL, Fsa, Label, StateId, arc_sort};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GraphError;

/// Blank token on the input side of a topology.
pub const BLANK: Label = 0;

/// No-output marker on the auxiliary side of a topology.
pub const EPSILON: Label = ctc_fsa::EPSILON;

/// Which topology construction to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// Quadratic topology: one state per token, fully connected.
    Normal,
    /// Linear topology: a shared blank state plus one state per token.
    #[default]
    Modified,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopologyKind::Normal => "normal",
            TopologyKind::Modified => "modified",
        })
    }
}

impl FromStr for TopologyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TopologyKind::Normal),
            "modified" => Ok(TopologyKind::Modified),
            other => Err(format!(
                "unknown topology {other:?} (expected \"normal\" or \"modified\")"
            )),
        }
    }
}

/// Build the topology of the given kind over `tokens` (which must contain 0).
pub fn build_topo(kind: TopologyKind, tokens: &[Label]) -> Result<Fsa, GraphError> {
    let topo = match kind {
        TopologyKind::Normal => build_ctc_topo(tokens)?,
        TopologyKind::Modified => build_ctc_topo_modified(tokens)?,
    };
    debug!(
        %kind,
        tokens = tokens.len(),
        states = topo.num_states(),
        arcs = topo.num_arcs(),
        "built CTC topology"
    );
    Ok(topo)
}

/// Quadratic CTC topology.
///
/// State `i` stands for `tokens[i]`; state `n` is final. Each state has a
/// self-loop reading its token with no output, an arc to every other state
/// `j` reading and emitting `tokens[j]`, and a final arc: `n * n + n` arcs.
pub fn build_ctc_topo(tokens: &[Label]) -> Result<Fsa, GraphError> {
    if !tokens.contains(&BLANK) {
        return Err(GraphError::MissingBlank);
    }

    let n = tokens.len();
    let final_state = n as StateId;
    let mut arcs = Vec::with_capacity(n * n + n);
    let mut aux = Vec::with_capacity(n * n + n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                arcs.push(Arc::new(i as StateId, i as StateId, tokens[i], 0.0));
                aux.push(EPSILON);
            } else {
                arcs.push(Arc::new(i as StateId, j as StateId, tokens[j], 0.0));
                aux.push(tokens[j]);
            }
        }
        arcs.push(Arc::new(i as StateId, final_state, FINAL_LABEL, 0.0));
        aux.push(FINAL_LABEL);
    }

    let topo = Fsa::new(n + 1, arcs, Some(aux))?;
    Ok(arc_sort(&topo))
}

/// Linear CTC topology.
///
/// Blank is removed from `tokens`, leaving `n` tokens. State 0 is the start
/// and blank state, states `1..=n` belong to one token each, state `n + 1`
/// is final. Moving between two different tokens always passes through the
/// start state. `4 * n + 2` arcs.
pub fn build_ctc_topo_modified(tokens: &[Label]) -> Result<Fsa, GraphError> {
    if !tokens.contains(&BLANK) {
        return Err(GraphError::MissingBlank);
    }

    let phones: Vec<Label> = tokens.iter().copied().filter(|&t| t != BLANK).collect();
    let n = phones.len();
    let start: StateId = 0;
    let final_state = n as StateId + 1;

    // (src, dest, label, aux)
    let mut arcs: Vec<(StateId, StateId, Label, Label)> = Vec::with_capacity(4 * n + 2);
    arcs.push((start, start, BLANK, EPSILON));
    arcs.push((start, final_state, FINAL_LABEL, FINAL_LABEL));
    for (i, &p) in phones.iter().enumerate() {
        let state = i as StateId + 1;
        arcs.push((start, start, p, p));
        arcs.push((start, state, p, p));
        arcs.push((state, state, p, EPSILON));
        arcs.push((state, start, p, EPSILON));
    }
    arcs.sort_by_key(|&(src, ..)| src);

    let (arcs, aux): (Vec<Arc>, Vec<Label>) = arcs
        .into_iter()
        .map(|(src, dest, label, aux)| (Arc::new(src, dest, label, 0.0), aux))
        .unzip();
    let topo = Fsa::new(n + 2, arcs, Some(aux))?;
    Ok(arc_sort(&topo))
}

/// Collapse a raw token sequence: merge immediate repeats, then drop blanks.
pub fn collapse(tokens: &[Label]) -> Vec<Label> {
    let mut out = Vec::new();
    let mut previous = None;
    for &token in tokens {
        if previous != Some(token) && token != BLANK {
            out.push(token);
        }
        previous = Some(token);
    }
    out
}
