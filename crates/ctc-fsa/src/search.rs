// Acceptance test and shortest path.

use crate::arc::{Label, StateId};
use crate::fsa::Fsa;

/// A start-to-final path, without its closing `-1` arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub labels: Vec<Label>,
    /// Auxiliary labels along the path, if the FSA has them.
    pub aux_labels: Option<Vec<Label>>,
    pub weight: f32,
}

impl Fsa {
    /// Whether some start-to-final path reads exactly `labels` on the
    /// primary side.
    ///
    /// Every label, including `0`, is matched literally: on the input side of
    /// a CTC graph `0` is the blank symbol, not epsilon.
    pub fn accepts(&self, labels: &[Label]) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut current: Vec<StateId> = vec![0];
        let mut seen = vec![false; self.num_states()];
        for &label in labels {
            let mut next = Vec::new();
            for &state in &current {
                for arc in self.arcs_of(state) {
                    if arc.label == label && !arc.is_final() && !seen[arc.dest as usize] {
                        seen[arc.dest as usize] = true;
                        next.push(arc.dest);
                    }
                }
            }
            for &state in &next {
                seen[state as usize] = false;
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current
            .iter()
            .any(|&state| self.arcs_of(state).iter().any(|arc| arc.is_final()))
    }

    /// Minimum-weight start-to-final path.
    ///
    /// Bellman-Ford relaxation in arc order, so zero-weight cycles are fine
    /// and ties keep the path found first. Returns `None` for an FSA without
    /// an accepting path, or when a negative cycle makes the path ill-defined.
    pub fn shortest_path(&self) -> Option<Path> {
        let final_state = self.final_state()?;
        let n = self.num_states();
        let mut dist = vec![f32::INFINITY; n];
        let mut via: Vec<Option<usize>> = vec![None; n];
        dist[0] = 0.0;

        for _ in 0..n {
            let mut changed = false;
            for (i, arc) in self.arcs().iter().enumerate() {
                let candidate = dist[arc.src as usize] + arc.weight;
                if candidate < dist[arc.dest as usize] {
                    dist[arc.dest as usize] = candidate;
                    via[arc.dest as usize] = Some(i);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let mut arc_indices = Vec::new();
        let mut state = final_state;
        while state != 0 {
            let index = via[state as usize]?;
            if arc_indices.len() > n {
                return None;
            }
            arc_indices.push(index);
            state = self.arcs()[index].src;
        }
        arc_indices.reverse();
        // Drop the closing -1 arc.
        arc_indices.pop();

        let labels = arc_indices.iter().map(|&i| self.arcs()[i].label).collect();
        let aux_labels = self
            .aux_labels()
            .map(|aux| arc_indices.iter().map(|&i| aux[i]).collect());
        Some(Path {
            labels,
            aux_labels,
            weight: dist[final_state as usize],
        })
    }
}
