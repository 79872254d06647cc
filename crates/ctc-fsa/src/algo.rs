// Unary algorithms: arc-sort, invert, connect, linear acceptors.

use std::collections::VecDeque;

use crate::arc::{Arc, FINAL_LABEL, Label, StateId, sort_key};
use crate::fsa::Fsa;
use crate::FsaError;

/// Stable-sort the arcs of every state by label, `-1` last.
///
/// Already-sorted input is returned as an unchanged copy.
pub fn arc_sort(fsa: &Fsa) -> Fsa {
    if fsa.is_arc_sorted() {
        return fsa.clone();
    }

    let mut order: Vec<usize> = Vec::with_capacity(fsa.num_arcs());
    for state in 0..fsa.num_states() as StateId {
        let range = fsa.arc_range(state);
        let start = order.len();
        order.extend(range);
        order[start..].sort_by_key(|&i| sort_key(fsa.arcs()[i].label));
    }

    let arcs = order.iter().map(|&i| fsa.arcs()[i]).collect();
    let aux = fsa
        .aux_labels()
        .map(|aux| order.iter().map(|&i| aux[i]).collect());
    Fsa::from_parts(fsa.num_states(), arcs, aux)
}

/// Swap primary and auxiliary labels. An acceptor without an auxiliary
/// column is returned unchanged.
pub fn invert(fsa: &Fsa) -> Fsa {
    let Some(aux) = fsa.aux_labels() else {
        return fsa.clone();
    };
    let mut arcs = fsa.arcs().to_vec();
    let mut swapped = Vec::with_capacity(arcs.len());
    for (arc, &aux_label) in arcs.iter_mut().zip(aux) {
        swapped.push(arc.label);
        arc.label = aux_label;
    }
    Fsa::from_parts(fsa.num_states(), arcs, Some(swapped))
}

/// Keep only states that lie on some start-to-final path.
///
/// Surviving states keep their relative order, so the final state stays
/// last and per-state arc order (hence arc-sortedness) is preserved. Returns
/// the empty FSA when no start-to-final path exists.
pub fn connect(fsa: &Fsa) -> Fsa {
    let Some(final_state) = fsa.final_state() else {
        return Fsa::empty();
    };
    let n = fsa.num_states();

    let accessible = reachable(n, 0, |s| fsa.arcs_of(s).iter().map(|a| a.dest));

    let mut incoming: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for arc in fsa.arcs() {
        incoming[arc.dest as usize].push(arc.src);
    }
    let coaccessible = reachable(n, final_state, |s| incoming[s as usize].iter().copied());

    let keep: Vec<bool> = (0..n).map(|s| accessible[s] && coaccessible[s]).collect();
    if !keep[0] || !keep[final_state as usize] {
        return Fsa::empty();
    }

    let mut new_id = vec![StateId::MAX; n];
    let mut next: StateId = 0;
    for s in 0..n {
        if keep[s] {
            new_id[s] = next;
            next += 1;
        }
    }

    let mut arcs = Vec::with_capacity(fsa.num_arcs());
    let mut aux = fsa.aux_labels().map(|_| Vec::with_capacity(fsa.num_arcs()));
    for (i, arc) in fsa.arcs().iter().enumerate() {
        if keep[arc.src as usize] && keep[arc.dest as usize] {
            arcs.push(Arc::new(
                new_id[arc.src as usize],
                new_id[arc.dest as usize],
                arc.label,
                arc.weight,
            ));
            if let (Some(aux), Some(label)) = (aux.as_mut(), fsa.aux_label(i)) {
                aux.push(label);
            }
        }
    }
    Fsa::from_parts(next as usize, arcs, aux)
}

fn reachable<I, F>(num_states: usize, from: StateId, mut successors: F) -> Vec<bool>
where
    I: Iterator<Item = StateId>,
    F: FnMut(StateId) -> I,
{
    let mut seen = vec![false; num_states];
    let mut queue = VecDeque::new();
    seen[from as usize] = true;
    queue.push_back(from);
    while let Some(s) = queue.pop_front() {
        for next in successors(s) {
            if !seen[next as usize] {
                seen[next as usize] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Build a linear acceptor: one chain reading `labels` in order, then `-1`.
///
/// An empty label list yields the two-state acceptor of the empty sequence.
pub fn linear_acceptor(labels: &[Label]) -> Result<Fsa, FsaError> {
    let n = labels.len() as StateId;
    let mut arcs: Vec<Arc> = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| Arc::new(i as StateId, i as StateId + 1, label, 0.0))
        .collect();
    arcs.push(Arc::new(n, n + 1, FINAL_LABEL, 0.0));
    Fsa::new(labels.len() + 2, arcs, None)
}

/// Build one independent linear acceptor per label sequence.
pub fn linear_fsa<S: AsRef<[Label]>>(batch: &[S]) -> Result<Vec<Fsa>, FsaError> {
    batch.iter().map(|labels| linear_acceptor(labels.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_sort_orders_labels_within_states() {
        let text = "0 1 5 0\n0 2 -1 0\n0 1 2 0\n1 2 -1 0\n2";
        let fsa = Fsa::from_text(text, false).unwrap();
        assert!(!fsa.is_arc_sorted());
        let sorted = arc_sort(&fsa);
        assert!(sorted.is_arc_sorted());
        let labels: Vec<Label> = sorted.arcs_of(0).iter().map(|a| a.label).collect();
        assert_eq!(labels, vec![2, 5, FINAL_LABEL]);
    }

    #[test]
    fn arc_sort_moves_aux_labels_with_arcs() {
        let text = "0 0 4 40 0\n0 0 1 10 0\n0 1 -1 -1 0\n1";
        let sorted = arc_sort(&Fsa::from_text(text, true).unwrap());
        assert_eq!(sorted.aux_labels(), Some(&[10, 40, FINAL_LABEL][..]));
    }

    #[test]
    fn arc_sort_is_stable() {
        let text = "0 1 3 0.5\n0 0 3 0.25\n0 2 -1 0\n1 2 -1 0\n2";
        let sorted = arc_sort(&Fsa::from_text(text, false).unwrap());
        assert_eq!(sorted.arcs()[0].weight, 0.5);
        assert_eq!(sorted.arcs()[1].weight, 0.25);
    }

    #[test]
    fn arc_sort_idempotent() {
        let text = "0 1 9 0\n0 1 3 0\n1 2 -1 0\n2";
        let once = arc_sort(&Fsa::from_text(text, false).unwrap());
        let twice = arc_sort(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn invert_swaps_columns() {
        let text = "0 1 3 30 0\n1 2 -1 -1 0\n2";
        let inv = invert(&Fsa::from_text(text, true).unwrap());
        assert_eq!(inv.arcs()[0].label, 30);
        assert_eq!(inv.aux_labels(), Some(&[3, FINAL_LABEL][..]));
        assert_eq!(invert(&inv), Fsa::from_text(text, true).unwrap());
    }

    #[test]
    fn invert_acceptor_is_identity() {
        let fsa = linear_acceptor(&[1, 2]).unwrap();
        assert_eq!(invert(&fsa), fsa);
    }

    #[test]
    fn connect_prunes_dead_states() {
        // State 1 is a dead end, state 3 is unreachable.
        let text = "0 1 1 0\n0 2 2 0\n2 4 -1 0\n3 2 5 0\n4";
        let fsa = Fsa::from_text(text, false).unwrap();
        let connected = connect(&fsa);
        assert_eq!(connected.num_states(), 3);
        assert_eq!(connected.num_arcs(), 2);
        assert_eq!(connected.arcs()[0], Arc::new(0, 1, 2, 0.0));
        assert_eq!(connected.arcs()[1], Arc::new(1, 2, FINAL_LABEL, 0.0));
    }

    #[test]
    fn connect_without_accepting_path_is_empty() {
        let text = "0 1 1 0\n1 1 2 0\n2";
        let fsa = Fsa::from_text(text, false).unwrap();
        assert!(connect(&fsa).is_empty());
        assert!(connect(&Fsa::empty()).is_empty());
    }

    #[test]
    fn connect_keeps_connected_fsa() {
        let fsa = linear_acceptor(&[4, 5, 6]).unwrap();
        assert_eq!(connect(&fsa), fsa);
    }

    #[test]
    fn linear_acceptor_shape() {
        let fsa = linear_acceptor(&[7, 8]).unwrap();
        assert_eq!(fsa.num_states(), 4);
        let labels: Vec<Label> = fsa.arcs().iter().map(|a| a.label).collect();
        assert_eq!(labels, vec![7, 8, FINAL_LABEL]);
    }

    #[test]
    fn linear_acceptor_of_empty_sequence() {
        let fsa = linear_acceptor(&[]).unwrap();
        assert_eq!(fsa.num_states(), 2);
        assert_eq!(fsa.num_arcs(), 1);
        assert!(fsa.arcs()[0].is_final());
    }

    #[test]
    fn linear_fsa_batch() {
        let batch = vec![vec![1, 2], vec![], vec![3]];
        let fsas = linear_fsa(&batch).unwrap();
        assert_eq!(fsas.len(), 3);
        assert_eq!(fsas[0].num_states(), 4);
        assert_eq!(fsas[1].num_states(), 2);
        assert_eq!(fsas[2].num_states(), 3);
    }

    #[test]
    fn linear_acceptor_rejects_final_label() {
        assert!(linear_acceptor(&[1, FINAL_LABEL]).is_err());
    }
}
