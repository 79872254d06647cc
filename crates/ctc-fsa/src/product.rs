// Binary algorithms over the product of two state spaces: intersect, compose.
//
// Both expand reachable state pairs breadth-first. Pairs are numbered in
// discovery order, which keeps the output arcs grouped by source state; the
// pair of final states is moved to the end once expansion is done.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::arc::{Arc, EPSILON, Label, StateId, sort_key};
use crate::fsa::Fsa;
use crate::FsaError;

/// Intersect two acceptors on their primary labels.
///
/// An epsilon arc on either side advances that side alone. Auxiliary labels
/// are taken from `b` if it has them, otherwise from `a`; an arc contributed
/// only by the operand without auxiliary labels gets auxiliary epsilon.
///
/// When both operands contain epsilon arcs the result may hold redundant
/// equivalent paths; no epsilon filter is applied.
pub fn intersect(a: &Fsa, b: &Fsa) -> Fsa {
    if a.is_empty() || b.is_empty() {
        return Fsa::empty();
    }
    let with_aux = a.has_aux_labels() || b.has_aux_labels();

    let mut builder = ProductBuilder::new(a, b, with_aux);
    while let Some((pair_id, sa, sb)) = builder.next_pair() {
        for ia in a.arc_range(sa) {
            let arc_a = a.arcs()[ia];
            if arc_a.label == EPSILON {
                let aux = with_aux.then(|| a.aux_label(ia).unwrap_or(EPSILON));
                builder.add_arc(pair_id, (arc_a.dest, sb), EPSILON, aux, arc_a.weight);
                continue;
            }
            for ib in matching_arcs(b, sb, arc_a.label) {
                let arc_b = b.arcs()[ib];
                let aux = with_aux.then(|| {
                    b.aux_label(ib)
                        .or_else(|| a.aux_label(ia))
                        .unwrap_or(EPSILON)
                });
                builder.add_arc(
                    pair_id,
                    (arc_a.dest, arc_b.dest),
                    arc_a.label,
                    aux,
                    arc_a.weight + arc_b.weight,
                );
            }
        }
        for ib in matching_arcs(b, sb, EPSILON) {
            let arc_b = b.arcs()[ib];
            let aux = with_aux.then(|| b.aux_label(ib).unwrap_or(EPSILON));
            builder.add_arc(pair_id, (sa, arc_b.dest), EPSILON, aux, arc_b.weight);
        }
    }
    builder.finish()
}

/// Compose transducer `a` with `b`: `a`'s auxiliary labels are matched
/// against `b`'s primary labels.
///
/// Output arcs carry `a`'s primary label and `b`'s auxiliary label (`b`'s
/// primary label when `b` is an acceptor). An `a` arc with auxiliary epsilon
/// advances `a` alone; a `b` arc with primary epsilon advances `b` alone and
/// reads epsilon. Weights add.
pub fn compose(a: &Fsa, b: &Fsa) -> Result<Fsa, FsaError> {
    if !a.has_aux_labels() {
        return Err(FsaError::NotATransducer);
    }
    if a.is_empty() || b.is_empty() {
        return Ok(Fsa::empty());
    }
    let b_output = |i: usize| b.aux_label(i).unwrap_or(b.arcs()[i].label);

    let mut builder = ProductBuilder::new(a, b, true);
    while let Some((pair_id, sa, sb)) = builder.next_pair() {
        for ia in a.arc_range(sa) {
            let arc_a = a.arcs()[ia];
            let middle = a.aux_label(ia).unwrap_or(arc_a.label);
            if middle == EPSILON {
                builder.add_arc(
                    pair_id,
                    (arc_a.dest, sb),
                    arc_a.label,
                    Some(EPSILON),
                    arc_a.weight,
                );
                continue;
            }
            for ib in matching_arcs(b, sb, middle) {
                let arc_b = b.arcs()[ib];
                builder.add_arc(
                    pair_id,
                    (arc_a.dest, arc_b.dest),
                    arc_a.label,
                    Some(b_output(ib)),
                    arc_a.weight + arc_b.weight,
                );
            }
        }
        for ib in matching_arcs(b, sb, EPSILON) {
            let arc_b = b.arcs()[ib];
            builder.add_arc(
                pair_id,
                (sa, arc_b.dest),
                EPSILON,
                Some(b_output(ib)),
                arc_b.weight,
            );
        }
    }
    Ok(builder.finish())
}

/// Indices of the arcs of `state` labelled `label`. Uses binary search when
/// `fsa` is arc-sorted.
fn matching_arcs(fsa: &Fsa, state: StateId, label: Label) -> impl Iterator<Item = usize> + '_ {
    let range = fsa.arc_range(state);
    let (lo, hi) = if fsa.is_arc_sorted() {
        let arcs = &fsa.arcs()[range.clone()];
        let key = sort_key(label);
        let lo = arcs.partition_point(|a| sort_key(a.label) < key);
        let hi = arcs.partition_point(|a| sort_key(a.label) <= key);
        (range.start + lo, range.start + hi)
    } else {
        (range.start, range.end)
    };
    (lo..hi).filter(move |&i| fsa.arcs()[i].label == label)
}

/// Pair-state bookkeeping shared by intersect and compose.
struct ProductBuilder {
    final_pair: (StateId, StateId),
    ids: HashMap<(StateId, StateId), StateId>,
    queue: VecDeque<(StateId, StateId)>,
    arcs: Vec<Arc>,
    aux: Option<Vec<Label>>,
}

impl ProductBuilder {
    fn new(a: &Fsa, b: &Fsa, with_aux: bool) -> Self {
        let final_pair = (
            a.final_state().unwrap_or_default(),
            b.final_state().unwrap_or_default(),
        );
        let mut ids = HashMap::new();
        let mut queue = VecDeque::new();
        ids.insert((0, 0), 0);
        queue.push_back((0, 0));
        Self {
            final_pair,
            ids,
            queue,
            arcs: Vec::new(),
            aux: with_aux.then(Vec::new),
        }
    }

    /// Next pair to expand, skipping the final pair (it has no arcs).
    fn next_pair(&mut self) -> Option<(StateId, StateId, StateId)> {
        while let Some(pair) = self.queue.pop_front() {
            if pair != self.final_pair {
                return Some((self.ids[&pair], pair.0, pair.1));
            }
        }
        None
    }

    fn id_of(&mut self, pair: (StateId, StateId)) -> StateId {
        if let Some(&id) = self.ids.get(&pair) {
            return id;
        }
        let id = self.ids.len() as StateId;
        self.ids.insert(pair, id);
        self.queue.push_back(pair);
        id
    }

    fn add_arc(
        &mut self,
        src: StateId,
        dest_pair: (StateId, StateId),
        label: Label,
        aux: Option<Label>,
        weight: f32,
    ) {
        let dest = self.id_of(dest_pair);
        self.arcs.push(Arc::new(src, dest, label, weight));
        if let (Some(column), Some(aux)) = (self.aux.as_mut(), aux) {
            column.push(aux);
        }
    }

    /// Renumber so the final pair becomes the last state. Returns the empty
    /// FSA when the final pair was never reached.
    fn finish(mut self) -> Fsa {
        let Some(&final_id) = self.ids.get(&self.final_pair) else {
            return Fsa::empty();
        };
        let last = (self.ids.len() - 1) as StateId;
        let remap = |s: StateId| match s {
            s if s == final_id => last,
            s if s > final_id => s - 1,
            s => s,
        };
        for arc in &mut self.arcs {
            arc.src = remap(arc.src);
            arc.dest = remap(arc.dest);
        }
        Fsa::from_parts(self.ids.len(), self.arcs, self.aux)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{arc_sort, connect, linear_acceptor};
    use crate::arc::FINAL_LABEL;

    /// Transducer mapping 1 -> 10 and 2 -> 20, any number of times.
    fn relabel() -> Fsa {
        let text = "0 0 1 10 0\n0 0 2 20 0\n0 1 -1 -1 0\n1";
        Fsa::from_text(text, true).unwrap()
    }

    #[test]
    fn intersect_linear_with_loop() {
        let a = linear_acceptor(&[1, 2, 1]).unwrap();
        let out = intersect(&a, &relabel());
        assert_eq!(out.num_states(), 5);
        assert_eq!(out.aux_labels(), Some(&[10, 20, 10, FINAL_LABEL][..]));
        assert!(out.accepts(&[1, 2, 1]));
        assert!(!out.accepts(&[1, 2]));
    }

    #[test]
    fn intersect_without_match_is_empty() {
        let a = linear_acceptor(&[3]).unwrap();
        assert!(intersect(&a, &relabel()).is_empty());
        assert!(intersect(&Fsa::empty(), &relabel()).is_empty());
    }

    #[test]
    fn intersect_follows_epsilon_arcs_of_b() {
        // b reads 5 then an epsilon, emitting 50 and 51.
        let text = "0 1 5 50 0\n0 2 -1 -1 0\n1 0 0 51 0\n2";
        let b = Fsa::from_text(text, true).unwrap();
        let a = linear_acceptor(&[5, 5]).unwrap();
        let out = connect(&intersect(&a, &b));
        assert!(!out.is_empty());
        let path = out.shortest_path().unwrap();
        assert_eq!(path.labels, vec![5, 0, 5, 0]);
        assert_eq!(path.aux_labels, Some(vec![50, 51, 50, 51]));
    }

    #[test]
    fn intersect_final_state_is_last() {
        let a = linear_acceptor(&[]).unwrap();
        let out = intersect(&a, &relabel());
        assert_eq!(out.num_states(), 2);
        assert_eq!(out.arcs(), &[Arc::new(0, 1, FINAL_LABEL, 0.0)]);
    }

    #[test]
    fn compose_maps_through_middle_labels() {
        // a: input 7 -> middle 1, input 8 -> middle 2; b relabels 1/2 to 10/20.
        let a_text = "0 0 7 1 0.5\n0 0 8 2 0.25\n0 1 -1 -1 0\n1";
        let a = Fsa::from_text(a_text, true).unwrap();
        let out = connect(&compose(&a, &relabel()).unwrap());
        assert!(out.accepts(&[7, 8, 7]));
        assert!(!out.accepts(&[1]));
        let arcs = out.arcs_of(0);
        assert_eq!(arcs.len(), 3);
        assert_eq!(out.aux_labels(), Some(&[10, 20, FINAL_LABEL][..]));
        assert_eq!(arcs[0].weight, 0.5);
    }

    #[test]
    fn compose_epsilon_output_advances_left_only() {
        // a reads 4 with no output, then 5 -> 1.
        let a_text = "0 1 4 0 0\n1 2 5 1 0\n2 3 -1 -1 0\n3";
        let a = Fsa::from_text(a_text, true).unwrap();
        let out = connect(&compose(&a, &relabel()).unwrap());
        assert!(out.accepts(&[4, 5]));
        let path = out.shortest_path().unwrap();
        assert_eq!(path.aux_labels, Some(vec![0, 10]));
    }

    #[test]
    fn compose_requires_aux_labels() {
        let a = linear_acceptor(&[1]).unwrap();
        let err = compose(&a, &relabel()).unwrap_err();
        assert!(matches!(err, FsaError::NotATransducer));
    }

    #[test]
    fn matching_arcs_sorted_and_unsorted_agree() {
        let text = "0 0 3 0\n0 0 1 0\n0 0 3 0\n0 1 -1 0\n1";
        let unsorted = Fsa::from_text(text, false).unwrap();
        let sorted = arc_sort(&unsorted);
        assert_eq!(matching_arcs(&unsorted, 0, 3).count(), 2);
        assert_eq!(matching_arcs(&sorted, 0, 3).count(), 2);
        assert_eq!(matching_arcs(&sorted, 0, FINAL_LABEL).count(), 1);
        assert_eq!(matching_arcs(&sorted, 0, 2).count(), 0);
    }
}
