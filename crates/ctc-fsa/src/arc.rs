// Arc record and reserved labels.

/// Arc label. Non-negative values are symbols; `-1` marks the final arc.
pub type Label = i32;

/// State index.
pub type StateId = u32;

/// Label meaning "no symbol". On the input side of a CTC graph the same
/// numeric value is read as blank, so only the algebra treats it specially.
pub const EPSILON: Label = 0;

/// Label carried by every arc that enters the final state, and by no other arc.
pub const FINAL_LABEL: Label = -1;

/// One arc of an acceptor.
///
/// The auxiliary label, when present, lives in a column parallel to the arc
/// list (see [`Fsa::aux_labels`](crate::Fsa::aux_labels)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub src: StateId,
    pub dest: StateId,
    pub label: Label,
    pub weight: f32,
}

impl Arc {
    #[inline]
    pub fn new(src: StateId, dest: StateId, label: Label, weight: f32) -> Self {
        Self {
            src,
            dest,
            label,
            weight,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.label == FINAL_LABEL
    }
}

/// Ordering key used by arc-sort: labels compared as unsigned, so `-1` sorts
/// after every real symbol.
#[inline]
pub(crate) fn sort_key(label: Label) -> u32 {
    label as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_label_sorts_last() {
        assert!(sort_key(FINAL_LABEL) > sort_key(0));
        assert!(sort_key(FINAL_LABEL) > sort_key(i32::MAX));
        assert!(sort_key(3) < sort_key(7));
    }

    #[test]
    fn final_arc_detection() {
        assert!(Arc::new(0, 1, FINAL_LABEL, 0.0).is_final());
        assert!(!Arc::new(0, 0, EPSILON, 0.0).is_final());
    }
}
