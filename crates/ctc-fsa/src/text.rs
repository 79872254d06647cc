// Line-oriented text format.
//
// One arc per line: `src dest label [aux_label] weight`. The last line holds
// the final state id alone. Arcs must appear grouped by source state.

use std::fmt;

use crate::arc::{Arc, Label, StateId};
use crate::fsa::Fsa;
use crate::FsaError;

impl Fsa {
    /// Parse the text format.
    ///
    /// With `with_aux` set every arc line must carry an auxiliary label
    /// (five fields), otherwise four fields. Empty input yields the empty FSA.
    pub fn from_text(text: &str, with_aux: bool) -> Result<Self, FsaError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();

        let Some((&(final_line, final_text), arc_lines)) = lines.split_last() else {
            return Ok(Fsa::empty());
        };

        let final_fields: Vec<&str> = final_text.split_whitespace().collect();
        if final_fields.len() != 1 {
            return Err(parse_error(
                final_line,
                format!(
                    "expected a lone final state id, got {} fields",
                    final_fields.len()
                ),
            ));
        }
        let final_state: StateId = parse_field(final_line, final_fields[0], "final state")?;

        let expected = if with_aux { 5 } else { 4 };
        let mut arcs = Vec::with_capacity(arc_lines.len());
        let mut aux = with_aux.then(|| Vec::with_capacity(arc_lines.len()));

        for &(line, text) in arc_lines {
            let fields: Vec<&str> = text.split_whitespace().collect();
            if fields.len() != expected {
                return Err(parse_error(
                    line,
                    format!("expected {expected} fields, got {}", fields.len()),
                ));
            }
            let src: StateId = parse_field(line, fields[0], "source state")?;
            let dest: StateId = parse_field(line, fields[1], "destination state")?;
            let label: Label = parse_field(line, fields[2], "label")?;
            let weight: f32 = parse_field(line, fields[expected - 1], "weight")?;
            if let Some(aux) = aux.as_mut() {
                aux.push(parse_field(line, fields[3], "auxiliary label")?);
            }
            arcs.push(Arc::new(src, dest, label, weight));
        }

        // The final state is the highest state id: at most one past the
        // highest id an arc mentions.
        let highest = arcs
            .iter()
            .map(|a| a.src.max(a.dest))
            .max()
            .unwrap_or_default();
        if final_state > highest.saturating_add(1) {
            return Err(parse_error(
                final_line,
                format!("final state {final_state} is beyond the highest arc state {highest}"),
            ));
        }

        Fsa::new(final_state as usize + 1, arcs, aux)
    }
}

fn parse_error(line: usize, message: String) -> FsaError {
    FsaError::Parse { line, message }
}

fn parse_field<T: std::str::FromStr>(line: usize, field: &str, what: &str) -> Result<T, FsaError> {
    field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {what}: {field:?}")))
}

/// Emits the text format accepted by [`Fsa::from_text`].
impl fmt::Display for Fsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(final_state) = self.final_state() else {
            return Ok(());
        };
        for (i, arc) in self.arcs().iter().enumerate() {
            match self.aux_label(i) {
                Some(aux) => writeln!(
                    f,
                    "{} {} {} {} {}",
                    arc.src, arc.dest, arc.label, aux, arc.weight
                )?,
                None => writeln!(f, "{} {} {} {}", arc.src, arc.dest, arc.label, arc.weight)?,
            }
        }
        writeln!(f, "{final_state}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::FINAL_LABEL;

    #[test]
    fn parse_acceptor() {
        let fsa = Fsa::from_text("0 1 3 0.5\n1 2 -1 0\n2\n", false).unwrap();
        assert_eq!(fsa.num_states(), 3);
        assert_eq!(fsa.num_arcs(), 2);
        assert_eq!(fsa.arcs()[0], Arc::new(0, 1, 3, 0.5));
        assert!(fsa.arcs()[1].is_final());
        assert!(!fsa.has_aux_labels());
    }

    #[test]
    fn parse_transducer() {
        let text = "0 0 2 0 0.0\n0 1 -1 -1 0.0\n1";
        let fsa = Fsa::from_text(text, true).unwrap();
        assert_eq!(fsa.aux_labels(), Some(&[0, FINAL_LABEL][..]));
    }

    #[test]
    fn parse_empty_text() {
        let fsa = Fsa::from_text("  \n\n", false).unwrap();
        assert!(fsa.is_empty());
    }

    #[test]
    fn reject_wrong_field_count() {
        let err = Fsa::from_text("0 1 3 0 0.0\n1\n", false).unwrap_err();
        assert!(matches!(err, FsaError::Parse { line: 1, .. }));
    }

    #[test]
    fn reject_bad_number() {
        let err = Fsa::from_text("0 1 x 0.0\n1\n", false).unwrap_err();
        assert!(matches!(err, FsaError::Parse { line: 1, .. }));
    }

    #[test]
    fn reject_missing_final_line() {
        let err = Fsa::from_text("0 1 -1 0.0\n", false).unwrap_err();
        assert!(matches!(err, FsaError::Parse { line: 1, .. }));
    }

    #[test]
    fn reject_final_state_far_beyond_arcs() {
        let err = Fsa::from_text("3000000000\n", false).unwrap_err();
        assert!(matches!(err, FsaError::Parse { line: 1, .. }));

        let err = Fsa::from_text("0 1 -1 0\n7\n", false).unwrap_err();
        assert!(matches!(err, FsaError::Parse { line: 2, .. }));
    }

    #[test]
    fn final_state_may_follow_unreached_states() {
        let fsa = Fsa::from_text("0 1 1 0\n1 1 1 0\n2\n", false).unwrap();
        assert_eq!(fsa.num_states(), 3);
        assert_eq!(Fsa::from_text("1\n", false).unwrap().num_states(), 2);
    }

    #[test]
    fn reject_unsorted_arcs() {
        let text = "1 2 -1 0.0\n0 1 5 0.0\n2";
        let err = Fsa::from_text(text, false).unwrap_err();
        assert!(matches!(err, FsaError::ArcsNotSorted { .. }));
    }

    #[test]
    fn display_reparses_to_same_fsa() {
        let text = "0 1 4 7 0.25\n0 2 -1 -1 0\n1 1 4 0 0\n1 2 -1 -1 0\n2\n";
        let fsa = Fsa::from_text(text, true).unwrap();
        let printed = fsa.to_string();
        assert_eq!(Fsa::from_text(&printed, true).unwrap(), fsa);
        assert!(printed.starts_with("0 1 4 7 0.25\n"));
        assert!(printed.ends_with("\n2\n"));
    }

    #[test]
    fn display_empty_fsa() {
        assert_eq!(Fsa::empty().to_string(), "");
    }
}
