// Pronunciation lexicon and the inverted lexicon transducer.
//
// Text form: one pronunciation per line, `word phone1 phone2 ...`. A word may
// appear on several lines (alternative pronunciations).

use std::path::Path;

use ctc_fsa::{Arc, EPSILON, FINAL_LABEL, Fsa, Label, StateId, arc_sort};

use crate::GraphError;
use crate::symbols::SymbolTable;

/// A parsed pronunciation lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: Vec<(String, Vec<String>)>,
}

impl Lexicon {
    /// Parse the lexicon text form. Blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self, GraphError> {
        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let phones: Vec<String> = fields.map(str::to_string).collect();
            if phones.is_empty() {
                return Err(GraphError::Lexicon {
                    line: i + 1,
                    message: format!("word {word:?} has no pronunciation"),
                });
            }
            entries.push((word.to_string(), phones));
        }
        Ok(Self { entries })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_text(&text)
    }

    /// Build from `(word, pronunciation)` pairs.
    pub fn from_entries<I, W, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, Vec<P>)>,
        W: Into<String>,
        P: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(w, p)| (w.into(), p.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the inverted lexicon: primary labels are word ids, auxiliary
    /// labels are phone ids.
    ///
    /// State 0 is a loop state. Each pronunciation `p1 .. pk` of word `w` is
    /// a chain out of state 0 and back: the first arc reads `w` and emits
    /// `p1`, the others read epsilon and emit the remaining phones. The
    /// result is arc-sorted.
    pub fn build_inverted(
        &self,
        phones: &SymbolTable,
        words: &SymbolTable,
    ) -> Result<Fsa, GraphError> {
        let mut chains: Vec<(Label, Vec<Label>)> = Vec::with_capacity(self.entries.len());
        for (entry, (word, pron)) in self.entries.iter().enumerate() {
            if pron.is_empty() {
                return Err(GraphError::EmptyPronunciation {
                    entry,
                    word: word.clone(),
                });
            }
            let word_id = words.get(word).ok_or_else(|| GraphError::UnknownSymbol {
                kind: "word",
                symbol: word.clone(),
            })?;
            let phone_ids = pron
                .iter()
                .map(|p| {
                    phones.get(p).ok_or_else(|| GraphError::UnknownSymbol {
                        kind: "phone",
                        symbol: p.clone(),
                    })
                })
                .collect::<Result<Vec<Label>, GraphError>>()?;
            chains.push((word_id, phone_ids));
        }

        let inner_states: usize = chains.iter().map(|(_, p)| p.len() - 1).sum();
        let final_state = (inner_states + 1) as StateId;

        // State 0 arcs first (the first arc of every chain plus the final
        // arc), then each inner state in increasing order.
        let mut arcs = Vec::new();
        let mut aux = Vec::new();
        let mut inner = Vec::new();
        let mut next_state: StateId = 1;
        for (word_id, phone_ids) in &chains {
            let last = phone_ids.len() - 1;
            let first_dest = if last == 0 { 0 } else { next_state };
            arcs.push(Arc::new(0, first_dest, *word_id, 0.0));
            aux.push(phone_ids[0]);
            for (k, &phone) in phone_ids.iter().enumerate().skip(1) {
                let src = next_state;
                let dest = if k == last { 0 } else { next_state + 1 };
                inner.push((Arc::new(src, dest, EPSILON, 0.0), phone));
                next_state += 1;
            }
        }
        arcs.push(Arc::new(0, final_state, FINAL_LABEL, 0.0));
        aux.push(FINAL_LABEL);
        for (arc, phone) in inner {
            arcs.push(arc);
            aux.push(phone);
        }

        let lexicon = Fsa::new(final_state as usize + 1, arcs, Some(aux))?;
        Ok(arc_sort(&lexicon))
    }
}
