// Symbol tables: bidirectional symbol <-> id mapping.
//
// The text form has one `symbol id` pair per line, e.g. the `words.txt` and
// `phones.txt` files of a language directory.

use std::path::Path;

use ctc_fsa::Label;
use hashbrown::HashMap;

use crate::GraphError;

/// Immutable bidirectional mapping between symbols and integer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbol_to_id: HashMap<String, Label>,
    id_to_symbol: HashMap<Label, String>,
}

/// Result of looking up a transcript word, with OOV substitution made
/// explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordLookup {
    /// The word is in the table.
    Found(Label),
    /// The word is unknown; this is the OOV symbol's id.
    Fallback(Label),
}

impl WordLookup {
    /// The id to use in the graph, whichever way it was obtained.
    pub fn id(self) -> Label {
        match self {
            WordLookup::Found(id) | WordLookup::Fallback(id) => id,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, WordLookup::Fallback(_))
    }
}

impl SymbolTable {
    /// Parse the `symbol id` text format. Blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self, GraphError> {
        let mut pairs = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [symbol, id] => {
                    let id: Label = id.parse().map_err(|_| GraphError::SymbolTable {
                        line: line_no,
                        message: format!("invalid id {id:?}"),
                    })?;
                    pairs.push((line_no, symbol.to_string(), id));
                }
                _ => {
                    return Err(GraphError::SymbolTable {
                        line: line_no,
                        message: format!("expected `symbol id`, got {} fields", fields.len()),
                    });
                }
            }
        }
        Self::build(pairs)
    }

    /// Load a symbol table file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_text(&text)
    }

    /// Build from `(symbol, id)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (S, Label)>,
        S: Into<String>,
    {
        Self::build(
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (symbol, id))| (i + 1, symbol.into(), id)),
        )
    }

    fn build(pairs: impl IntoIterator<Item = (usize, String, Label)>) -> Result<Self, GraphError> {
        let mut table = Self::default();
        for (line, symbol, id) in pairs {
            if id < 0 {
                return Err(GraphError::SymbolTable {
                    line,
                    message: format!("negative id {id} for {symbol:?}"),
                });
            }
            if table.symbol_to_id.contains_key(&symbol) {
                return Err(GraphError::SymbolTable {
                    line,
                    message: format!("duplicate symbol {symbol:?}"),
                });
            }
            if table.id_to_symbol.contains_key(&id) {
                return Err(GraphError::SymbolTable {
                    line,
                    message: format!("duplicate id {id}"),
                });
            }
            table.symbol_to_id.insert(symbol.clone(), id);
            table.id_to_symbol.insert(id, symbol);
        }
        Ok(table)
    }

    pub fn get(&self, symbol: &str) -> Option<Label> {
        self.symbol_to_id.get(symbol).copied()
    }

    pub fn symbol(&self, id: Label) -> Option<&str> {
        self.id_to_symbol.get(&id).map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_id.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbol_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_to_id.is_empty()
    }

    /// Look up `word`, falling back to `oov_id` when it is not in the table.
    pub fn lookup_or(&self, word: &str, oov_id: Label) -> WordLookup {
        match self.get(word) {
            Some(id) => WordLookup::Found(id),
            None => WordLookup::Fallback(oov_id),
        }
    }

    /// `(id, symbol)` pairs in ascending id order.
    pub fn iter(&self) -> Vec<(Label, &str)> {
        let mut entries: Vec<(Label, &str)> = self
            .id_to_symbol
            .iter()
            .map(|(&id, symbol)| (id, symbol.as_str()))
            .collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries
    }
}

/// Ascending phone ids of a phone table, excluding the epsilon/blank id 0,
/// `<eps>` and disambiguation symbols (those starting with `#`).
pub fn phone_ids(phones: &SymbolTable) -> Vec<Label> {
    phones
        .iter()
        .into_iter()
        .filter(|&(id, symbol)| id != 0 && symbol != "<eps>" && !symbol.starts_with('#'))
        .map(|(id, _)| id)
        .collect()
}
