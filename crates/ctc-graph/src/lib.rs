//! CTC topology and per-utterance training graph construction.
//!
//! Given phone and word symbol tables, an inverted lexicon and a topology
//! choice, [`CtcTrainingGraphCompiler`] turns word transcripts into acceptors
//! whose input side enumerates every frame-level token sequence (with blanks
//! and repeats) that collapses to the transcript's pronunciation.
//!
//! # Architecture
//!
//! - [`symbols`] -- Word and phone symbol tables, OOV-aware lookup
//! - [`lexicon`] -- Pronunciation lexicon and inverted lexicon transducer
//! - [`topo`] -- CTC topologies (quadratic and linear variants)
//! - [`config`] -- Compiler configuration
//! - [`compiler`] -- The per-utterance graph compilation pipeline
//! - [`lang`] -- Loading a language directory from disk

use std::path::PathBuf;

pub mod compiler;
pub mod config;
pub mod lang;
pub mod lexicon;
pub mod symbols;
pub mod topo;

pub use compiler::CtcTrainingGraphCompiler;
pub use config::CompilerConfig;
pub use lexicon::Lexicon;
pub use symbols::{SymbolTable, WordLookup};
pub use topo::TopologyKind;

/// Error type for graph compiler construction and input loading.
///
/// Out-of-vocabulary words in transcripts are not errors; they are replaced
/// by the configured OOV symbol.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The token list handed to a topology builder lacks the blank id 0.
    #[error("token list does not contain the blank id 0")]
    MissingBlank,

    /// The configured OOV symbol is not in the word table.
    #[error("OOV symbol {0:?} is not in the word table")]
    UnknownOov(String),

    #[error("invalid symbol table at line {line}: {message}")]
    SymbolTable { line: usize, message: String },

    #[error("invalid lexicon at line {line}: {message}")]
    Lexicon { line: usize, message: String },

    #[error("lexicon entry {entry} ({word:?}) has no pronunciation")]
    EmptyPronunciation { entry: usize, word: String },

    #[error("lexicon refers to unknown {kind} {symbol:?}")]
    UnknownSymbol { kind: &'static str, symbol: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid compiler config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Fsa(#[from] ctc_fsa::FsaError),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
