// Per-utterance CTC training graph compilation.
//
// Pipeline for each transcript:
//   words -> ids (OOV substituted) -> linear acceptor
//   -> intersect with the inverted lexicon -> connect
//   -> invert (phones become primary labels) -> arc-sort
//   -> compose with the cached topology -> connect
//
// The compiler owns only immutable state after construction, so `compile`
// takes `&self` and may be called from several threads at once.

use ctc_fsa::{EPSILON, Fsa, Label, arc_sort, compose, connect, intersect, invert, linear_fsa};
use tracing::{debug, trace};

use crate::GraphError;
use crate::config::CompilerConfig;
use crate::symbols::{SymbolTable, WordLookup, phone_ids};
use crate::topo::{BLANK, TopologyKind, build_topo};

/// Compiles word transcripts into CTC training graphs.
///
/// Output graphs read raw frame-level tokens (0 = blank) on the primary side
/// and carry word ids (0 = epsilon) on the auxiliary side.
#[derive(Debug, Clone)]
pub struct CtcTrainingGraphCompiler {
    /// Inverted lexicon: word ids on the primary side, phone ids auxiliary.
    lexicon_inv: Fsa,
    phones: SymbolTable,
    words: SymbolTable,
    oov: String,
    oov_id: Label,
    topology_kind: TopologyKind,
    ctc_topo: Fsa,
}

impl CtcTrainingGraphCompiler {
    /// Create a compiler.
    ///
    /// - `lexicon_inv`: inverted lexicon (word-labelled, phone auxiliary
    ///   labels); arc-sorted here if it is not already
    /// - `phones`, `words`: symbol tables
    /// - `config`: topology kind and OOV word
    ///
    /// Fails if the OOV word is not in `words`.
    pub fn new(
        lexicon_inv: Fsa,
        phones: SymbolTable,
        words: SymbolTable,
        config: &CompilerConfig,
    ) -> Result<Self, GraphError> {
        let lexicon_inv = if lexicon_inv.is_arc_sorted() {
            lexicon_inv
        } else {
            arc_sort(&lexicon_inv)
        };

        let oov_id = words
            .get(&config.oov)
            .ok_or_else(|| GraphError::UnknownOov(config.oov.clone()))?;

        let mut tokens = vec![BLANK];
        tokens.extend(phone_ids(&phones));
        let ctc_topo = build_topo(config.topology, &tokens)?;

        Ok(Self {
            lexicon_inv,
            phones,
            words,
            oov: config.oov.clone(),
            oov_id,
            topology_kind: config.topology,
            ctc_topo,
        })
    }

    pub fn words(&self) -> &SymbolTable {
        &self.words
    }

    pub fn phones(&self) -> &SymbolTable {
        &self.phones
    }

    pub fn oov(&self) -> &str {
        &self.oov
    }

    pub fn oov_id(&self) -> Label {
        self.oov_id
    }

    /// The cached CTC topology.
    pub fn topology(&self) -> &Fsa {
        &self.ctc_topo
    }

    pub fn topology_kind(&self) -> TopologyKind {
        self.topology_kind
    }

    /// Map a whitespace-separated transcript to word ids, substituting the
    /// OOV id for unknown words. An empty transcript yields no words.
    ///
    /// Words with id 0 (the epsilon word, usually `<eps>`) are dropped: they
    /// would otherwise become epsilon moves in the label graph.
    pub fn word_ids(&self, transcript: &str) -> Vec<WordLookup> {
        transcript
            .split_whitespace()
            .filter_map(|word| {
                let lookup = self.words.lookup_or(word, self.oov_id);
                if lookup.id() == EPSILON {
                    trace!(word, "dropping epsilon word");
                    return None;
                }
                if lookup.is_fallback() {
                    trace!(word, oov = %self.oov, "substituting OOV word");
                }
                Some(lookup)
            })
            .collect()
    }

    /// Compile a batch of transcripts, one graph per transcript in input
    /// order.
    ///
    /// A transcript with no matching lexicon path yields an empty graph, not
    /// an error; callers decide whether to skip it.
    pub fn compile<I, S>(&self, transcripts: I) -> Result<Vec<Fsa>, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let word_ids: Vec<Vec<Label>> = transcripts
            .into_iter()
            .map(|t| self.word_ids(t.as_ref()).into_iter().map(WordLookup::id).collect())
            .collect();

        linear_fsa(&word_ids)?
            .iter()
            .enumerate()
            .map(|(index, label_graph)| self.compile_linear(index, label_graph))
            .collect()
    }

    /// Compile a single transcript.
    pub fn compile_one(&self, transcript: &str) -> Result<Fsa, GraphError> {
        let mut graphs = self.compile([transcript])?;
        Ok(graphs.pop().unwrap_or_else(Fsa::empty))
    }

    fn compile_linear(&self, index: usize, label_graph: &Fsa) -> Result<Fsa, GraphError> {
        let graph = connect(&intersect(label_graph, &self.lexicon_inv));
        let graph = arc_sort(&invert(&graph));
        let graph = connect(&compose(&self.ctc_topo, &graph)?);
        if graph.is_empty() {
            debug!(index, "compiled graph is empty");
        }
        Ok(graph)
    }
}
