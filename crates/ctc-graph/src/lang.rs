// Language directory loading.
//
// A language directory holds `phones.txt`, `words.txt` and `lexicon.txt`.

use std::path::{Path, PathBuf};

use crate::GraphError;
use crate::compiler::CtcTrainingGraphCompiler;
use crate::config::CompilerConfig;
use crate::lexicon::Lexicon;
use crate::symbols::SymbolTable;

pub const PHONES_FILE: &str = "phones.txt";
pub const WORDS_FILE: &str = "words.txt";
pub const LEXICON_FILE: &str = "lexicon.txt";

/// The symbol tables and lexicon of one language directory.
#[derive(Debug, Clone)]
pub struct LangDir {
    pub path: PathBuf,
    pub phones: SymbolTable,
    pub words: SymbolTable,
    pub lexicon: Lexicon,
}

impl LangDir {
    /// Whether `dir` contains all the files [`LangDir::load`] reads.
    pub fn is_lang_dir(dir: &Path) -> bool {
        [PHONES_FILE, WORDS_FILE, LEXICON_FILE]
            .iter()
            .all(|f| dir.join(f).is_file())
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self, GraphError> {
        let dir = dir.as_ref();
        Ok(Self {
            path: dir.to_path_buf(),
            phones: SymbolTable::from_file(dir.join(PHONES_FILE))?,
            words: SymbolTable::from_file(dir.join(WORDS_FILE))?,
            lexicon: Lexicon::from_file(dir.join(LEXICON_FILE))?,
        })
    }

    /// Build the inverted lexicon and a compiler over it.
    pub fn into_compiler(
        self,
        config: &CompilerConfig,
    ) -> Result<CtcTrainingGraphCompiler, GraphError> {
        let lexicon_inv = self.lexicon.build_inverted(&self.phones, &self.words)?;
        CtcTrainingGraphCompiler::new(lexicon_inv, self.phones, self.words, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lang() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/lang")
    }

    #[test]
    fn load_test_lang() {
        let dir = test_lang();
        assert!(LangDir::is_lang_dir(&dir));
        let lang = LangDir::load(&dir).unwrap();
        assert!(lang.words.contains("<UNK>"));
        assert!(!lang.lexicon.is_empty());
    }

    #[test]
    fn missing_dir() {
        let dir = PathBuf::from("/nonexistent/lang");
        assert!(!LangDir::is_lang_dir(&dir));
        assert!(matches!(LangDir::load(&dir), Err(GraphError::Io { .. })));
    }

    #[test]
    fn compiler_from_lang_dir() {
        let lang = LangDir::load(test_lang()).unwrap();
        let compiler = lang.into_compiler(&CompilerConfig::default()).unwrap();
        let graph = compiler.compile_one("the cat").unwrap();
        assert!(!graph.is_empty());
    }
}
