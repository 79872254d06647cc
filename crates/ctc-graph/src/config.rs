// Graph compiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::GraphError;
use crate::topo::TopologyKind;

/// Options for [`CtcTrainingGraphCompiler`](crate::CtcTrainingGraphCompiler).
///
/// Missing JSON fields take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Topology construction to compose with.
    pub topology: TopologyKind,
    /// Word substituted for out-of-vocabulary transcript words.
    pub oov: String,
}

impl CompilerConfig {
    pub const DEFAULT_OOV: &'static str = "<UNK>";

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            topology: TopologyKind::default(),
            oov: Self::DEFAULT_OOV.to_string(),
        }
    }
}
