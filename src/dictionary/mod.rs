pub mod bootstrap;
pub mod cedict;
pub mod decomposition;
pub mod frequency;
pub mod hanzi;
pub mod snapshot;

pub use bootstrap::{
    ensure_data_files,
    DataFiles,
};
pub use hanzi::HanziDictionary;

use crate::{
    api::{
        DecompositionLevel,
        DictEntry,
        ScriptVariant,
        SearchMode,
    },
    core::BushouError,
};

/// Character data operations the query layer proxies to.
pub trait HanziEngine: Send + Sync {
    /// Components of `ch` at `level`; empty for unknown characters.
    fn decompose(&self, ch: &str, level: DecompositionLevel) -> Result<Vec<String>, BushouError>;

    fn definition_lookup(&self, ch: &str, variant: ScriptVariant) -> Result<Vec<DictEntry>, BushouError>;

    /// Multi-character words containing `ch`, most frequent first.
    fn examples(&self, ch: &str) -> Result<Vec<DictEntry>, BushouError>;

    fn dictionary_search(&self, text: &str, mode: SearchMode) -> Result<Vec<DictEntry>, BushouError>;

    fn component_exists(&self, component: &str) -> Result<bool, BushouError>;

    fn characters_with_component(&self, component: &str) -> Result<Vec<String>, BushouError>;
}
