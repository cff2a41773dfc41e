//! JSON shapes shared by the query server and its client.

pub mod types;

pub use types::{
    CharactersFromComponentResponse,
    ComponentExistsResponse,
    DecomposeAllResponse,
    DecomposeLevelResponse,
    DecomposeManyResponse,
    DecompositionLevel,
    DefineManyResponse,
    DefineResponse,
    DictEntry,
    DictionarySearchResponse,
    ErrorBody,
    ExamplesResponse,
    QuickSearchResponse,
    ScriptVariant,
    SearchMode,
};
