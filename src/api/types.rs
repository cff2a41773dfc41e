use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// Granularity of a structural breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DecompositionLevel {
    Once = 1,      // immediate components
    Radical = 2,   // down to catalogued radical forms
    Graphical = 3, // down to atomic strokes and shapes
}

impl DecompositionLevel {
    pub const ALL: [DecompositionLevel; 3] =
        [DecompositionLevel::Once, DecompositionLevel::Radical, DecompositionLevel::Graphical];

    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Once),
            2 => Some(Self::Radical),
            3 => Some(Self::Graphical),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DecompositionLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_number(level).ok_or_else(|| format!("invalid decomposition level {level}"))
    }
}

impl From<DecompositionLevel> for u8 {
    fn from(level: DecompositionLevel) -> Self {
        level.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptVariant {
    #[serde(rename = "s")]
    Simplified,
    #[serde(rename = "t")]
    Traditional,
}

impl ScriptVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "s" => Some(Self::Simplified),
            "t" => Some(Self::Traditional),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simplified => "s",
            Self::Traditional => "t",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    All,  // headword contains the query
    Only, // headword made only of the query's characters
}

impl SearchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "only" => Some(Self::Only),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only => "only",
        }
    }
}

/// A dictionary entry. `definition` keeps the CC-CEDICT "/" separated senses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DictEntry {
    pub traditional: String,
    pub simplified: String,
    pub pinyin: String,
    pub definition: String,
}

impl DictEntry {
    pub fn headword(&self, variant: ScriptVariant) -> &str {
        match variant {
            ScriptVariant::Simplified => &self.simplified,
            ScriptVariant::Traditional => &self.traditional,
        }
    }

    pub fn senses(&self) -> impl Iterator<Item = &str> {
        self.definition.split('/').filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeLevelResponse {
    pub ch: String,
    pub level: DecompositionLevel,
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeAllResponse {
    pub ch: String,
    pub components1: Vec<String>,
    pub components2: Vec<String>,
    pub components3: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeManyResponse {
    pub level: DecompositionLevel,
    pub result: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineResponse {
    #[serde(rename = "char")]
    pub character: String,
    pub variant: ScriptVariant,
    pub entries: Vec<DictEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineManyResponse {
    pub text: String,
    pub variant: ScriptVariant,
    pub result: HashMap<String, Vec<DictEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplesResponse {
    #[serde(rename = "char")]
    pub character: String,
    pub examples: Vec<DictEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionarySearchResponse {
    pub text: String,
    pub mode: SearchMode,
    pub results: Vec<DictEntry>,
    pub count: usize,
}

/// Short-form search kept for older callers of `/api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSearchResponse {
    pub q: String,
    pub mode: SearchMode,
    pub results: Vec<DictEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentExistsResponse {
    pub component: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharactersFromComponentResponse {
    pub component: String,
    pub characters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
