use serde::{
    Deserialize,
    Serialize,
};

use crate::radicals::variants::{
    extract_variants,
    primary_glyph,
};

/// One entry of the 214-radical reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalRecord {
    pub id: u32,              // Kangxi sequence number, stable ordering key
    pub glyph: String,        // May carry variants, e.g. "人 (亻)" or "水(氵、氺)"
    pub name: String,         // Sino-Vietnamese name
    pub romanization: String, // Pinyin with tone marks
    pub meaning: String,
    pub strokes: u8,
    #[serde(default)]
    pub components: Vec<u32>, // Ids of the radicals this one is composed of
}

impl RadicalRecord {
    pub fn primary_glyph(&self) -> &str {
        primary_glyph(&self.glyph)
    }

    pub fn variants(&self) -> Vec<String> {
        extract_variants(&self.glyph)
    }

    pub fn is_atomic(&self) -> bool {
        self.components.is_empty()
    }
}
