pub mod variants;

use std::collections::{
    BTreeSet,
    HashMap,
};

use log::warn;

pub use variants::VariantIndex;

use crate::core::{
    BushouError,
    RadicalRecord,
};

const RADICALS_JSON: &str = include_str!("../../data/radicals.json");

/// The 50 most commonly met radicals, shown as the "popular" deck.
pub const POPULAR_RADICAL_IDS: [u32; 50] = [
    9, 18, 19, 30, 31, 32, 37, 38, 40, 46, 50, 53, 60, 61, 64, 66, 72, 75, 85, 86, 93, 94, 96,
    102, 104, 109, 112, 115, 118, 119, 120, 130, 140, 142, 145, 149, 154, 157, 159, 162, 163, 167,
    169, 170, 173, 181, 184, 187, 195, 196,
];

/// Immutable radical reference table, indexed by position with an id lookup.
#[derive(Debug, Clone)]
pub struct RadicalTable {
    records: Vec<RadicalRecord>,
    positions: HashMap<u32, usize>,
}

impl RadicalTable {
    /// The table embedded in the binary.
    pub fn builtin() -> Result<Self, BushouError> {
        Self::from_json(RADICALS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, BushouError> {
        let records: Vec<RadicalRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Builds the table, rejecting duplicate ids and zero stroke counts.
    /// Dangling component references are tolerated and only logged.
    pub fn from_records(records: Vec<RadicalRecord>) -> Result<Self, BushouError> {
        let mut positions = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if record.strokes == 0 {
                return Err(BushouError::InvalidRadicalTable(format!(
                    "radical {} has no strokes",
                    record.id
                )));
            }
            if positions.insert(record.id, position).is_some() {
                return Err(BushouError::InvalidRadicalTable(format!(
                    "duplicate radical id {}",
                    record.id
                )));
            }
        }

        let table = Self { records, positions };
        for (id, missing) in table.unresolved_components() {
            warn!("Radical {} references unknown component {}", id, missing);
        }
        Ok(table)
    }

    pub fn get(&self, id: u32) -> Option<&RadicalRecord> {
        self.positions.get(&id).map(|&position| &self.records[position])
    }

    pub fn records(&self) -> &[RadicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all_ids(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Distinct stroke counts in ascending order.
    pub fn stroke_counts(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.strokes).collect::<BTreeSet<_>>().into_iter().collect()
    }

    pub fn ids_with_strokes(&self, strokes: u8) -> Vec<u32> {
        self.records.iter().filter(|r| r.strokes == strokes).map(|r| r.id).collect()
    }

    pub fn popular_ids(&self) -> Vec<u32> {
        self.records
            .iter()
            .filter(|r| POPULAR_RADICAL_IDS.contains(&r.id))
            .map(|r| r.id)
            .collect()
    }

    /// (radical id, missing component id) pairs.
    pub fn unresolved_components(&self) -> Vec<(u32, u32)> {
        self.records
            .iter()
            .flat_map(|r| r.components.iter().map(move |&c| (r.id, c)))
            .filter(|(_, c)| !self.positions.contains_key(c))
            .collect()
    }

    /// Human readable composition, e.g. "Composed of: 丿 (4) + 丿 (4)".
    /// Unknown ids render as "#<id>" so a broken reference never hides the card.
    pub fn describe_components(&self, record: &RadicalRecord) -> Option<String> {
        if record.components.is_empty() {
            return None;
        }

        let parts: Vec<String> = record
            .components
            .iter()
            .map(|&id| match self.get(id) {
                Some(component) => format!("{} ({})", component.glyph, id),
                None => format!("#{}", id),
            })
            .collect();

        Some(format!("Composed of: {}", parts.join(" + ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, glyph: &str, strokes: u8, components: Vec<u32>) -> RadicalRecord {
        RadicalRecord {
            id,
            glyph: glyph.to_string(),
            name: String::new(),
            romanization: String::new(),
            meaning: String::new(),
            strokes,
            components,
        }
    }

    #[test]
    fn test_builtin_table() {
        let table = RadicalTable::builtin().unwrap();
        assert_eq!(table.len(), 214);
        assert_eq!(table.get(1).unwrap().primary_glyph(), "一");
        assert_eq!(table.get(9).unwrap().primary_glyph(), "人");
        assert_eq!(table.get(214).unwrap().strokes, 17);
        assert!(table.unresolved_components().is_empty());
        assert_eq!(table.popular_ids().len(), 50);
    }

    #[test]
    fn test_stroke_groups_cover_the_table() {
        let table = RadicalTable::builtin().unwrap();
        let counts = table.stroke_counts();
        assert_eq!(counts.first(), Some(&1));
        assert_eq!(counts.last(), Some(&17));

        let total: usize = counts.iter().map(|&n| table.ids_with_strokes(n).len()).sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = RadicalTable::from_records(vec![record(1, "一", 1, vec![]), record(1, "二", 2, vec![])]);
        assert!(matches!(result, Err(BushouError::InvalidRadicalTable(_))));
    }

    #[test]
    fn test_dangling_component_renders_placeholder() {
        let table =
            RadicalTable::from_records(vec![record(1, "一", 1, vec![]), record(7, "二", 2, vec![1, 99])])
                .unwrap();

        assert_eq!(table.unresolved_components(), vec![(7, 99)]);
        let description = table.describe_components(table.get(7).unwrap()).unwrap();
        assert_eq!(description, "Composed of: 一 (1) + #99");
        assert!(table.describe_components(table.get(1).unwrap()).is_none());
    }
}
