use std::{
    collections::{
        HashMap,
        HashSet,
    },
    fs,
    path::Path,
    time::Instant,
};

use log::{
    info,
    warn,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    bootstrap::DataFiles,
    cedict::parse_cedict,
    decomposition::DecompositionTable,
    frequency::FrequencyTable,
    snapshot::{
        self,
        Fingerprint,
        SNAPSHOT_FILE,
    },
    HanziEngine,
};
use crate::{
    api::{
        DecompositionLevel,
        DictEntry,
        ScriptVariant,
        SearchMode,
    },
    core::BushouError,
    radicals::VariantIndex,
};

pub const MAX_EXAMPLES: usize = 30;

/// Parsed sources plus their lookup indexes. This is what gets snapshotted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HanziData {
    entries: Vec<DictEntry>,
    by_simplified: HashMap<String, Vec<usize>>,
    by_traditional: HashMap<String, Vec<usize>>,
    by_character: HashMap<char, Vec<usize>>, // multi-character words only
    decomposition: DecompositionTable,
    containing: HashMap<String, Vec<String>>, // ranked by frequency
    frequency: FrequencyTable,
}

impl HanziData {
    fn build(entries: Vec<DictEntry>, decomposition: DecompositionTable, frequency: FrequencyTable) -> Self {
        let mut by_simplified: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_traditional: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_character: HashMap<char, Vec<usize>> = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            by_simplified.entry(entry.simplified.clone()).or_default().push(i);
            by_traditional.entry(entry.traditional.clone()).or_default().push(i);

            if entry.simplified.chars().count() > 1 {
                let chars: HashSet<char> =
                    entry.simplified.chars().chain(entry.traditional.chars()).collect();
                for c in chars {
                    by_character.entry(c).or_default().push(i);
                }
            }
        }

        let mut containing = decomposition.containing_index();
        containing
            .par_iter_mut()
            .for_each(|(_, characters)| characters.sort_by(|a, b| frequency.compare_characters(a, b)));

        Self {
            entries,
            by_simplified,
            by_traditional,
            by_character,
            decomposition,
            containing,
            frequency,
        }
    }
}

/// Dictionary engine backed by CC-CEDICT, cjk-decomp and an optional word
/// frequency list.
#[derive(Debug, Clone)]
pub struct HanziDictionary {
    data: HanziData,
    radical_forms: HashSet<String>,
}

impl HanziDictionary {
    pub fn from_sources(
        cedict: &str,
        decomposition: &str,
        frequency: Option<&str>,
        variants: &VariantIndex,
    ) -> Result<Self, BushouError> {
        let entries = parse_cedict(cedict)?;
        let decomposition = DecompositionTable::parse(decomposition)?;
        let frequency = frequency.map(FrequencyTable::parse).unwrap_or_default();

        Ok(Self::with_data(HanziData::build(entries, decomposition, frequency), variants))
    }

    /// Loads the engine from data files, reusing the snapshot next to them
    /// while the sources are unchanged.
    pub fn load(files: &DataFiles, variants: &VariantIndex) -> Result<Self, BushouError> {
        let start = Instant::now();

        let mut sources: Vec<&Path> = vec![files.cedict.as_path(), files.decomposition.as_path()];
        if let Some(frequency) = &files.frequency {
            sources.push(frequency.as_path());
        }
        let fingerprint = Fingerprint::of(&sources)?;
        let snapshot_path = files.cedict.with_file_name(SNAPSHOT_FILE);

        match snapshot::load::<HanziData>(&snapshot_path, &fingerprint) {
            Ok(Some(data)) => {
                info!("Loaded dictionary snapshot in {:?}", start.elapsed());
                return Ok(Self::with_data(data, variants));
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable snapshot {:?}: {}", snapshot_path, e),
        }

        let cedict = fs::read_to_string(&files.cedict)?;
        let decomposition = fs::read_to_string(&files.decomposition)?;
        let frequency = match &files.frequency {
            Some(path) => Some(fs::read_to_string(path)?),
            None => None,
        };

        let dictionary = Self::from_sources(&cedict, &decomposition, frequency.as_deref(), variants)?;
        info!(
            "Built dictionary from sources in {:?}: {} entries, {} decompositions",
            start.elapsed(),
            dictionary.data.entries.len(),
            dictionary.data.decomposition.len()
        );

        if let Err(e) = snapshot::save(&snapshot_path, &fingerprint, &dictionary.data) {
            warn!("Failed to save dictionary snapshot: {}", e);
        }

        Ok(dictionary)
    }

    fn with_data(data: HanziData, variants: &VariantIndex) -> Self {
        let radical_forms = variants.glyphs().map(str::to_string).collect();
        Self { data, radical_forms }
    }

    pub fn entry_count(&self) -> usize {
        self.data.entries.len()
    }

    fn ranked(&self, mut entries: Vec<DictEntry>) -> Vec<DictEntry> {
        entries.sort_by(|a, b| self.data.frequency.compare_entries(a, b));
        entries
    }
}

impl HanziEngine for HanziDictionary {
    fn decompose(&self, ch: &str, level: DecompositionLevel) -> Result<Vec<String>, BushouError> {
        self.data.decomposition.decompose(ch, level, |c| self.radical_forms.contains(c))
    }

    fn definition_lookup(&self, ch: &str, variant: ScriptVariant) -> Result<Vec<DictEntry>, BushouError> {
        let index = match variant {
            ScriptVariant::Simplified => &self.data.by_simplified,
            ScriptVariant::Traditional => &self.data.by_traditional,
        };

        Ok(index
            .get(ch)
            .map(|ids| ids.iter().map(|&i| self.data.entries[i].clone()).collect())
            .unwrap_or_default())
    }

    fn examples(&self, ch: &str) -> Result<Vec<DictEntry>, BushouError> {
        let Some(c) = ch.chars().next() else {
            return Ok(Vec::new());
        };

        let candidates: Vec<DictEntry> = self
            .data
            .by_character
            .get(&c)
            .map(|ids| ids.iter().map(|&i| self.data.entries[i].clone()).collect())
            .unwrap_or_default();

        let mut examples = self.ranked(candidates);
        examples.truncate(MAX_EXAMPLES);
        Ok(examples)
    }

    fn dictionary_search(&self, text: &str, mode: SearchMode) -> Result<Vec<DictEntry>, BushouError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let allowed: HashSet<char> = text.chars().collect();
        let matches: Vec<DictEntry> = self
            .data
            .entries
            .par_iter()
            .filter(|entry| match mode {
                SearchMode::All => entry.simplified.contains(text) || entry.traditional.contains(text),
                SearchMode::Only => {
                    entry.simplified.chars().all(|c| allowed.contains(&c))
                        || entry.traditional.chars().all(|c| allowed.contains(&c))
                }
            })
            .cloned()
            .collect();

        Ok(self.ranked(matches))
    }

    fn component_exists(&self, component: &str) -> Result<bool, BushouError> {
        Ok(self.data.containing.contains_key(component))
    }

    fn characters_with_component(&self, component: &str) -> Result<Vec<String>, BushouError> {
        Ok(self.data.containing.get(component).cloned().unwrap_or_default())
    }
}
