use std::{
    cmp::Ordering,
    collections::HashMap,
};

use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::api::DictEntry;

pub const FREQUENCY_FILE: &str = "word_frequency.txt";

/// Word occurrence counts read from `word<TAB>count` lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn parse(text: &str) -> Self {
        let counts = text
            .par_lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let word = fields.next()?;
                let count = fields.next()?.parse::<u64>().ok()?;
                Some((word.to_string(), count))
            })
            .collect();

        Self { counts }
    }

    pub fn count(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn entry_count(&self, entry: &DictEntry) -> Option<u64> {
        match (self.count(&entry.simplified), self.count(&entry.traditional)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Most frequent first, unknown frequency last, then shorter headwords,
    /// then headword order.
    pub fn compare_entries(&self, a: &DictEntry, b: &DictEntry) -> Ordering {
        compare_counts(self.entry_count(a), self.entry_count(b))
            .then_with(|| a.simplified.chars().count().cmp(&b.simplified.chars().count()))
            .then_with(|| a.simplified.cmp(&b.simplified))
            .then_with(|| a.traditional.cmp(&b.traditional))
            .then_with(|| a.pinyin.cmp(&b.pinyin))
    }

    /// Most frequent first, unknown frequency last, then code point order.
    pub fn compare_characters(&self, a: &str, b: &str) -> Ordering {
        compare_counts(self.count(a), self.count(b)).then_with(|| a.cmp(b))
    }
}

fn compare_counts(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
