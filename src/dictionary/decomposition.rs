use std::collections::{
    BTreeSet,
    HashMap,
    HashSet,
};

use rayon::prelude::*;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    api::DecompositionLevel,
    core::BushouError,
};

pub const DECOMPOSITION_FILE: &str = "cjk-decomp.txt";

const MAX_DEPTH: usize = 32;

/// Structural decomposition data in cjk-decomp form: `X:type(c1,c2,...)`.
/// Numeric keys are unencoded intermediate shapes; they are expanded during
/// lookups and never returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecompositionTable {
    parts: HashMap<String, Vec<String>>,
}

fn is_intermediate(component: &str) -> bool {
    !component.is_empty() && component.chars().all(|c| c.is_ascii_digit())
}

impl DecompositionTable {
    pub fn parse(text: &str) -> Result<Self, BushouError> {
        let re = Regex::new(r"^([^:\s]+):[^(]*\(([^)]*)\)\s*$")?;

        let parts: HashMap<String, Vec<String>> = text
            .par_lines()
            .filter_map(|line| {
                let caps = re.captures(line.trim_start_matches('\u{feff}'))?;
                let components = caps[2]
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect();
                Some((caps[1].to_string(), components))
            })
            .collect();

        Ok(Self { parts })
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn contains(&self, character: &str) -> bool {
        self.parts.contains_key(character)
    }

    fn children(&self, component: &str) -> &[String] {
        self.parts.get(component).map_or(&[], Vec::as_slice)
    }

    fn is_atomic(&self, component: &str) -> bool {
        self.children(component).is_empty()
    }

    /// Components of `character` at the given level. `is_radical` marks the
    /// glyphs where a radical-level breakdown stops.
    pub fn decompose<F>(
        &self,
        character: &str,
        level: DecompositionLevel,
        is_radical: F,
    ) -> Result<Vec<String>, BushouError>
    where
        F: Fn(&str) -> bool,
    {
        let mut out = Vec::new();
        for child in self.children(character) {
            self.collect(child, level, &is_radical, 0, &mut out)?;
        }
        Ok(out)
    }

    fn collect<F>(
        &self,
        component: &str,
        level: DecompositionLevel,
        is_radical: &F,
        depth: usize,
        out: &mut Vec<String>,
    ) -> Result<(), BushouError>
    where
        F: Fn(&str) -> bool,
    {
        if depth > MAX_DEPTH {
            return Err(BushouError::Custom(format!(
                "Decomposition of {} exceeds depth {}",
                component, MAX_DEPTH
            )));
        }

        let stop = if is_intermediate(component) {
            false
        } else {
            match level {
                DecompositionLevel::Once => true,
                DecompositionLevel::Radical => is_radical(component) || self.is_atomic(component),
                DecompositionLevel::Graphical => self.is_atomic(component),
            }
        };

        if stop {
            out.push(component.to_string());
            return Ok(());
        }

        for child in self.children(component) {
            self.collect(child, level, is_radical, depth + 1, out)?;
        }
        Ok(())
    }

    /// Every encoded component reachable from `character`, intermediate
    /// shapes included in the walk but not in the result.
    pub fn closure(&self, character: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<&str> = self.children(character).iter().map(String::as_str).collect();

        while let Some(component) = stack.pop() {
            if !visited.insert(component) {
                continue;
            }
            if !is_intermediate(component) {
                seen.insert(component.to_string());
            }
            stack.extend(self.children(component).iter().map(String::as_str));
        }

        seen
    }

    /// Component glyph -> encoded characters containing it anywhere in their
    /// decomposition. Character lists are unordered.
    pub fn containing_index(&self) -> HashMap<String, Vec<String>> {
        let pairs: Vec<(String, BTreeSet<String>)> = self
            .parts
            .par_iter()
            .filter(|(character, _)| !is_intermediate(character))
            .map(|(character, _)| (character.clone(), self.closure(character)))
            .collect();

        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for (character, components) in pairs {
            for component in components {
                index.entry(component).or_default().push(character.clone());
            }
        }
        index
    }
}
