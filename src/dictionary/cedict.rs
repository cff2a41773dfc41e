use rayon::prelude::*;
use regex::Regex;

use crate::{
    api::DictEntry,
    core::BushouError,
};

pub const CEDICT_FILE: &str = "cedict_ts.u8";

/// Parses CC-CEDICT text (`Trad Simp [pin1 yin1] /def1/def2/`).
/// Comment lines and lines that do not match the format are skipped.
pub fn parse_cedict(text: &str) -> Result<Vec<DictEntry>, BushouError> {
    let re = Regex::new(r"^(\S+)\s+(\S+)\s+\[([^\]]*)\]\s+/(.*)/\s*$")?;

    let entries: Vec<DictEntry> = text
        .par_lines()
        .filter_map(|line| {
            let line = line.trim_start_matches('\u{feff}');
            if line.starts_with('#') || line.trim().is_empty() {
                return None;
            }

            let caps = re.captures(line)?;
            let definition = caps[4].trim_matches('/').to_string();
            if definition.is_empty() {
                return None;
            }

            Some(DictEntry {
                traditional: caps[1].to_string(),
                simplified: caps[2].to_string(),
                pinyin: caps[3].trim().to_string(),
                definition,
            })
        })
        .collect();

    Ok(entries)
}
