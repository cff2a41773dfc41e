use std::collections::HashMap;

use super::RadicalTable;
use crate::core::RadicalRecord;

/// Known positional, simplified and regional forms mapped to the primary glyph
/// of the radical they stand for. Applied after the variants written in the
/// radical table itself.
pub const VARIANT_ALIASES: &[(&str, &str)] = &[
    ("丨", "〡"),
    ("乚", "乙"),
    ("⺄", "乙"),
    ("丷", "八"),
    ("亻", "人"),
    ("刂", "刀"),
    ("⺈", "刀"),
    ("⺊", "卜"),
    ("㔾", "卩"),
    ("⺋", "卩"),
    ("⺌", "小"),
    ("⺍", "小"),
    ("尣", "尢"),
    ("兀", "尢"),
    ("彑", "彐"),
    ("⺕", "彐"),
    ("忄", "心"),
    ("⺗", "心"),
    ("扌", "手"),
    ("⺘", "手"),
    ("攵", "攴"),
    ("旡", "无"),
    ("歺", "歹"),
    ("母", "毋"),
    ("⺟", "毋"),
    ("氵", "水"),
    ("⺡", "水"),
    ("灬", "火"),
    ("爫", "爪"),
    ("⺥", "爪"),
    ("牜", "牛"),
    ("⺧", "牛"),
    ("犭", "犬"),
    ("王", "玉"),
    ("⺩", "玉"),
    ("礻", "示"),
    ("⺮", "竹"),
    ("纟", "糸"),
    ("⺲", "网"),
    ("⺶", "羊"),
    ("⺷", "羊"),
    ("耂", "老"),
    ("⺹", "老"),
    ("⺼", "肉"),
    ("艹", "艸"),
    ("⺾", "艸"),
    ("衤", "衣"),
    ("讠", "言"),
    ("訁", "言"),
    ("⻊", "足"),
    ("辶", "辵"),
    ("⻌", "辵"),
    ("⻍", "辵"),
    ("钅", "金"),
    ("釒", "金"),
    ("⻗", "雨"),
    ("⻘", "青"),
    ("饣", "食"),
    ("⻝", "食"),
    ("鱼", "魚"),
    ("鸟", "鳥"),
    ("卤", "鹵"),
    ("卥", "鹵"),
    ("麦", "麥"),
    ("黄", "黃"),
    ("黾", "黽"),
];

fn is_open_paren(c: char) -> bool {
    c == '(' || c == '（'
}

fn is_close_paren(c: char) -> bool {
    c == ')' || c == '）'
}

fn is_variant_separator(c: char) -> bool {
    matches!(c, ',' | '，' | '、')
}

/// The glyph before the first space or opening parenthesis.
pub fn primary_glyph(glyph: &str) -> &str {
    match glyph.find(|c: char| c == ' ' || is_open_paren(c)) {
        Some(end) => &glyph[..end],
        None => glyph,
    }
}

/// Every glyph form written in a radical's label: the primary glyph followed by
/// the separated tokens of the first parenthesized group. Empty tokens are dropped.
pub fn extract_variants(glyph: &str) -> Vec<String> {
    let mut variants = Vec::new();

    let primary = primary_glyph(glyph).trim();
    if !primary.is_empty() {
        variants.push(primary.to_string());
    }

    if let Some(open) = glyph.find(is_open_paren) {
        let inner_start = open + glyph[open..].chars().next().map_or(1, char::len_utf8);
        if let Some(close) = glyph[inner_start..].find(is_close_paren) {
            let inner = &glyph[inner_start..inner_start + close];
            variants.extend(
                inner
                    .split(is_variant_separator)
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string),
            );
        }
    }

    variants
}

/// Maps every glyph variant to the id of the radical that owns it.
///
/// Records are processed in table order and later writes win, so a glyph
/// claimed by two records resolves to the later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantIndex {
    map: HashMap<String, u32>,
}

impl VariantIndex {
    pub fn build(table: &RadicalTable) -> Self {
        Self::build_with_aliases(table.records(), VARIANT_ALIASES)
    }

    pub fn build_with_aliases(records: &[RadicalRecord], aliases: &[(&str, &str)]) -> Self {
        let mut map = HashMap::new();

        for record in records {
            for variant in record.variants() {
                map.insert(variant, record.id);
            }

            let primary = record.primary_glyph();
            for (alias, canonical) in aliases {
                if *canonical == primary {
                    map.insert(alias.to_string(), record.id);
                }
            }
        }

        Self { map }
    }

    pub fn lookup(&self, glyph: &str) -> Option<u32> {
        self.map.get(glyph).copied()
    }

    pub fn contains(&self, glyph: &str) -> bool {
        self.map.contains_key(glyph)
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_glyph() {
        assert_eq!(primary_glyph("人 (亻)"), "人");
        assert_eq!(primary_glyph("水(氵、氺)"), "水");
        assert_eq!(primary_glyph("无（旡）"), "无");
        assert_eq!(primary_glyph("一"), "一");
    }

    #[test]
    fn test_extract_variants() {
        assert_eq!(extract_variants("人 (亻)"), vec!["人", "亻"]);
        assert_eq!(extract_variants("水(氵、氺)"), vec!["水", "氵", "氺"]);
        assert_eq!(extract_variants("齒(齿, 歯 )"), vec!["齒", "齿", "歯"]);
        assert_eq!(extract_variants("糸 (糹, 纟)"), vec!["糸", "糹", "纟"]);
        assert_eq!(extract_variants("疋( 匹)"), vec!["疋", "匹"]);
        assert_eq!(extract_variants("无（旡）"), vec!["无", "旡"]);
        assert_eq!(extract_variants("龠"), vec!["龠"]);
    }

    #[test]
    fn test_empty_tokens_are_dropped() {
        assert_eq!(extract_variants("网(, 罓)"), vec!["网", "罓"]);
        // An unterminated group contributes nothing
        assert_eq!(extract_variants("門 (门"), vec!["門"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let table = RadicalTable::builtin().unwrap();
        assert_eq!(VariantIndex::build(&table), VariantIndex::build(&table));
    }

    #[test]
    fn test_aliases_follow_canonical_primary() {
        let table = RadicalTable::builtin().unwrap();
        let index = VariantIndex::build(&table);

        assert_eq!(index.lookup("氵"), Some(85));
        assert_eq!(index.lookup("扌"), Some(64));
        assert_eq!(index.lookup("讠"), Some(149));
        assert_eq!(index.lookup("丨"), Some(2));
        assert_eq!(index.lookup("爫"), Some(87));
        assert_eq!(index.lookup("𠂇"), None);
    }

    #[test]
    fn test_later_record_wins_collisions() {
        let table = RadicalTable::builtin().unwrap();
        let index = VariantIndex::build(&table);

        // 斗 is radical 68 and also listed as a variant of 鬥 (191)
        assert_eq!(index.lookup("斗"), Some(191));
    }

    #[test]
    fn test_every_variant_resolves_to_an_owner() {
        let table = RadicalTable::builtin().unwrap();
        let index = VariantIndex::build(&table);

        for record in table.records() {
            for variant in record.variants() {
                let owner = index.lookup(&variant).expect("variant must be indexed");
                let owner_record = table.get(owner).unwrap();
                assert!(
                    owner == record.id || owner_record.variants().contains(&variant),
                    "{} of radical {} resolved to unrelated radical {}",
                    variant,
                    record.id,
                    owner
                );
            }
        }
    }

    #[test]
    fn test_uncontested_variants_map_back_to_their_record() {
        let table = RadicalTable::builtin().unwrap();
        let index = VariantIndex::build(&table);

        let mut claims: HashMap<String, usize> = HashMap::new();
        for record in table.records() {
            for variant in record.variants() {
                *claims.entry(variant).or_default() += 1;
            }
        }

        for record in table.records() {
            for variant in record.variants() {
                if claims[&variant] == 1 && !VARIANT_ALIASES.iter().any(|(a, _)| *a == variant) {
                    assert_eq!(index.lookup(&variant), Some(record.id), "variant {}", variant);
                }
            }
        }
    }
}
