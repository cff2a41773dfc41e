use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

static SYLLABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[uU]:|[a-zA-ZüÜ])+[1-5]?").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]+[1-5]").unwrap());

const TONES_A: [char; 5] = ['ā', 'á', 'ǎ', 'à', 'a'];
const TONES_E: [char; 5] = ['ē', 'é', 'ě', 'è', 'e'];
const TONES_I: [char; 5] = ['ī', 'í', 'ǐ', 'ì', 'i'];
const TONES_O: [char; 5] = ['ō', 'ó', 'ǒ', 'ò', 'o'];
const TONES_U: [char; 5] = ['ū', 'ú', 'ǔ', 'ù', 'u'];
const TONES_V: [char; 5] = ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü'];

fn tone_marks(vowel: char) -> Option<&'static [char; 5]> {
    match vowel {
        'a' => Some(&TONES_A),
        'e' => Some(&TONES_E),
        'i' => Some(&TONES_I),
        'o' => Some(&TONES_O),
        'u' => Some(&TONES_U),
        'ü' => Some(&TONES_V),
        _ => None,
    }
}

/// "nv3" -> "nǚ". Syllables without a tone number are returned unchanged.
fn convert_syllable(syllable: &str) -> String {
    let Some(last) = syllable.chars().last() else {
        return String::new();
    };
    let Some(tone) = last.to_digit(10).filter(|d| (1..=5).contains(d)) else {
        return syllable.to_string();
    };
    let tone = tone as usize - 1;

    let letters: Vec<char> = syllable[..syllable.len() - 1]
        .to_lowercase()
        .replace("u:", "ü")
        .replace('v', "ü")
        .chars()
        .collect();

    // a or e takes the mark, then the o of "ou", then the last vowel
    let target = letters
        .iter()
        .position(|&c| c == 'a')
        .or_else(|| letters.iter().position(|&c| c == 'e'))
        .or_else(|| letters.windows(2).position(|w| w == ['o', 'u']))
        .or_else(|| letters.iter().rposition(|&c| matches!(c, 'i' | 'o' | 'u' | 'ü')));

    letters
        .iter()
        .enumerate()
        .map(|(i, &c)| match (Some(i) == target, tone_marks(c)) {
            (true, Some(marks)) => marks[tone],
            _ => c,
        })
        .collect()
}

pub trait ToneMarks {
    fn to_tone_marks(&self) -> String;
}

/// "bu4 dao4" -> "bù dào". Delimiters and unrecognised text are kept.
impl ToneMarks for str {
    fn to_tone_marks(&self) -> String {
        SYLLABLE.replace_all(self, |caps: &Captures| convert_syllable(&caps[0])).to_string()
    }
}

impl ToneMarks for String {
    fn to_tone_marks(&self) -> String {
        self.as_str().to_tone_marks()
    }
}

pub fn convert_pinyin_tones(pinyin: &str) -> String {
    pinyin.to_tone_marks()
}

pub fn has_numbered_pinyin(text: &str) -> bool {
    NUMBERED.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_pinyin_tones() {
        assert_eq!(convert_pinyin_tones("ni3 hao3"), "nǐ hǎo");
        assert_eq!(convert_pinyin_tones("bu4 dao4 chang2"), "bù dào cháng");
        assert_eq!(convert_pinyin_tones("bu4dao4"), "bùdào");
        assert_eq!(convert_pinyin_tones("xue3/ai4"), "xuě/ài");
    }

    #[test]
    fn test_placement_rules() {
        assert_eq!(convert_pinyin_tones("zhou1"), "zhōu");
        assert_eq!(convert_pinyin_tones("gui4"), "guì");
        assert_eq!(convert_pinyin_tones("liu2"), "liú");
        assert_eq!(convert_pinyin_tones("nv3"), "nǚ");
        assert_eq!(convert_pinyin_tones("lu:4"), "lǜ");
        assert_eq!(convert_pinyin_tones("Xue3"), "xuě");
    }

    #[test]
    fn test_neutral_and_untoned() {
        assert_eq!(convert_pinyin_tones("ren5"), "ren");
        assert_eq!(convert_pinyin_tones("ma"), "ma");
        assert_eq!(convert_pinyin_tones("A"), "A");
        assert_eq!(convert_pinyin_tones(""), "");
    }

    #[test]
    fn test_has_numbered_pinyin() {
        assert!(has_numbered_pinyin("ai4 ren5"));
        assert!(!has_numbered_pinyin("ài rén"));
        assert!(!has_numbered_pinyin("123"));
    }
}
