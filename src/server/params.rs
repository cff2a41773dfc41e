use serde::Deserialize;

use super::response::ApiError;
use crate::{
    api::{
        DecompositionLevel,
        ScriptVariant,
        SearchMode,
    },
    core::utils::is_single_character,
};

#[derive(Debug, Default, Deserialize)]
pub struct DecomposeParams {
    pub ch: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextLevelParams {
    pub text: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CharVariantParams {
    #[serde(rename = "char")]
    pub character: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextVariantParams {
    pub text: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CharParams {
    #[serde(rename = "char")]
    pub character: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextModeParams {
    pub text: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuickSearchParams {
    pub q: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComponentParams {
    pub component: Option<String>,
}

pub fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// The trimmed value when it is exactly one character.
pub fn single_character(value: Option<String>, message: &str) -> Result<String, ApiError> {
    let value = trimmed(value);
    if is_single_character(&value) {
        Ok(value)
    } else {
        Err(ApiError::invalid(message))
    }
}

/// The raw, untrimmed text when it is non-empty.
pub fn required_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::invalid(message)),
    }
}

/// `None` when no level was given. Any other value must be 1, 2 or 3.
pub fn level(value: Option<String>) -> Result<Option<DecompositionLevel>, ApiError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<u8>()
        .ok()
        .and_then(DecompositionLevel::from_number)
        .map(Some)
        .ok_or_else(|| ApiError::invalid("Invalid `level` (1|2|3)"))
}

pub fn variant(value: Option<String>) -> Result<ScriptVariant, ApiError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Ok(ScriptVariant::Simplified);
    }
    ScriptVariant::parse(&value).ok_or_else(|| ApiError::invalid("Invalid `variant` (s|t)"))
}

pub fn mode(value: Option<String>) -> Result<SearchMode, ApiError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Ok(SearchMode::All);
    }
    SearchMode::parse(&value).ok_or_else(|| ApiError::invalid("Invalid `mode` (all|only)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_single_character() {
        assert_eq!(single_character(some(" 爱 "), "x").unwrap(), "爱");
        assert_eq!(single_character(some("𠂇"), "x").unwrap(), "𠂇");
        assert!(single_character(some("爱你"), "x").is_err());
        assert!(single_character(some("  "), "x").is_err());
        assert!(single_character(None, "x").is_err());
    }

    #[test]
    fn test_required_text_is_not_trimmed() {
        assert_eq!(required_text(some(" 爱 "), "x").unwrap(), " 爱 ");
        assert!(required_text(some(""), "x").is_err());
        assert!(required_text(None, "x").is_err());
    }

    #[test]
    fn test_level() {
        assert_eq!(level(None).unwrap(), None);
        assert_eq!(level(some(" ")).unwrap(), None);
        assert_eq!(level(some("2")).unwrap(), Some(DecompositionLevel::Radical));
        assert!(level(some("4")).is_err());
        assert!(level(some("0")).is_err());
        assert!(level(some("two")).is_err());
    }

    #[test]
    fn test_variant_and_mode_defaults() {
        assert_eq!(variant(None).unwrap(), ScriptVariant::Simplified);
        assert_eq!(variant(some("t")).unwrap(), ScriptVariant::Traditional);
        assert!(variant(some("x")).is_err());

        assert_eq!(mode(None).unwrap(), SearchMode::All);
        assert_eq!(mode(some("only")).unwrap(), SearchMode::Only);
        assert!(mode(some("some")).is_err());
    }
}
