use std::{
    collections::HashMap,
    sync::Arc,
};

use axum::{
    extract::{
        Query,
        State,
    },
    response::Response,
};
use log::debug;

use super::{
    params::{
        self,
        CharParams,
        CharVariantParams,
        ComponentParams,
        DecomposeParams,
        QuickSearchParams,
        TextLevelParams,
        TextModeParams,
        TextVariantParams,
    },
    response::{
        cached_json,
        ApiError,
        CACHE_LONG_SECS,
        CACHE_SHORT_SECS,
    },
    AppState,
};
use crate::{
    api::{
        CharactersFromComponentResponse,
        ComponentExistsResponse,
        DecomposeAllResponse,
        DecomposeLevelResponse,
        DecomposeManyResponse,
        DecompositionLevel,
        DefineManyResponse,
        DefineResponse,
        DictionarySearchResponse,
        ExamplesResponse,
        QuickSearchResponse,
        SearchMode,
    },
    core::BushouError,
    dictionary::HanziEngine,
};

/// Runs an engine call off the async workers. A failure or a panic inside the
/// engine becomes an upstream error tagged with `code`.
async fn with_engine<T, F>(state: &AppState, code: &'static str, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn HanziEngine) -> Result<T, BushouError> + Send + 'static,
{
    let engine: Arc<dyn HanziEngine> = state.engine.clone();
    tokio::task::spawn_blocking(move || op(engine.as_ref()))
        .await
        .map_err(|e| ApiError::upstream(code, e))?
        .map_err(|e| ApiError::upstream(code, e))
}

pub async fn decompose(
    State(state): State<AppState>,
    Query(query): Query<DecomposeParams>,
) -> Result<Response, ApiError> {
    let ch = params::single_character(query.ch, "Provide exactly one CJK character in `ch`")?;
    let level = params::level(query.level)?;
    debug!("decompose {} at {:?}", ch, level);

    let response = match level {
        Some(level) => {
            let target = ch.clone();
            let components =
                with_engine(&state, "decompose_failed", move |e| e.decompose(&target, level)).await?;
            cached_json(CACHE_LONG_SECS, DecomposeLevelResponse { ch, level, components })
        }
        None => {
            let target = ch.clone();
            let [components1, components2, components3] =
                with_engine(&state, "decompose_failed", move |e| {
                    Ok([
                        e.decompose(&target, DecompositionLevel::Once)?,
                        e.decompose(&target, DecompositionLevel::Radical)?,
                        e.decompose(&target, DecompositionLevel::Graphical)?,
                    ])
                })
                .await?;
            cached_json(
                CACHE_LONG_SECS,
                DecomposeAllResponse { ch, components1, components2, components3 },
            )
        }
    };

    Ok(response)
}

pub async fn decompose_many(
    State(state): State<AppState>,
    Query(query): Query<TextLevelParams>,
) -> Result<Response, ApiError> {
    let text = params::required_text(query.text, "Provide `text` (string of characters)")?;
    let level = params::level(query.level)?.unwrap_or(DecompositionLevel::Radical);
    debug!("decompose-many {:?} at {:?}", text, level);

    let result = with_engine(&state, "decompose_many_failed", move |e| {
        let mut result = HashMap::new();
        for ch in text.chars().map(String::from) {
            let components = e.decompose(&ch, level)?;
            result.insert(ch, components);
        }
        Ok(result)
    })
    .await?;

    Ok(cached_json(CACHE_LONG_SECS, DecomposeManyResponse { level, result }))
}

pub async fn define(
    State(state): State<AppState>,
    Query(query): Query<CharVariantParams>,
) -> Result<Response, ApiError> {
    let character =
        params::single_character(query.character, "Provide exactly one character in `char`")?;
    let variant = params::variant(query.variant)?;
    debug!("define {} ({})", character, variant.as_str());

    let target = character.clone();
    let entries =
        with_engine(&state, "define_failed", move |e| e.definition_lookup(&target, variant)).await?;

    Ok(cached_json(CACHE_SHORT_SECS, DefineResponse { character, variant, entries }))
}

pub async fn define_many(
    State(state): State<AppState>,
    Query(query): Query<TextVariantParams>,
) -> Result<Response, ApiError> {
    let text = params::required_text(query.text, "Provide `text` (string of characters)")?;
    let variant = params::variant(query.variant)?;
    debug!("define-many {:?} ({})", text, variant.as_str());

    let target = text.clone();
    let result = with_engine(&state, "define_many_failed", move |e| {
        let mut result = HashMap::new();
        for ch in target.chars().map(String::from) {
            let entries = e.definition_lookup(&ch, variant)?;
            result.insert(ch, entries);
        }
        Ok(result)
    })
    .await?;

    Ok(cached_json(CACHE_SHORT_SECS, DefineManyResponse { text, variant, result }))
}

pub async fn examples(
    State(state): State<AppState>,
    Query(query): Query<CharParams>,
) -> Result<Response, ApiError> {
    let character =
        params::single_character(query.character, "Provide exactly one character in `char`")?;
    debug!("examples {}", character);

    let target = character.clone();
    let examples = with_engine(&state, "examples_failed", move |e| e.examples(&target)).await?;

    Ok(cached_json(CACHE_SHORT_SECS, ExamplesResponse { character, examples }))
}

pub async fn dictionary_search(
    State(state): State<AppState>,
    Query(query): Query<TextModeParams>,
) -> Result<Response, ApiError> {
    let text = params::trimmed(query.text);
    if text.is_empty() {
        return Err(ApiError::invalid("Provide `text` (string to search in dictionary)"));
    }
    let mode = params::mode(query.mode)?;
    debug!("dictionary-search {:?} ({})", text, mode.as_str());

    let target = text.clone();
    let results =
        with_engine(&state, "dictionary_search_failed", move |e| e.dictionary_search(&target, mode))
            .await?;

    let count = results.len();
    Ok(cached_json(CACHE_SHORT_SECS, DictionarySearchResponse { text, mode, results, count }))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<QuickSearchParams>,
) -> Result<Response, ApiError> {
    let q = params::trimmed(query.q);
    if q.is_empty() {
        return Err(ApiError::invalid("Provide `q`"));
    }
    // Anything but "only" searches in containment mode
    let mode = match params::trimmed(query.mode).as_str() {
        "only" => SearchMode::Only,
        _ => SearchMode::All,
    };
    debug!("search {:?} ({})", q, mode.as_str());

    let target = q.clone();
    let results =
        with_engine(&state, "search_failed", move |e| e.dictionary_search(&target, mode)).await?;

    Ok(cached_json(CACHE_SHORT_SECS, QuickSearchResponse { q, mode, results }))
}

pub async fn component_exists(
    State(state): State<AppState>,
    Query(query): Query<ComponentParams>,
) -> Result<Response, ApiError> {
    let component = params::single_character(
        query.component,
        "Provide exactly one component char in `component`",
    )?;
    debug!("component-exists {}", component);

    let target = component.clone();
    let exists =
        with_engine(&state, "component_exists_failed", move |e| e.component_exists(&target)).await?;

    Ok(cached_json(CACHE_LONG_SECS, ComponentExistsResponse { component, exists }))
}

pub async fn characters_from_component(
    State(state): State<AppState>,
    Query(query): Query<ComponentParams>,
) -> Result<Response, ApiError> {
    let component = params::single_character(
        query.component,
        "Provide exactly one component character in `component`",
    )?;
    debug!("characters-from-component {}", component);

    let target = component.clone();
    let characters = with_engine(&state, "characters_from_component_failed", move |e| {
        e.characters_with_component(&target)
    })
    .await?;

    Ok(cached_json(CACHE_SHORT_SECS, CharactersFromComponentResponse { component, characters }))
}

pub async fn radicals(State(state): State<AppState>) -> Response {
    cached_json(CACHE_LONG_SECS, state.radicals.records())
}
