use std::{
    collections::HashSet,
    sync::{
        atomic::{
            AtomicU64,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Duration,
};

use log::{
    debug,
    warn,
};

use super::{
    carousel::Cursor,
    Revision,
};
use crate::{
    api::{
        DecompositionLevel,
        DictEntry,
        ScriptVariant,
        SearchMode,
    },
    client::{
        ApiResult,
        ClientError,
        HanziApi,
    },
    core::utils::{
        is_cjk,
        lock,
    },
    radicals::VariantIndex,
};

/// Outcome of one result category of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Category<T> {
    #[default]
    Pending,
    Loaded(T),
    Failed(String),
}

impl<T> Category<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Category::Pending)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Category::Loaded(value) => Some(value),
            _ => None,
        }
    }

    fn from_result(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => Category::Loaded(value),
            Err(e) => Category::Failed(e.to_string()),
        }
    }
}

impl<T> Category<Vec<T>> {
    /// Loaded items; pending and failed categories read as empty.
    pub fn items(&self) -> &[T] {
        self.loaded().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDefinitions {
    pub character: String,
    pub entries: Vec<DictEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carousel {
    Radicals,
    Examples,
    Dictionary,
}

/// Results of the latest search. Replaced wholesale by every new search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    pub token: u64,
    pub radicals: Category<Vec<u32>>,
    pub definitions: Category<Vec<CharacterDefinitions>>,
    pub examples: Category<Vec<DictEntry>>,
    pub dictionary: Category<Vec<DictEntry>>,
    pub radical_cursor: Cursor,
    pub example_cursor: Cursor,
    pub dictionary_cursor: Cursor,
}

impl SearchSession {
    fn started(query: String, token: u64) -> Self {
        Self { query, token, ..Self::default() }
    }

    pub fn is_idle(&self) -> bool {
        self.query.is_empty()
    }

    /// Every category has settled, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.is_idle()
            || (self.radicals.is_settled()
                && self.definitions.is_settled()
                && self.examples.is_settled()
                && self.dictionary.is_settled())
    }

    fn len_of(&self, carousel: Carousel) -> usize {
        match carousel {
            Carousel::Radicals => self.radicals.items().len(),
            Carousel::Examples => self.examples.items().len(),
            Carousel::Dictionary => self.dictionary.items().len(),
        }
    }

    fn cursor_mut(&mut self, carousel: Carousel) -> &mut Cursor {
        match carousel {
            Carousel::Radicals => &mut self.radical_cursor,
            Carousel::Examples => &mut self.example_cursor,
            Carousel::Dictionary => &mut self.dictionary_cursor,
        }
    }

    pub fn position(&self, carousel: Carousel) -> usize {
        let len = self.len_of(carousel);
        match carousel {
            Carousel::Radicals => self.radical_cursor.index(len),
            Carousel::Examples => self.example_cursor.index(len),
            Carousel::Dictionary => self.dictionary_cursor.index(len),
        }
    }
}

/// Query characters, whitespace removed.
fn query_characters(query: &str) -> Vec<String> {
    query.chars().filter(|c| !c.is_whitespace()).map(String::from).collect()
}

/// Runs searches against the query API. Each search takes a fresh token and
/// results carrying an older token are dropped, so the latest search wins.
pub struct SearchController {
    api: Arc<dyn HanziApi>,
    variants: Arc<VariantIndex>,
    latest: AtomicU64,
    session: Mutex<SearchSession>,
    revision: Revision,
    timeout: Duration,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn HanziApi>,
        variants: Arc<VariantIndex>,
        revision: Revision,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            variants,
            latest: AtomicU64::new(0),
            session: Mutex::new(SearchSession::default()),
            revision,
            timeout,
        }
    }

    pub fn snapshot(&self) -> SearchSession {
        lock(&self.session).clone()
    }

    async fn call<T>(&self, request: ApiResult<T>) -> Result<T, ClientError> {
        tokio::time::timeout(self.timeout, request).await.unwrap_or(Err(ClientError::Timeout))
    }

    /// Applies `update` only if `token` is still the current search.
    fn apply<F>(&self, token: u64, update: F) -> bool
    where
        F: FnOnce(&mut SearchSession),
    {
        {
            let mut session = lock(&self.session);
            if session.token != token {
                debug!("Dropping results of superseded search {}", token);
                return false;
            }
            update(&mut session);
        }
        self.revision.bump();
        true
    }

    /// Starts a new search, superseding any in flight, and resolves once all
    /// of its categories have settled. Returns the search token.
    pub async fn search(&self, query: &str) -> u64 {
        let query = query.trim().to_string();
        let token = self.start_session(query.clone());

        let characters = query_characters(&query);
        if characters.is_empty() {
            return token;
        }
        debug!("Search {} for {:?}", token, query);

        tokio::join!(
            self.load_radicals(token, &characters),
            self.load_definitions(token, &characters),
            self.load_examples(token, &characters),
            self.load_dictionary(token, &query),
        );
        token
    }

    /// Searches for a single character picked from a result carousel.
    pub async fn open_character(&self, character: &str) -> u64 {
        self.search(character).await
    }

    /// Clears the session; pending results of earlier searches are dropped.
    pub fn clear(&self) {
        self.start_session(String::new());
    }

    /// Tokens are taken under the session lock so the stored session always
    /// belongs to the newest token.
    fn start_session(&self, query: String) -> u64 {
        let token = {
            let mut session = lock(&self.session);
            let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *session = SearchSession::started(query, token);
            token
        };
        self.revision.bump();
        token
    }

    async fn load_radicals(&self, token: u64, characters: &[String]) {
        let components: Result<Vec<String>, ClientError> = if characters.len() > 1 {
            self.call(self.api.decompose_many(characters.concat(), DecompositionLevel::Radical))
                .await
                .map(|mut by_character| {
                    characters
                        .iter()
                        .flat_map(|c| by_character.remove(c).unwrap_or_default())
                        .collect()
                })
        } else {
            self.call(self.api.decompose(characters[0].clone(), DecompositionLevel::Radical)).await
        };

        let radicals = components.map(|components| {
            let mut seen = HashSet::new();
            components
                .iter()
                .filter_map(|component| self.variants.lookup(component))
                .filter(|id| seen.insert(*id))
                .collect::<Vec<u32>>()
        });
        if let Err(e) = &radicals {
            warn!("Decomposition for search {} failed: {}", token, e);
        }

        self.apply(token, |session| session.radicals = Category::from_result(radicals));
    }

    async fn load_definitions(&self, token: u64, characters: &[String]) {
        let definitions: Result<Vec<CharacterDefinitions>, ClientError> = if characters.len() > 1 {
            self.call(self.api.define_many(characters.concat(), ScriptVariant::Simplified)).await.map(
                |mut by_character| {
                    characters
                        .iter()
                        .filter_map(|c| {
                            by_character
                                .remove(c)
                                .map(|entries| CharacterDefinitions { character: c.clone(), entries })
                        })
                        .collect()
                },
            )
        } else {
            let character = characters[0].clone();
            self.call(self.api.define(character.clone(), ScriptVariant::Simplified))
                .await
                .map(|entries| vec![CharacterDefinitions { character, entries }])
        };
        if let Err(e) = &definitions {
            warn!("Definitions for search {} failed: {}", token, e);
        }

        self.apply(token, |session| session.definitions = Category::from_result(definitions));
    }

    /// Examples are only fetched for the first CJK character of the query.
    async fn load_examples(&self, token: u64, characters: &[String]) {
        let first_cjk = characters.iter().find(|c| c.chars().next().is_some_and(is_cjk)).cloned();

        let examples = match first_cjk {
            Some(character) => self.call(self.api.examples(character)).await,
            None => Ok(Vec::new()),
        };
        if let Err(e) = &examples {
            warn!("Examples for search {} failed: {}", token, e);
        }

        self.apply(token, |session| session.examples = Category::from_result(examples));
    }

    async fn load_dictionary(&self, token: u64, query: &str) {
        let results = self.call(self.api.dictionary_search(query.to_string(), SearchMode::All)).await;
        if let Err(e) = &results {
            warn!("Dictionary search {} failed: {}", token, e);
        }

        self.apply(token, |session| session.dictionary = Category::from_result(results));
    }

    pub fn next(&self, carousel: Carousel) {
        self.move_cursor(carousel, true);
    }

    pub fn prev(&self, carousel: Carousel) {
        self.move_cursor(carousel, false);
    }

    fn move_cursor(&self, carousel: Carousel, forward: bool) {
        {
            let mut session = lock(&self.session);
            let len = session.len_of(carousel);
            if len == 0 {
                return;
            }
            let cursor = session.cursor_mut(carousel);
            if forward {
                cursor.next(len);
            } else {
                cursor.prev(len);
            }
        }
        self.revision.bump();
    }
}
