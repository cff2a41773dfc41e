use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::{
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
    carousel::{
        page,
        page_count,
    },
    Revision,
};
use crate::{
    client::{
        ClientError,
        HanziApi,
    },
    core::utils::lock,
    radicals::RadicalTable,
};

pub const CHARACTERS_PER_PAGE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    Loading,
    Loaded(Vec<String>),
    Error,
}

/// One page of a radical's characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPage {
    pub characters: Vec<String>,
    pub page: usize,
    pub page_count: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    lookups: HashMap<u32, LookupState>,
    shown: HashSet<u32>,
    pages: HashMap<u32, usize>,
}

/// Per-radical "characters containing this radical" lookups, fetched at most
/// once per session. Failures stay cached until an explicit retry.
pub struct CharacterCache {
    api: Arc<dyn HanziApi>,
    radicals: Arc<RadicalTable>,
    state: Mutex<CacheState>,
    revision: Revision,
    timeout: Duration,
}

impl CharacterCache {
    pub fn new(
        api: Arc<dyn HanziApi>,
        radicals: Arc<RadicalTable>,
        revision: Revision,
        timeout: Duration,
    ) -> Self {
        Self { api, radicals, state: Mutex::new(CacheState::default()), revision, timeout }
    }

    /// Current state without triggering a lookup. `None` means never requested.
    pub fn state(&self, id: u32) -> Option<LookupState> {
        lock(&self.state).lookups.get(&id).cloned()
    }

    /// Loaded characters, empty while loading or after a failure.
    pub fn characters(&self, id: u32) -> Vec<String> {
        match self.state(id) {
            Some(LookupState::Loaded(characters)) => characters,
            _ => Vec::new(),
        }
    }

    pub fn is_shown(&self, id: u32) -> bool {
        lock(&self.state).shown.contains(&id)
    }

    pub async fn request(&self, id: u32) -> LookupState {
        let glyph = {
            let mut state = lock(&self.state);
            if let Some(existing) = state.lookups.get(&id) {
                return existing.clone();
            }

            state.lookups.insert(id, LookupState::Loading);
            self.radicals.get(id).map(|r| r.primary_glyph().to_string())
        };
        self.revision.bump();
        let mut pending = PendingLookup { cache: self, id, settled: false };

        let outcome = match glyph {
            Some(glyph) => {
                debug!("Looking up characters containing {}", glyph);
                let result = tokio::time::timeout(
                    self.timeout,
                    self.api.characters_from_component(glyph.clone()),
                )
                .await
                .unwrap_or(Err(ClientError::Timeout));

                match result {
                    Ok(characters) => LookupState::Loaded(characters),
                    Err(e) => {
                        warn!("Character lookup for {} failed: {}", glyph, e);
                        LookupState::Error
                    }
                }
            }
            None => {
                warn!("Character lookup for unknown radical {}", id);
                LookupState::Error
            }
        };

        lock(&self.state).lookups.insert(id, outcome.clone());
        pending.settled = true;
        self.revision.bump();
        outcome
    }

    /// Clears a failed lookup and requests it again.
    pub async fn retry(&self, id: u32) -> LookupState {
        {
            let mut state = lock(&self.state);
            if state.lookups.get(&id) == Some(&LookupState::Error) {
                state.lookups.remove(&id);
            }
        }
        self.request(id).await
    }

    /// Shows or hides a radical's characters. Showing one that was never
    /// requested starts its lookup. Returns whether it is now shown.
    pub async fn toggle_visibility(&self, id: u32) -> bool {
        let (shown, needs_request) = {
            let mut state = lock(&self.state);
            let shown = if state.shown.remove(&id) {
                false
            } else {
                state.shown.insert(id);
                true
            };
            (shown, shown && !state.lookups.contains_key(&id))
        };
        self.revision.bump();

        if needs_request {
            self.request(id).await;
        }
        shown
    }

    pub fn page(&self, id: u32) -> CharacterPage {
        let state = lock(&self.state);
        let characters: &[String] = match state.lookups.get(&id) {
            Some(LookupState::Loaded(characters)) => characters,
            _ => &[],
        };

        let page_count = page_count(characters.len(), CHARACTERS_PER_PAGE);
        let current = match page_count {
            0 => 0,
            n => state.pages.get(&id).copied().unwrap_or(0) % n,
        };

        CharacterPage {
            characters: page(characters, current, CHARACTERS_PER_PAGE).to_vec(),
            page: current,
            page_count,
        }
    }

    pub fn next_page(&self, id: u32) {
        self.turn_page(id, true);
    }

    pub fn prev_page(&self, id: u32) {
        self.turn_page(id, false);
    }

    fn turn_page(&self, id: u32, forward: bool) {
        {
            let mut state = lock(&self.state);
            let total = match state.lookups.get(&id) {
                Some(LookupState::Loaded(characters)) => {
                    page_count(characters.len(), CHARACTERS_PER_PAGE)
                }
                _ => 0,
            };
            if total <= 1 {
                return;
            }

            let current = state.pages.get(&id).copied().unwrap_or(0) % total;
            let next = if forward { (current + 1) % total } else { (current + total - 1) % total };
            state.pages.insert(id, next);
        }
        self.revision.bump();
    }
}

/// Clears a `Loading` entry whose lookup was dropped before it settled, so
/// the next request starts over.
struct PendingLookup<'a> {
    cache: &'a CharacterCache,
    id: u32,
    settled: bool,
}

impl Drop for PendingLookup<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        {
            let mut state = lock(&self.cache.state);
            if state.lookups.get(&self.id) == Some(&LookupState::Loading) {
                debug!("Lookup for radical {} abandoned", self.id);
                state.lookups.remove(&self.id);
            }
        }
        self.cache.revision.bump();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use futures::FutureExt;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::{
        api::{
            DecompositionLevel,
            DictEntry,
            ScriptVariant,
            SearchMode,
        },
        client::ApiResult,
    };

    /// Answers character lookups from a script, optionally held until the
    /// gate releases a permit.
    struct ScriptedApi {
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<Vec<String>, ClientError>>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<Vec<String>, ClientError>>) -> Self {
            Self { calls: AtomicUsize::new(0), responses: Mutex::new(responses), gate: None }
        }

        fn gated(responses: Vec<Result<Vec<String>, ClientError>>, gate: Arc<Semaphore>) -> Self {
            Self { gate: Some(gate), ..Self::new(responses) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HanziApi for ScriptedApi {
        fn decompose(&self, _: String, _: DecompositionLevel) -> ApiResult<Vec<String>> {
            async { Ok(vec![]) }.boxed()
        }

        fn decompose_many(&self, _: String, _: DecompositionLevel) -> ApiResult<HashMap<String, Vec<String>>> {
            async { Ok(HashMap::new()) }.boxed()
        }

        fn define(&self, _: String, _: ScriptVariant) -> ApiResult<Vec<DictEntry>> {
            async { Ok(vec![]) }.boxed()
        }

        fn define_many(&self, _: String, _: ScriptVariant) -> ApiResult<HashMap<String, Vec<DictEntry>>> {
            async { Ok(HashMap::new()) }.boxed()
        }

        fn examples(&self, _: String) -> ApiResult<Vec<DictEntry>> {
            async { Ok(vec![]) }.boxed()
        }

        fn dictionary_search(&self, _: String, _: SearchMode) -> ApiResult<Vec<DictEntry>> {
            async { Ok(vec![]) }.boxed()
        }

        fn component_exists(&self, _: String) -> ApiResult<bool> {
            async { Ok(false) }.boxed()
        }

        fn characters_from_component(&self, _: String) -> ApiResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = {
                let mut responses = lock(&self.responses);
                if responses.is_empty() {
                    Ok(vec![])
                } else {
                    responses.remove(0)
                }
            };
            let gate = self.gate.clone();

            async move {
                if let Some(gate) = gate {
                    gate.acquire().await.expect("gate closed").forget();
                }
                response
            }
            .boxed()
        }
    }

    fn cache_with(api: Arc<ScriptedApi>) -> CharacterCache {
        let radicals = Arc::new(RadicalTable::builtin().unwrap());
        CharacterCache::new(api, radicals, Revision::new(), Duration::from_secs(10))
    }

    fn characters(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_concurrent_requests_issue_one_call() {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(ScriptedApi::gated(vec![Ok(characters(&["好", "妈"]))], gate.clone()));
        let cache = Arc::new(cache_with(api.clone()));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.request(38).await }
        });
        tokio::task::yield_now().await;
        while cache.state(38).is_none() {
            tokio::task::yield_now().await;
        }

        assert_eq!(cache.request(38).await, LookupState::Loading);
        gate.add_permits(1);

        assert_eq!(first.await.unwrap(), LookupState::Loaded(characters(&["好", "妈"])));
        assert_eq!(cache.request(38).await, LookupState::Loaded(characters(&["好", "妈"])));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_joined_requests_issue_one_call() {
        let api = Arc::new(ScriptedApi::new(vec![Ok(characters(&["好"]))]));
        let cache = cache_with(api.clone());

        let (a, b) = tokio::join!(cache.request(38), cache.request(38));
        assert_eq!(api.calls(), 1);
        assert!(matches!(a, LookupState::Loaded(_)));
        assert!(matches!(b, LookupState::Loading | LookupState::Loaded(_)));
    }

    #[tokio::test]
    async fn test_error_is_cached_until_retry() {
        let api = Arc::new(ScriptedApi::new(vec![
            Err(ClientError::Transport("offline".to_string())),
            Ok(characters(&["雪"])),
        ]));
        let cache = cache_with(api.clone());

        assert_eq!(cache.request(173).await, LookupState::Error);
        assert_eq!(cache.request(173).await, LookupState::Error);
        assert!(cache.characters(173).is_empty());
        assert_eq!(api.calls(), 1);

        assert_eq!(cache.retry(173).await, LookupState::Loaded(characters(&["雪"])));
        assert_eq!(api.calls(), 2);

        // Retrying a loaded radical reuses the cached list
        cache.retry(173).await;
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_loaded() {
        let api = Arc::new(ScriptedApi::new(vec![Ok(vec![])]));
        let cache = cache_with(api.clone());

        assert_eq!(cache.request(1).await, LookupState::Loaded(vec![]));
        assert_eq!(cache.request(1).await, LookupState::Loaded(vec![]));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error() {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(ScriptedApi::gated(vec![Ok(characters(&["好"]))], gate));
        let radicals = Arc::new(RadicalTable::builtin().unwrap());
        let cache = CharacterCache::new(api, radicals, Revision::new(), Duration::from_millis(20));

        assert_eq!(cache.request(38).await, LookupState::Error);
    }

    #[tokio::test]
    async fn test_toggle_visibility() {
        let api = Arc::new(ScriptedApi::new(vec![Ok(characters(&["好"]))]));
        let cache = cache_with(api.clone());

        assert!(cache.toggle_visibility(38).await);
        assert!(cache.is_shown(38));
        assert_eq!(api.calls(), 1);

        assert!(!cache.toggle_visibility(38).await);
        assert!(cache.toggle_visibility(38).await);
        assert_eq!(api.calls(), 1);

        // Other radicals are independent
        assert!(!cache.is_shown(39));
        assert_eq!(cache.state(39), None);
    }

    #[tokio::test]
    async fn test_toggling_during_lookup_issues_one_call() {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(ScriptedApi::gated(vec![Ok(characters(&["好"]))], gate.clone()));
        let cache = Arc::new(cache_with(api.clone()));

        let shown = tokio::spawn({
            let cache = cache.clone();
            async move { cache.toggle_visibility(38).await }
        });
        while cache.state(38) != Some(LookupState::Loading) {
            tokio::task::yield_now().await;
        }

        assert!(!cache.toggle_visibility(38).await);
        assert!(cache.toggle_visibility(38).await);
        assert_eq!(api.calls(), 1);

        gate.add_permits(1);
        assert!(shown.await.unwrap());
        assert!(cache.is_shown(38));
        assert_eq!(cache.state(38), Some(LookupState::Loaded(characters(&["好"]))));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_lookup_can_be_requested_again() {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(ScriptedApi::gated(
            vec![Ok(characters(&["好"])), Ok(characters(&["好", "妈"]))],
            gate.clone(),
        ));
        let cache = cache_with(api.clone());

        let abandoned = tokio::time::timeout(Duration::from_millis(20), cache.request(38)).await;
        assert!(abandoned.is_err());
        assert_eq!(cache.state(38), None);

        gate.add_permits(1);
        assert_eq!(cache.request(38).await, LookupState::Loaded(characters(&["好", "妈"])));
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_paging_wraps() {
        let list: Vec<String> = (0..20).map(|i| char::from_u32(0x4E00 + i).unwrap().to_string()).collect();
        let api = Arc::new(ScriptedApi::new(vec![Ok(list.clone())]));
        let cache = cache_with(api);
        cache.request(1).await;

        let first = cache.page(1);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.characters, list[0..8].to_vec());

        cache.prev_page(1);
        let last = cache.page(1);
        assert_eq!(last.page, 2);
        assert_eq!(last.characters, list[16..20].to_vec());

        cache.next_page(1);
        assert_eq!(cache.page(1).page, 0);
    }

    #[tokio::test]
    async fn test_mutations_bump_revision() {
        let api = Arc::new(ScriptedApi::new(vec![Ok(characters(&["好"]))]));
        let radicals = Arc::new(RadicalTable::builtin().unwrap());
        let revision = Revision::new();
        let cache = CharacterCache::new(api, radicals, revision.clone(), Duration::from_secs(10));

        cache.request(38).await;
        assert_eq!(revision.current(), 2); // loading, then loaded

        cache.request(38).await;
        assert_eq!(revision.current(), 2);
    }
}
