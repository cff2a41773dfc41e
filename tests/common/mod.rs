#![allow(dead_code)]

use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
};

use bushou::{
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
    core::BushouError,
    dictionary::{
        HanziDictionary,
        HanziEngine,
    },
    radicals::{
        RadicalTable,
        VariantIndex,
    },
    server::AppState,
};
use futures::FutureExt;
use tokio::sync::watch;

pub const CEDICT: &str = "# CC-CEDICT sample\n\
    愛 爱 [ai4] /to love/to be fond of/\n\
    愛人 爱人 [ai4 ren5] /spouse/lover/\n\
    愛情 爱情 [ai4 qing2] /romance/love/\n\
    可愛 可爱 [ke3 ai4] /adorable/cute/\n\
    雪 雪 [xue3] /snow/\n\
    雪人 雪人 [xue3 ren2] /snowman/\n\
    下雪 下雪 [xia4 xue3] /to snow/\n\
    好 好 [hao3] /good/well/\n\
    你好 你好 [ni3 hao3] /hello/\n";

pub const DECOMPOSITION: &str = "爱:a(爫,1001)\n\
    1001:a(冖,友)\n\
    友:a(𠂇,又)\n\
    雪:d(⻗,彐)\n\
    好:a(女,子)\n";

pub const FREQUENCY: &str = "可爱\t800\n爱情\t500\n爱人\t300\n你好\t900\n";

pub fn radicals() -> Arc<RadicalTable> {
    Arc::new(RadicalTable::builtin().unwrap())
}

pub fn dictionary() -> HanziDictionary {
    let variants = VariantIndex::build(&radicals());
    HanziDictionary::from_sources(CEDICT, DECOMPOSITION, Some(FREQUENCY), &variants).unwrap()
}

pub fn app_state() -> AppState {
    AppState::new(Arc::new(dictionary()), radicals())
}

/// Engine whose every call fails, standing in for a broken data load.
pub struct FailingEngine;

fn broken<T>() -> Result<T, BushouError> {
    Err(BushouError::Custom("dictionary unavailable".to_string()))
}

impl HanziEngine for FailingEngine {
    fn decompose(&self, _: &str, _: DecompositionLevel) -> Result<Vec<String>, BushouError> {
        broken()
    }

    fn definition_lookup(&self, _: &str, _: ScriptVariant) -> Result<Vec<DictEntry>, BushouError> {
        broken()
    }

    fn examples(&self, _: &str) -> Result<Vec<DictEntry>, BushouError> {
        broken()
    }

    fn dictionary_search(&self, _: &str, _: SearchMode) -> Result<Vec<DictEntry>, BushouError> {
        broken()
    }

    fn component_exists(&self, _: &str) -> Result<bool, BushouError> {
        broken()
    }

    fn characters_with_component(&self, _: &str) -> Result<Vec<String>, BushouError> {
        broken()
    }
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(FailingEngine), radicals())
}

/// In-process `HanziApi` answering from the sample dictionary. Calls for a
/// gated text wait until the gate opens; named operations can be made to fail.
pub struct DictionaryApi {
    engine: Arc<HanziDictionary>,
    gates: Mutex<HashMap<String, watch::Receiver<bool>>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: AtomicUsize,
}

impl DictionaryApi {
    pub fn new() -> Self {
        Self {
            engine: Arc::new(dictionary()),
            gates: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Holds every call for `text` until the returned sender sends `true`.
    pub fn gate(&self, text: &str) -> watch::Sender<bool> {
        let (sender, receiver) = watch::channel(false);
        self.gates.lock().unwrap().insert(text.to_string(), receiver);
        sender
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T, F>(&self, operation: &'static str, key: &str, answer: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&HanziDictionary) -> Result<T, BushouError> + Send + 'static,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(key).cloned();
        let fails = self.failing.lock().unwrap().contains(operation);
        let engine = self.engine.clone();

        async move {
            if let Some(mut gate) = gate {
                let _ = gate.wait_for(|open| *open).await;
            }
            if fails {
                return Err(ClientError::Status {
                    status: 500,
                    message: format!("{}_failed", operation),
                });
            }
            answer(&engine).map_err(|e| ClientError::Transport(e.to_string()))
        }
        .boxed()
    }
}

impl HanziApi for DictionaryApi {
    fn decompose(&self, ch: String, level: DecompositionLevel) -> ApiResult<Vec<String>> {
        let key = ch.clone();
        self.respond("decompose", &key, move |e| e.decompose(&ch, level))
    }

    fn decompose_many(
        &self,
        text: String,
        level: DecompositionLevel,
    ) -> ApiResult<HashMap<String, Vec<String>>> {
        let key = text.clone();
        self.respond("decompose_many", &key, move |e| {
            text.chars()
                .map(|c| {
                    let ch = c.to_string();
                    e.decompose(&ch, level).map(|components| (ch, components))
                })
                .collect()
        })
    }

    fn define(&self, ch: String, variant: ScriptVariant) -> ApiResult<Vec<DictEntry>> {
        let key = ch.clone();
        self.respond("define", &key, move |e| e.definition_lookup(&ch, variant))
    }

    fn define_many(
        &self,
        text: String,
        variant: ScriptVariant,
    ) -> ApiResult<HashMap<String, Vec<DictEntry>>> {
        let key = text.clone();
        self.respond("define_many", &key, move |e| {
            text.chars()
                .map(|c| {
                    let ch = c.to_string();
                    e.definition_lookup(&ch, variant).map(|entries| (ch, entries))
                })
                .collect()
        })
    }

    fn examples(&self, ch: String) -> ApiResult<Vec<DictEntry>> {
        let key = ch.clone();
        self.respond("examples", &key, move |e| e.examples(&ch))
    }

    fn dictionary_search(&self, text: String, mode: SearchMode) -> ApiResult<Vec<DictEntry>> {
        let key = text.clone();
        self.respond("dictionary_search", &key, move |e| e.dictionary_search(&text, mode))
    }

    fn component_exists(&self, component: String) -> ApiResult<bool> {
        let key = component.clone();
        self.respond("component_exists", &key, move |e| e.component_exists(&component))
    }

    fn characters_from_component(&self, component: String) -> ApiResult<Vec<String>> {
        let key = component.clone();
        self.respond("characters_from_component", &key, move |e| {
            e.characters_with_component(&component)
        })
    }
}
