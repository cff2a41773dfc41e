//! Typed async client for the query server.

use std::{
    collections::HashMap,
    time::Duration,
};

use futures::{
    future::BoxFuture,
    FutureExt,
};
use log::debug;
use reqwest::{
    Client,
    Url,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    api::{
        CharactersFromComponentResponse,
        ComponentExistsResponse,
        DecomposeLevelResponse,
        DecomposeManyResponse,
        DecompositionLevel,
        DefineManyResponse,
        DefineResponse,
        DictEntry,
        DictionarySearchResponse,
        ErrorBody,
        ExamplesResponse,
        ScriptVariant,
        SearchMode,
    },
    core::{
        http::api_client,
        BushouError,
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_decode() {
            ClientError::Decode(error.to_string())
        } else {
            ClientError::Transport(error.to_string())
        }
    }
}

pub type ApiResult<T> = BoxFuture<'static, Result<T, ClientError>>;

/// The query operations the client controllers depend on.
pub trait HanziApi: Send + Sync {
    fn decompose(&self, ch: String, level: DecompositionLevel) -> ApiResult<Vec<String>>;

    fn decompose_many(
        &self,
        text: String,
        level: DecompositionLevel,
    ) -> ApiResult<HashMap<String, Vec<String>>>;

    fn define(&self, ch: String, variant: ScriptVariant) -> ApiResult<Vec<DictEntry>>;

    fn define_many(
        &self,
        text: String,
        variant: ScriptVariant,
    ) -> ApiResult<HashMap<String, Vec<DictEntry>>>;

    fn examples(&self, ch: String) -> ApiResult<Vec<DictEntry>>;

    fn dictionary_search(&self, text: String, mode: SearchMode) -> ApiResult<Vec<DictEntry>>;

    fn component_exists(&self, component: String) -> ApiResult<bool>;

    fn characters_from_component(&self, component: String) -> ApiResult<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct HttpHanziApi {
    client: Client,
    base_url: String,
}

impl HttpHanziApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BushouError> {
        Url::parse(base_url)
            .map_err(|e| BushouError::Custom(format!("Invalid API base URL {}: {}", base_url, e)))?;

        Ok(Self { client: api_client(timeout)?, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T, R, F>(&self, path: &str, params: &[(&str, &str)], extract: F) -> ApiResult<R>
    where
        T: DeserializeOwned + Send + 'static,
        R: Send + 'static,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let url = Url::parse_with_params(&format!("{}/api/{}", self.base_url, path), params);
        let client = self.client.clone();

        async move {
            let url = url.map_err(|e| ClientError::Transport(e.to_string()))?;
            debug!("GET {}", url);

            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = match response.json::<ErrorBody>().await {
                    Ok(body) => body.message.unwrap_or(body.error),
                    Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
                };
                return Err(ClientError::Status { status: status.as_u16(), message });
            }

            let body = response.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()))?;
            Ok(extract(body))
        }
        .boxed()
    }
}

impl HanziApi for HttpHanziApi {
    fn decompose(&self, ch: String, level: DecompositionLevel) -> ApiResult<Vec<String>> {
        let level = level.number().to_string();
        self.get("decompose", &[("ch", ch.as_str()), ("level", level.as_str())], |r: DecomposeLevelResponse| {
            r.components
        })
    }

    fn decompose_many(
        &self,
        text: String,
        level: DecompositionLevel,
    ) -> ApiResult<HashMap<String, Vec<String>>> {
        let level = level.number().to_string();
        self.get("decompose-many", &[("text", text.as_str()), ("level", level.as_str())], |r: DecomposeManyResponse| {
            r.result
        })
    }

    fn define(&self, ch: String, variant: ScriptVariant) -> ApiResult<Vec<DictEntry>> {
        self.get("define", &[("char", ch.as_str()), ("variant", variant.as_str())], |r: DefineResponse| {
            r.entries
        })
    }

    fn define_many(
        &self,
        text: String,
        variant: ScriptVariant,
    ) -> ApiResult<HashMap<String, Vec<DictEntry>>> {
        self.get(
            "define-many",
            &[("text", text.as_str()), ("variant", variant.as_str())],
            |r: DefineManyResponse| r.result,
        )
    }

    fn examples(&self, ch: String) -> ApiResult<Vec<DictEntry>> {
        self.get("examples", &[("char", ch.as_str())], |r: ExamplesResponse| r.examples)
    }

    fn dictionary_search(&self, text: String, mode: SearchMode) -> ApiResult<Vec<DictEntry>> {
        self.get(
            "dictionary-search",
            &[("text", text.as_str()), ("mode", mode.as_str())],
            |r: DictionarySearchResponse| r.results,
        )
    }

    fn component_exists(&self, component: String) -> ApiResult<bool> {
        self.get("component-exists", &[("component", component.as_str())], |r: ComponentExistsResponse| {
            r.exists
        })
    }

    fn characters_from_component(&self, component: String) -> ApiResult<Vec<String>> {
        self.get(
            "characters-from-component",
            &[("component", component.as_str())],
            |r: CharactersFromComponentResponse| r.characters,
        )
    }
}
