use std::sync::{
    mpsc,
    Arc,
};

use log::debug;
use tokio::runtime::{
    Builder,
    Runtime,
};

use super::TaskResult;
use crate::{
    client::HanziApi,
    core::BushouError,
    study::{
        CharacterCache,
        Revision,
        SearchController,
    },
};

/// Glyph probed to see whether the query server answers.
const PROBE_COMPONENT: &str = "口";

/// Runs controller operations off the UI thread. Results come back through
/// `poll_results`, which the UI drains once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Result<Self, BushouError> {
        let runtime = Arc::new(
            Builder::new_multi_thread().worker_threads(2).thread_name("bushou-tasks").enable_all().build()?,
        );

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    pub fn check_server(&self, api: Arc<dyn HanziApi>) {
        let (sender, runtime) = self.task_context();

        runtime.spawn(async move {
            let connected = api.component_exists(PROBE_COMPONENT.to_string()).await.is_ok();
            let _ = sender.send(TaskResult::ServerConnection(connected));
        });
    }

    pub fn search(&self, controller: Arc<SearchController>, query: String) {
        let (sender, runtime) = self.task_context();

        runtime.spawn(async move {
            let token = controller.search(&query).await;
            let _ = sender.send(TaskResult::SearchSettled(token));
        });
    }

    pub fn open_character(&self, controller: Arc<SearchController>, character: String) {
        let (sender, runtime) = self.task_context();

        runtime.spawn(async move {
            let token = controller.open_character(&character).await;
            let _ = sender.send(TaskResult::SearchSettled(token));
        });
    }

    pub fn retry_characters(&self, cache: Arc<CharacterCache>, id: u32) {
        let (sender, runtime) = self.task_context();

        runtime.spawn(async move {
            let state = cache.retry(id).await;
            let _ = sender.send(TaskResult::CharactersLoaded { id, state });
        });
    }

    pub fn toggle_characters(&self, cache: Arc<CharacterCache>, id: u32) {
        let (sender, runtime) = self.task_context();

        runtime.spawn(async move {
            let shown = cache.toggle_visibility(id).await;
            let _ = sender.send(TaskResult::CharactersToggled { id, shown });
        });
    }

    /// Calls `repaint` whenever controller state changes, until the revision
    /// is dropped.
    pub fn watch_revision<F>(&self, revision: &Revision, repaint: F)
    where
        F: Fn() + Send + 'static,
    {
        let mut receiver = revision.subscribe();

        self.runtime.spawn(async move {
            while receiver.changed().await.is_ok() {
                repaint();
            }
            debug!("Revision watcher stopped");
        });
    }
}
