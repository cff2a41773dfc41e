use crate::study::LookupState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    ServerConnection(bool),

    SearchSettled(u64),

    CharactersLoaded { id: u32, state: LookupState },
    CharactersToggled { id: u32, shown: bool },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::ServerConnection(_) => "server_connection",
            TaskResult::SearchSettled(_) => "search",
            TaskResult::CharactersLoaded { .. } => "characters",
            TaskResult::CharactersToggled { .. } => "characters_toggle",
        }
    }
}
