mod app;
mod flashcard_panel;
mod message_overlay;
mod search_panel;
mod theme;

pub use app::BushouApp;
