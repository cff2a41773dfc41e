pub mod api;
pub mod client;
pub mod core;
pub mod dictionary;
pub mod gui;
pub mod persistence;
pub mod pinyin;
pub mod radicals;
pub mod server;
pub mod settings;
pub mod study;

pub use core::BushouError;
