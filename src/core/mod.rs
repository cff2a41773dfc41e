pub mod errors;
pub mod http;
pub mod models;
pub mod tasks;
pub mod utils;

pub use errors::BushouError;
pub use models::RadicalRecord;
